//! Token issuance, inspection, and revocation commands.

use chrono::Utc;
use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use tokenvault_auth::{TokenClaims, TokenPair};
use tokenvault_core::config::AppConfig;
use tokenvault_core::error::AppError;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Issue an access/refresh pair and record the refresh token
    Issue {
        /// Numeric user id
        #[arg(long)]
        user_id: i64,
        /// Subject (usually the user's email)
        #[arg(long)]
        subject: String,
        /// Role name; repeat for several roles
        #[arg(long = "role")]
        roles: Vec<String>,
    },
    /// Verify a token and print its claims
    Inspect {
        /// Compact token string
        token: String,
        /// Verify against the refresh secret instead of the access secret
        #[arg(long)]
        refresh: bool,
    },
    /// Print the user id from an authorization header value
    UserId {
        /// Header value, e.g. "Bearer <token>"
        header: String,
    },
    /// Exchange a refresh token for a new pair
    Rotate {
        /// Refresh token to exchange
        token: String,
    },
    /// Revoke a single refresh token
    Revoke {
        /// Refresh token to revoke
        token: String,
    },
    /// Revoke every refresh token of a user
    RevokeUser {
        /// Numeric user id
        user_id: i64,
    },
    /// Delete stored refresh tokens that have expired
    Purge,
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        TokenCommand::Issue {
            user_id,
            subject,
            roles,
        } => {
            let lifecycle = super::build_lifecycle(config).await?;
            let pair = lifecycle.issue(*user_id, subject, roles.iter().cloned()).await?;
            print_pair(&pair, format)?;
        }
        TokenCommand::Inspect { token, refresh } => {
            let tokenizer = super::build_tokenizer(config)?;
            let claims = if *refresh {
                tokenizer.parse_refresh_token(token)?
            } else {
                tokenizer.parse_access_token(token)?
            };
            print_claims(&claims, format)?;
        }
        TokenCommand::UserId { header } => {
            let tokenizer = super::build_tokenizer(config)?;
            let user_id = tokenizer.extract_user_id(header)?;
            match format {
                OutputFormat::Json => output::print_json(&serde_json::json!({ "userId": user_id }))?,
                OutputFormat::Text => println!("{user_id}"),
            }
        }
        TokenCommand::Rotate { token } => {
            let lifecycle = super::build_lifecycle(config).await?;
            let pair = lifecycle.rotate(token).await?;
            print_pair(&pair, format)?;
        }
        TokenCommand::Revoke { token } => {
            let lifecycle = super::build_lifecycle(config).await?;
            if lifecycle.revoke(token).await? {
                output::print_success("Refresh token revoked.");
            } else {
                output::print_warning("Refresh token was not stored; nothing to revoke.");
            }
        }
        TokenCommand::RevokeUser { user_id } => {
            let lifecycle = super::build_lifecycle(config).await?;
            let count = lifecycle.revoke_all(*user_id).await?;
            output::print_success(&format!("Revoked {count} refresh token(s) for user {user_id}."));
        }
        TokenCommand::Purge => {
            let lifecycle = super::build_lifecycle(config).await?;
            let count = lifecycle.store().purge_expired(Utc::now()).await?;
            output::print_success(&format!("Purged {count} expired refresh token(s)."));
        }
    }

    Ok(())
}

fn print_pair(pair: &TokenPair, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => output::print_json(pair)?,
        OutputFormat::Text => {
            output::print_kv("Access token", pair.access_token.as_str());
            output::print_kv("Access expires", &pair.access_expires_at.to_rfc3339());
            output::print_kv("Refresh token", pair.refresh_token.as_str());
            output::print_kv("Refresh expires", &pair.refresh_expires_at.to_rfc3339());
        }
    }
    Ok(())
}

fn print_claims(claims: &TokenClaims, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => output::print_json(claims)?,
        OutputFormat::Text => {
            output::print_kv("Subject", &claims.subject);
            output::print_kv("User id", &claims.user_id.to_string());
            output::print_kv("Roles", &claims.roles.join(", "));
            output::print_kv("Issued at", &claims.issued_at.to_rfc3339());
            output::print_kv("Expires at", &claims.expires_at.to_rfc3339());
            output::print_kv(
                "Expires in",
                &format!("{}s", claims.remaining_at(Utc::now()).num_seconds()),
            );
            if let Some(token_id) = claims.token_id {
                output::print_kv("Token id", &token_id.to_string());
            }
        }
    }
    Ok(())
}
