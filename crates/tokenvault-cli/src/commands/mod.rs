//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod token;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use tokenvault_auth::{PgRefreshTokenStore, RevocationStore, TokenLifecycle, Tokenizer};
use tokenvault_core::config::AppConfig;
use tokenvault_core::error::AppError;
use tokenvault_database::{DatabasePool, RefreshTokenRepository};

/// TokenVault — access/refresh token issuance and revocation
#[derive(Debug, Parser)]
#[command(name = "tokenvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration checks
    Config(config::ConfigArgs),
    /// Token issuance, inspection, and revocation
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, app_config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &app_config).await,
            Commands::Config(args) => config::execute(args, &app_config, self.format).await,
            Commands::Token(args) => token::execute(args, &app_config, self.format).await,
        }
    }
}

/// Helper: build the tokenizer from validated configuration
pub fn build_tokenizer(config: &AppConfig) -> Result<Tokenizer, AppError> {
    Tokenizer::from_config(&config.auth)
}

/// Helper: build the PostgreSQL-backed token lifecycle
pub async fn build_lifecycle(config: &AppConfig) -> Result<TokenLifecycle, AppError> {
    let tokenizer = Arc::new(build_tokenizer(config)?);
    let pool = DatabasePool::connect(&config.database).await?;
    let store = PgRefreshTokenStore::new(RefreshTokenRepository::new(pool.into_pool()));
    Ok(TokenLifecycle::new(
        tokenizer,
        RevocationStore::new(Arc::new(store)),
    ))
}
