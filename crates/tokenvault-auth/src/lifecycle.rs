//! Issue, rotate, and revoke flows over the tokenizer and revocation store.

use std::sync::Arc;

use tracing::{info, warn};

use tokenvault_core::error::AppError;
use tokenvault_core::result::AppResult;
use tokenvault_entity::token::NewRefreshToken;

use crate::jwt::{TokenClaims, TokenPair, Tokenizer};
use crate::revocation::RevocationStore;

/// Coordinates token issuance with refresh token persistence.
///
/// Credential checks happen before any of these calls; this type only
/// deals with tokens that belong to an already authenticated user.
#[derive(Debug, Clone)]
pub struct TokenLifecycle {
    tokenizer: Arc<Tokenizer>,
    store: RevocationStore,
}

impl TokenLifecycle {
    /// Creates a lifecycle over a shared tokenizer and store.
    pub fn new(tokenizer: Arc<Tokenizer>, store: RevocationStore) -> Self {
        Self { tokenizer, store }
    }

    /// The tokenizer used for signing and verification.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The store holding honoured refresh tokens.
    pub fn store(&self) -> &RevocationStore {
        &self.store
    }

    /// Issues a token pair and records the refresh token.
    pub async fn issue(
        &self,
        user_id: i64,
        subject: &str,
        roles: impl IntoIterator<Item = impl Into<String>>,
    ) -> AppResult<TokenPair> {
        let pair = self.tokenizer.create_token_pair(user_id, subject, roles)?;

        self.store
            .add(NewRefreshToken {
                user_id,
                value: pair.refresh_token.as_str().to_string(),
                expires_at: pair.refresh_expires_at,
            })
            .await?;

        info!(user_id, "Issued token pair");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new pair carrying the same identity.
    ///
    /// The presented token is removed before the new pair is issued, so it
    /// can be used at most once. A token that verifies but is no longer
    /// stored is refused with `TokenRevoked`.
    ///
    /// If storing the new refresh token fails after the old one was
    /// removed, the error is returned and the caller holds no usable
    /// refresh token. The user has to authenticate again.
    pub async fn rotate(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.tokenizer.parse_refresh_token(refresh_token)?;

        if !self.store.delete(refresh_token).await? {
            warn!(user_id = claims.user_id, "Refresh denied for revoked token");
            return Err(AppError::token_revoked("Refresh token has been revoked"));
        }

        self.issue(claims.user_id, &claims.subject, claims.roles).await
    }

    /// Revokes a single refresh token (logout). Idempotent.
    pub async fn revoke(&self, refresh_token: &str) -> AppResult<bool> {
        self.store.delete(refresh_token).await
    }

    /// Revokes every refresh token held by a user (logout everywhere).
    pub async fn revoke_all(&self, user_id: i64) -> AppResult<u64> {
        self.store.delete_for_user(user_id).await
    }

    /// Verifies the access token in an authorization header value.
    pub fn authenticate(&self, header_value: &str) -> AppResult<TokenClaims> {
        self.tokenizer.parse_authorization_header(header_value)
    }
}
