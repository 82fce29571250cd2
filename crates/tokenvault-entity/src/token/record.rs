//! Refresh token record entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A refresh token that has been issued and not yet revoked.
///
/// Records are created when a refresh token is issued and removed on
/// logout, explicit revocation, or rotation. A missing record means the
/// token must not be trusted, whatever its signature says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RefreshTokenRecord {
    /// Surrogate primary key.
    pub id: i64,
    /// The user the token was issued to.
    pub user_id: i64,
    /// The compact signed token string. Unique across all records.
    pub value: String,
    /// When the token itself stops verifying.
    pub expires_at: DateTime<Utc>,
    /// When the record was stored.
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    /// Check whether the underlying token has passed its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Data required to store a newly issued refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRefreshToken {
    /// The user the token was issued to.
    pub user_id: i64,
    /// The compact signed token string.
    pub value: String,
    /// Expiry instant copied from the token claims.
    pub expires_at: DateTime<Utc>,
}
