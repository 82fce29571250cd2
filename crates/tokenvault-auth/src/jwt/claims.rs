//! Claims carried by access and refresh tokens.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tokenvault_core::error::AppError;

/// Access token lifetime: 30 minutes.
pub const ACCESS_TOKEN_LIFETIME_MS: i64 = 30 * 60 * 1000;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_LIFETIME_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// The two token classes. Each is signed with its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived token presented on every API call.
    Access,
    /// Long-lived token exchanged for a new pair; revocable.
    Refresh,
}

impl TokenKind {
    /// Fixed lifetime for this class of token.
    pub fn lifetime(self) -> Duration {
        match self {
            Self::Access => Duration::milliseconds(ACCESS_TOKEN_LIFETIME_MS),
            Self::Refresh => Duration::milliseconds(REFRESH_TOKEN_LIFETIME_MS),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// Identity and authorization data embedded in a token.
///
/// Claims are immutable once signed; changing roles means issuing a new
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, usually the user's email.
    pub subject: String,
    /// Numeric user identifier.
    pub user_id: i64,
    /// Role names, in issuance order. Carried opaquely.
    pub roles: Vec<String>,
    /// Issuance instant (whole seconds).
    pub issued_at: DateTime<Utc>,
    /// Expiry instant; the token is expired once `now >= expires_at`.
    pub expires_at: DateTime<Utc>,
    /// Unique token identifier (`jti`). Tokens from issuers that do not
    /// emit one still verify and carry `None`.
    pub token_id: Option<Uuid>,
}

impl TokenClaims {
    /// Checks whether the token is expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Remaining lifetime at `now`, zero once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

/// Flat payload mapping as it appears inside the signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireClaims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub roles: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
}

impl From<&TokenClaims> for WireClaims {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            sub: claims.subject.clone(),
            user_id: claims.user_id,
            roles: claims.roles.clone(),
            iat: claims.issued_at.timestamp(),
            exp: claims.expires_at.timestamp(),
            jti: claims.token_id,
        }
    }
}

impl TryFrom<WireClaims> for TokenClaims {
    type Error = AppError;

    fn try_from(wire: WireClaims) -> Result<Self, Self::Error> {
        let issued_at = DateTime::from_timestamp(wire.iat, 0)
            .ok_or_else(|| AppError::token_invalid("Issued-at claim is out of range"))?;
        let expires_at = DateTime::from_timestamp(wire.exp, 0)
            .ok_or_else(|| AppError::token_invalid("Expiry claim is out of range"))?;

        Ok(Self {
            subject: wire.sub,
            user_id: wire.user_id,
            roles: wire.roles,
            issued_at,
            expires_at,
            token_id: wire.jti,
        })
    }
}
