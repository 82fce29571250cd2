//! Revocation store service wrapping a refresh token backend.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use tokenvault_core::error::ErrorKind;
use tokenvault_core::result::AppResult;
use tokenvault_entity::token::{NewRefreshToken, RefreshTokenRecord};

use super::RefreshTokenStore;

/// Tracks which refresh tokens are still honoured.
///
/// A refresh token is only trusted while its record is present. `find`
/// returning `None` means "never issued, expired and purged, or revoked";
/// the store does not tell these apart. Backend failures propagate
/// unchanged and are not retried here.
#[derive(Clone)]
pub struct RevocationStore {
    backend: Arc<dyn RefreshTokenStore>,
}

impl fmt::Debug for RevocationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevocationStore").finish()
    }
}

impl RevocationStore {
    /// Creates a revocation store over the given backend.
    pub fn new(backend: Arc<dyn RefreshTokenStore>) -> Self {
        Self { backend }
    }

    /// Persists a newly issued refresh token.
    pub async fn add(&self, data: NewRefreshToken) -> AppResult<RefreshTokenRecord> {
        match self.backend.insert(&data).await {
            Ok(record) => {
                debug!(user_id = record.user_id, record_id = record.id, "Stored refresh token");
                Ok(record)
            }
            Err(e) => {
                if e.kind == ErrorKind::DuplicateToken {
                    warn!(user_id = data.user_id, "Refresh token value collided with a stored one");
                }
                Err(e)
            }
        }
    }

    /// Revokes a refresh token. Revoking an unknown or already revoked
    /// token is a no-op; the return value tells whether anything was removed.
    pub async fn delete(&self, value: &str) -> AppResult<bool> {
        let removed = self.backend.delete_by_value(value).await?;
        debug!(removed, "Refresh token revocation processed");
        Ok(removed)
    }

    /// Returns the record for a refresh token that is still honoured.
    pub async fn find(&self, value: &str) -> AppResult<Option<RefreshTokenRecord>> {
        self.backend.find_by_value(value).await
    }

    /// Revokes every refresh token held by a user.
    pub async fn delete_for_user(&self, user_id: i64) -> AppResult<u64> {
        let count = self.backend.delete_by_user(user_id).await?;
        info!(user_id, count, "Revoked all refresh tokens for user");
        Ok(count)
    }

    /// Drops records whose token has expired at `now`.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let count = self.backend.delete_expired(now).await?;
        if count > 0 {
            info!(count, "Purged expired refresh tokens");
        }
        Ok(count)
    }
}
