//! Refresh token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tokenvault_core::error::{AppError, ErrorKind};
use tokenvault_core::result::AppResult;
use tokenvault_entity::token::{NewRefreshToken, RefreshTokenRecord};

/// Repository for the `refresh_tokens` table.
///
/// Every method is a single statement, so each call runs in its own
/// implicit transaction.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new record. A value that is already stored yields
    /// [`ErrorKind::DuplicateToken`].
    pub async fn insert(&self, data: &NewRefreshToken) -> AppResult<RefreshTokenRecord> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            "INSERT INTO refresh_tokens (user_id, value, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_id, value, expires_at, created_at",
        )
        .bind(data.user_id)
        .bind(&data.value)
        .bind(data.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                AppError::with_source(
                    ErrorKind::DuplicateToken,
                    "Refresh token value is already stored",
                    e,
                )
            } else {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to insert refresh token",
                    e,
                )
            }
        })
    }

    /// Find a record by its token value.
    pub async fn find_by_value(&self, value: &str) -> AppResult<Option<RefreshTokenRecord>> {
        sqlx::query_as::<_, RefreshTokenRecord>(
            "SELECT id, user_id, value, expires_at, created_at \
             FROM refresh_tokens WHERE value = $1",
        )
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to find refresh token",
                e,
            )
        })
    }

    /// Delete a record by its token value. Returns `true` if a row was removed.
    pub async fn delete_by_value(&self, value: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE value = $1")
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to delete refresh token",
                    e,
                )
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every record owned by a user. Returns the number removed.
    pub async fn delete_by_user(&self, user_id: i64) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to delete refresh tokens for user",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }

    /// Delete records whose token expired at or before `now`.
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StoreUnavailable,
                    "Failed to purge expired refresh tokens",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }
}
