//! PostgreSQL-backed refresh token store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tokenvault_core::result::AppResult;
use tokenvault_database::repositories::RefreshTokenRepository;
use tokenvault_entity::token::{NewRefreshToken, RefreshTokenRecord};

use super::RefreshTokenStore;

/// Durable store over the `refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    repo: RefreshTokenRepository,
}

impl PgRefreshTokenStore {
    /// Creates a store over an existing repository.
    pub fn new(repo: RefreshTokenRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn insert(&self, data: &NewRefreshToken) -> AppResult<RefreshTokenRecord> {
        self.repo.insert(data).await
    }

    async fn find_by_value(&self, value: &str) -> AppResult<Option<RefreshTokenRecord>> {
        self.repo.find_by_value(value).await
    }

    async fn delete_by_value(&self, value: &str) -> AppResult<bool> {
        self.repo.delete_by_value(value).await
    }

    async fn delete_by_user(&self, user_id: i64) -> AppResult<u64> {
        self.repo.delete_by_user(user_id).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repo.delete_expired(now).await
    }
}
