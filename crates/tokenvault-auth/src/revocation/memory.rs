//! In-memory refresh token store.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use tokenvault_core::error::AppError;
use tokenvault_core::result::AppResult;
use tokenvault_entity::token::{NewRefreshToken, RefreshTokenRecord};

use super::RefreshTokenStore;

/// Process-local store for tests and single-node embedding.
///
/// Records do not survive a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryRefreshTokenStore {
    records: Arc<DashMap<String, RefreshTokenRecord>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryRefreshTokenStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryRefreshTokenStore {
    async fn insert(&self, data: &NewRefreshToken) -> AppResult<RefreshTokenRecord> {
        match self.records.entry(data.value.clone()) {
            Entry::Occupied(_) => Err(AppError::duplicate_token(
                "Refresh token value is already stored",
            )),
            Entry::Vacant(slot) => {
                let record = RefreshTokenRecord {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    user_id: data.user_id,
                    value: data.value.clone(),
                    expires_at: data.expires_at,
                    created_at: Utc::now(),
                };
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn find_by_value(&self, value: &str) -> AppResult<Option<RefreshTokenRecord>> {
        Ok(self.records.get(value).map(|entry| entry.value().clone()))
    }

    async fn delete_by_value(&self, value: &str) -> AppResult<bool> {
        Ok(self.records.remove(value).is_some())
    }

    async fn delete_by_user(&self, user_id: i64) -> AppResult<u64> {
        let mut removed = 0u64;
        self.records.retain(|_, record| {
            let keep = record.user_id != user_id;
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0u64;
        self.records.retain(|_, record| {
            let keep = !record.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}
