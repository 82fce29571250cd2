//! Refresh token persistence and revocation.

pub mod memory;
pub mod postgres;
pub mod store;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tokenvault_core::result::AppResult;
use tokenvault_entity::token::{NewRefreshToken, RefreshTokenRecord};

pub use memory::MemoryRefreshTokenStore;
pub use postgres::PgRefreshTokenStore;
pub use store::RevocationStore;

/// Backend holding issued refresh tokens keyed by their value.
///
/// Each call is one unit of work. Implementations must treat token values
/// as unique keys and report a missing record as `None`/`false`, never as
/// an error.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Stores a record, failing with `DuplicateToken` if the value exists.
    async fn insert(&self, data: &NewRefreshToken) -> AppResult<RefreshTokenRecord>;

    /// Looks a record up by token value.
    async fn find_by_value(&self, value: &str) -> AppResult<Option<RefreshTokenRecord>>;

    /// Removes a record by token value. Returns `true` if one was removed.
    async fn delete_by_value(&self, value: &str) -> AppResult<bool>;

    /// Removes every record owned by a user.
    async fn delete_by_user(&self, user_id: i64) -> AppResult<u64>;

    /// Removes records whose token expired at or before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
