//! Embedded schema migrations for the refresh token table.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use tokenvault_core::error::{AppError, ErrorKind};
use tokenvault_core::result::AppResult;

/// Migrations compiled into the binary from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply pending migrations and return the schema version now in place.
pub async fn run_migrations(pool: &PgPool) -> AppResult<i64> {
    let target = latest_version();
    info!(target_version = target, "Applying refresh token schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::StoreUnavailable,
            format!("Failed to migrate to schema version {target}"),
            e,
        )
    })?;

    info!(version = target, "Schema is up to date");
    Ok(target)
}

/// Highest migration version embedded in this build.
pub fn latest_version() -> i64 {
    MIGRATOR.iter().map(|m| m.version).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_token_migration_is_embedded() {
        assert!(
            MIGRATOR
                .iter()
                .any(|m| m.description.contains("refresh"))
        );
        assert_eq!(latest_version(), 20250101000001);
    }
}
