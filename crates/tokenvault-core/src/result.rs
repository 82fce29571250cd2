//! Convenience result type alias for TokenVault.

use crate::error::AppError;

/// A specialized `Result` type for TokenVault operations.
pub type AppResult<T> = Result<T, AppError>;
