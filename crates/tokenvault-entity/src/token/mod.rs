//! Refresh token persistence entities.

pub mod record;

pub use record::{NewRefreshToken, RefreshTokenRecord};
