//! # tokenvault-database
//!
//! PostgreSQL connection management, embedded migrations, and the
//! refresh token repository.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::RefreshTokenRepository;
