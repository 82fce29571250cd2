//! # tokenvault-entity
//!
//! Entity models for TokenVault. Database entities derive `sqlx::FromRow`
//! so repositories can map rows directly.

pub mod token;
