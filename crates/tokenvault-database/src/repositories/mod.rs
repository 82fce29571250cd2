//! Repository implementations for TokenVault entities.

pub mod refresh_token;

pub use refresh_token::RefreshTokenRepository;
