//! Token signing, verification, and claims.

pub mod claims;
pub mod secret;
pub mod token;
pub mod tokenizer;

pub use claims::{ACCESS_TOKEN_LIFETIME_MS, REFRESH_TOKEN_LIFETIME_MS, TokenClaims, TokenKind};
pub use secret::SigningSecret;
pub use token::{AccessToken, RefreshToken, TokenPair};
pub use tokenizer::{Clock, Tokenizer};
