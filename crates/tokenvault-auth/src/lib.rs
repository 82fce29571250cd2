//! # tokenvault-auth
//!
//! Issuance and verification of signed access/refresh token pairs, and the
//! revocation store that backs refresh tokens.
//!
//! ## Modules
//!
//! - `jwt` — claims, signing secrets, and the [`Tokenizer`]
//! - `revocation` — refresh token persistence behind [`RevocationStore`]
//! - `lifecycle` — issue, rotate, and revoke flows built on the two above

pub mod jwt;
pub mod lifecycle;
pub mod revocation;

pub use jwt::{
    ACCESS_TOKEN_LIFETIME_MS, AccessToken, REFRESH_TOKEN_LIFETIME_MS, RefreshToken,
    SigningSecret, TokenClaims, TokenKind, TokenPair, Tokenizer,
};
pub use lifecycle::TokenLifecycle;
pub use revocation::{
    MemoryRefreshTokenStore, PgRefreshTokenStore, RefreshTokenStore, RevocationStore,
};
