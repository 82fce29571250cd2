//! HMAC signing secrets.

use std::fmt;

use jsonwebtoken::Algorithm;

use tokenvault_core::config::auth::MIN_SECRET_BYTES;
use tokenvault_core::error::AppError;

/// Raw key material for one token class.
///
/// The bytes are used directly as the HMAC key. The HMAC variant follows
/// the key length: 64 bytes or more selects HS512, 48 or more HS384, and
/// anything else HS256. Keys shorter than 256 bits are rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Wraps key material, rejecting keys too short for HMAC-SHA256.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, AppError> {
        let bytes = bytes.into();
        if bytes.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "Signing secret is {} bytes; at least {MIN_SECRET_BYTES} bytes are required",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// The HMAC variant this key signs with.
    pub fn algorithm(&self) -> Algorithm {
        match self.0.len() {
            n if n >= 64 => Algorithm::HS512,
            n if n >= 48 => Algorithm::HS384,
            _ => Algorithm::HS256,
        }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("len", &self.0.len())
            .field("algorithm", &self.algorithm())
            .finish()
    }
}
