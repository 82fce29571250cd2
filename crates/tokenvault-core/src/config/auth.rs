//! Authentication configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum secret length in bytes accepted for HMAC-SHA signing (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

/// Token signing secrets.
///
/// The two secrets must differ so that a leaked refresh secret cannot be
/// used to forge access tokens and vice versa. Changing either one
/// invalidates every token of that class issued before the restart.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify access tokens.
    pub access_secret: String,
    /// Secret used to sign and verify refresh tokens.
    pub refresh_secret: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    /// Checks that both secrets are long enough and distinct.
    pub fn validate(&self) -> Result<(), AppError> {
        check_secret_length("access_secret", &self.access_secret)?;
        check_secret_length("refresh_secret", &self.refresh_secret)?;
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "auth.access_secret and auth.refresh_secret must differ",
            ));
        }
        Ok(())
    }
}

fn check_secret_length(name: &str, secret: &str) -> Result<(), AppError> {
    let len = secret.len();
    if len < MIN_SECRET_BYTES {
        return Err(AppError::configuration(format!(
            "auth.{name} is {len} bytes; at least {MIN_SECRET_BYTES} bytes are required"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn config(access: &str, refresh: &str) -> AuthConfig {
        AuthConfig {
            access_secret: access.to_string(),
            refresh_secret: refresh.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_long_distinct_secrets() {
        let cfg = config(&"a".repeat(32), &"r".repeat(64));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let err = config("too-short", &"r".repeat(32)).validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains("access_secret"));
        assert!(!err.message.contains("too-short"));
    }

    #[test]
    fn test_validate_rejects_identical_secrets() {
        let secret = "s".repeat(40);
        let err = config(&secret, &secret).validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let cfg = config(&"a".repeat(32), &"r".repeat(32));
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("aaaa"));
        assert!(rendered.contains("<redacted>"));
    }
}
