//! Application configuration schemas.
//!
//! Configuration is read once at startup from an optional TOML file and
//! `TOKENVAULT__*` environment variables, then handed to constructors as
//! immutable values.

pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Token signing secrets.
    pub auth: AuthConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file overlaid with environment variables.
    ///
    /// The file is optional; `TOKENVAULT__AUTH__ACCESS_SECRET` and friends
    /// take precedence over anything it contains.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TOKENVAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Validate settings that must hold before anything is constructed.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ErrorKind;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_load_from_file_with_defaults() {
        let file = write_config(
            r#"
[auth]
access_secret = "access-secret-access-secret-access-secret"
refresh_secret = "refresh-secret-refresh-secret-refresh-secret"
"#,
        );

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_without_auth_section_fails() {
        let file = write_config("[logging]\nlevel = \"debug\"\n");

        let err = AppConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
