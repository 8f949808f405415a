//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//! A `--db` flag on the command line overrides the database path afterwards.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use rental_db::DbConfig;

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "tesla_rental.db";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file (`RENTAL_DB_PATH`)
    pub database_path: PathBuf,

    /// Pool size (`RENTAL_DB_MAX_CONNECTIONS`)
    pub max_connections: u32,

    /// Connection acquire timeout in seconds (`RENTAL_DB_CONNECT_TIMEOUT_SECS`)
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = lookup("RENTAL_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        if database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("RENTAL_DB_PATH".to_string()));
        }

        let config = AppConfig {
            database_path: PathBuf::from(database_path),

            max_connections: lookup("RENTAL_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RENTAL_DB_MAX_CONNECTIONS".to_string()))?,

            connect_timeout_secs: lookup("RENTAL_DB_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("RENTAL_DB_CONNECT_TIMEOUT_SECS".to_string())
                })?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "RENTAL_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Replaces the database path (from `--db`).
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Builds the pool configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from("tesla_rental.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let config = load_with(&[
            ("RENTAL_DB_PATH", "/var/lib/rental/fleet.db"),
            ("RENTAL_DB_MAX_CONNECTIONS", "8"),
            ("RENTAL_DB_CONNECT_TIMEOUT_SECS", "2"),
        ])
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/rental/fleet.db"));
        assert_eq!(config.max_connections, 8);

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert_eq!(db.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_values() {
        let err = load_with(&[("RENTAL_DB_MAX_CONNECTIONS", "lots")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "RENTAL_DB_MAX_CONNECTIONS"));

        let err = load_with(&[("RENTAL_DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = load_with(&[("RENTAL_DB_CONNECT_TIMEOUT_SECS", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = load_with(&[("RENTAL_DB_PATH", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired(_)));
    }

    #[test]
    fn test_db_flag_overrides_env() {
        let config = load_with(&[("RENTAL_DB_PATH", "env.db")])
            .unwrap()
            .with_database_path("flag.db");
        assert_eq!(config.db_config().database_path, PathBuf::from("flag.db"));
    }
}
