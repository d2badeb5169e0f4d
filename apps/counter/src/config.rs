//! Counter configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rail_db::DbConfig;

/// Counter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// How long to wait for a pooled connection, in seconds
    pub acquire_timeout_secs: u64,
}

impl CounterConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = CounterConfig {
            db_path: lookup("RAIL_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./rail_dev.db")),

            max_connections: lookup("RAIL_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("RAIL_DB_MAX_CONNECTIONS".to_string()))?,

            acquire_timeout_secs: lookup("RAIL_DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .map_err(|_| {
                    ConfigError::InvalidValue("RAIL_DB_ACQUIRE_TIMEOUT_SECS".to_string())
                })?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "RAIL_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path)
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CounterConfig::from_lookup(lookup_in(&[])).unwrap();

        assert_eq!(config.db_path, PathBuf::from("./rail_dev.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let config = CounterConfig::from_lookup(lookup_in(&[
            ("RAIL_DB_PATH", "/srv/rail/counter.db"),
            ("RAIL_DB_MAX_CONNECTIONS", "2"),
            ("RAIL_DB_ACQUIRE_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        let db = config.db_config();
        assert_eq!(db.database_path, PathBuf::from("/srv/rail/counter.db"));
        assert_eq!(db.max_connections, 2);
        assert_eq!(db.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values() {
        let err = CounterConfig::from_lookup(lookup_in(&[("RAIL_DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for RAIL_DB_MAX_CONNECTIONS");

        assert!(CounterConfig::from_lookup(lookup_in(&[("RAIL_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(
            CounterConfig::from_lookup(lookup_in(&[("RAIL_DB_ACQUIRE_TIMEOUT_SECS", "-1")]))
                .is_err()
        );
    }
}
