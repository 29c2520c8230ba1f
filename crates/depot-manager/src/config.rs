//! Manager configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                   | Default            |
//! |----------------------------|--------------------|
//! | `DEPOT_DB_PATH`            | `default_database` |
//! | `DEPOT_DB_MAX_CONNECTIONS` | `5`                |
//! | `DEPOT_IMPORT_LEGACY`      | `true`             |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use depot_db::DbConfig;

/// Database file used when `DEPOT_DB_PATH` is unset.
pub const DEFAULT_DATABASE_PATH: &str = "default_database";

/// Inventory manager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// SQLite database file; created if missing
    pub database_path: PathBuf,

    /// Connection pool size
    pub max_connections: u32,

    /// Fold table-per-warehouse files into the catalog on open
    pub import_legacy_tables: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            max_connections: 5,
            import_legacy_tables: true,
        }
    }
}

impl ManagerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ManagerConfig {
            database_path: lookup("DEPOT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH)),

            max_connections: lookup("DEPOT_DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEPOT_DB_MAX_CONNECTIONS".to_string()))?,

            import_legacy_tables: lookup("DEPOT_IMPORT_LEGACY")
                .unwrap_or_else(|| "true".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEPOT_IMPORT_LEGACY".to_string()))?,
        };

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "DEPOT_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Configuration for an isolated in-memory store (for testing).
    pub fn in_memory() -> Self {
        ManagerConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            import_legacy_tables: true,
        }
    }

    /// Builds the pool configuration for this manager.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == ":memory:" {
            return DbConfig::in_memory();
        }

        DbConfig::new(&self.database_path).max_connections(self.max_connections)
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
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ManagerConfig::default());
        assert_eq!(config.database_path, PathBuf::from("default_database"));
        assert_eq!(config.max_connections, 5);
        assert!(config.import_legacy_tables);
    }

    #[test]
    fn test_overrides() {
        let config = ManagerConfig::from_lookup(lookup(&[
            ("DEPOT_DB_PATH", "/var/lib/depot/inventory.db"),
            ("DEPOT_DB_MAX_CONNECTIONS", "8"),
            ("DEPOT_IMPORT_LEGACY", "false"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/depot/inventory.db"));
        assert_eq!(config.max_connections, 8);
        assert!(!config.import_legacy_tables);
        assert_eq!(config.db_config().max_connections, 8);
    }

    #[test]
    fn test_invalid_values() {
        let err = ManagerConfig::from_lookup(lookup(&[("DEPOT_DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for DEPOT_DB_MAX_CONNECTIONS");

        assert!(ManagerConfig::from_lookup(lookup(&[("DEPOT_DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(ManagerConfig::from_lookup(lookup(&[("DEPOT_IMPORT_LEGACY", "yes")])).is_err());
    }

    #[test]
    fn test_in_memory() {
        let config = ManagerConfig::in_memory();
        assert!(config.db_config().is_in_memory());

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["database_path"], ":memory:");
    }
}
