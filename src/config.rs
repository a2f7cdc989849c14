//! Process configuration and store wiring
//!
//! Settings come from an optional YAML file, then the `STRAND_DB`
//! environment variable, then explicit overrides from the command line.

use crate::storage::{MemoryStore, OpenStore, RecordStore, SqliteStore, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Environment variable overriding the database location
pub const DB_ENV_VAR: &str = "STRAND_DB";

/// Database path that selects the in-memory store
pub const IN_MEMORY: &str = ":memory:";

/// Errors while loading configuration or opening the configured store
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to open database: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrandConfig {
    /// SQLite database file, or `:memory:`
    pub database: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self {
            database: None,
            log_filter: "info".to_string(),
        }
    }
}

impl StrandConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from `path` if given, otherwise start from defaults; then apply
    /// the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(std::env::var_os(DB_ENV_VAR).map(PathBuf::from));
        Ok(config)
    }

    fn apply_env(&mut self, db: Option<PathBuf>) {
        if let Some(db) = db {
            self.database = Some(db);
        }
    }

    /// Replace the database path when one is given.
    pub fn with_database(mut self, db: Option<PathBuf>) -> Self {
        if db.is_some() {
            self.database = db;
        }
        self
    }

    /// Configured database path, falling back to the per-user data directory.
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(default_db_path)
    }
}

/// Default database path (~/.local/share/strand/strand.db)
pub fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("strand").join("strand.db")
}

/// Open the store selected by `config`.
pub fn open_store(config: &StrandConfig) -> Result<Arc<dyn RecordStore>, ConfigError> {
    let path = config.database_path();
    if path.as_os_str() == IN_MEMORY {
        tracing::info!("using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(SqliteStore::open(&path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StrandConfig::default();
        assert_eq!(config.database, None);
        assert_eq!(config.log_filter, "info");
        assert!(config.database_path().ends_with("strand/strand.db"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = StrandConfig::from_yaml("database: /tmp/s.db\n").unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/tmp/s.db")));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            StrandConfig::from_yaml("log_filter: [unterminated"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_override_order() {
        let mut config = StrandConfig::from_yaml("database: from-file.db").unwrap();
        config.apply_env(Some(PathBuf::from("from-env.db")));
        assert_eq!(config.database_path(), PathBuf::from("from-env.db"));

        let config = config.with_database(None);
        assert_eq!(config.database_path(), PathBuf::from("from-env.db"));

        let config = config.with_database(Some(PathBuf::from("from-cli.db")));
        assert_eq!(config.database_path(), PathBuf::from("from-cli.db"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strand.yaml");
        std::fs::write(&path, "log_filter: debug\n").unwrap();

        let config = StrandConfig::load(Some(&path)).unwrap();
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = StrandConfig::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_open_store_in_memory_and_on_disk() {
        let memory = StrandConfig::default().with_database(Some(PathBuf::from(IN_MEMORY)));
        assert_eq!(open_store(&memory).unwrap().count().unwrap(), 0);

        let dir = tempfile::tempdir().unwrap();
        let disk = StrandConfig::default().with_database(Some(dir.path().join("s.db")));
        assert_eq!(open_store(&disk).unwrap().count().unwrap(), 0);
        assert!(dir.path().join("s.db").exists());
    }
}
