//! # Configuration
//!
//! ## Configuration Sources (later wins)
//! 1. Defaults (this file)
//! 2. Config file (`caja.toml` in the platform config directory, or `--config`)
//! 3. Environment variables (`CAJA_*`)
//!
//! Configuration is read-only after startup.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use caja_db::DbConfig;

/// Default log filter when neither `RUST_LOG` nor `CAJA_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "info,caja=debug,sqlx=warn";

const CONFIG_FILE_NAME: &str = "caja.toml";
const DATABASE_FILE_NAME: &str = "caja.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Maximum pooled connections.
    pub max_connections: u32,

    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Apply pending migrations on startup.
    pub run_migrations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: default_data_dir()
                .map(|dir| dir.join(DATABASE_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME)),
            max_connections: 5,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            run_migrations: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from all sources.
    ///
    /// An explicit `config_path` must exist. The default `caja.toml` is
    /// optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_file() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => AppConfig::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML file over the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies `CAJA_DATABASE_PATH`, `CAJA_MAX_CONNECTIONS` and `CAJA_LOG`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("CAJA_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }

        if let Some(max) = lookup("CAJA_MAX_CONNECTIONS") {
            self.max_connections = max
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("CAJA_MAX_CONNECTIONS".to_string()))?;
        }

        if let Some(filter) = lookup("CAJA_LOG") {
            self.log_filter = filter;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        Ok(())
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.database_path.clone())
            .max_connections(self.max_connections)
            .run_migrations(self.run_migrations)
    }
}

/// Platform data directory.
///
/// - **macOS**: `~/Library/Application Support/com.caja.backoffice`
/// - **Windows**: `%APPDATA%\caja\backoffice\data`
/// - **Linux**: `~/.local/share/backoffice`
fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "caja", "backoffice").map(|dirs| dirs.data_dir().to_path_buf())
}

fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("com", "caja", "backoffice")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
