mod auth;
mod database;
mod observability;
mod server;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::SessionConfig;
pub use database::{DatabaseConfig, SqliteConfig};
pub use observability::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Top-level application configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration for persistent storage.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session handling configuration.
    #[serde(default)]
    pub auth: SessionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a file. Without a path, built-in defaults
    /// apply (local SQLite database, loopback listener).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| ConfigError::Io(e, path.to_path_buf()))?;
                Self::from_str(&contents)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from TOML contents.
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency and completeness.
    fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
