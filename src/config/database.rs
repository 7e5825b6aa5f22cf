use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Database configuration.
///
/// The database stores groups, accounts, and sessions. A database is
/// always required; SQLite is the only supported backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[serde(deny_unknown_fields)]
pub enum DatabaseConfig {
    /// SQLite database. Good for single-node deployments.
    Sqlite(SqliteConfig),
}

impl DatabaseConfig {
    /// Whether migrations should run on startup.
    pub fn run_migrations(&self) -> bool {
        match self {
            DatabaseConfig::Sqlite(c) => c.run_migrations,
        }
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            DatabaseConfig::Sqlite(c) => c.validate(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::Sqlite(SqliteConfig::default())
    }
}

/// SQLite configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    /// Use `:memory:` for an in-memory database (testing only).
    #[serde(default = "default_path")]
    pub path: String,

    /// Create the database file if it doesn't exist.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Run migrations on startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Enable WAL mode for better concurrency.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,

    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl SqliteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Validation(
                "SQLite path cannot be empty".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            create_if_missing: default_true(),
            run_migrations: default_true(),
            wal_mode: default_true(),
            busy_timeout_ms: default_busy_timeout(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_path() -> String {
    "huddle.db".to_string()
}

fn default_true() -> bool {
    true
}

fn default_busy_timeout() -> u64 {
    5000
}

fn default_max_connections() -> u32 {
    5
}
