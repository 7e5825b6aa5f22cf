mod error;
pub mod repos;
pub mod sqlite;


use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::{GroupRepo, SessionRepo, UserRepo};

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at startup.
struct CachedRepos {
    groups: Arc<dyn GroupRepo>,
    users: Arc<dyn UserRepo>,
    sessions: Arc<dyn SessionRepo>,
}

/// Database pool.
///
/// Repositories are cached at construction time to avoid allocation on
/// each access.
pub struct DbPool {
    pool: sqlx::SqlitePool,
    repos: CachedRepos,
}

impl DbPool {
    /// Create a DbPool from an existing SQLite pool.
    /// Primarily useful for testing.
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            groups: Arc::new(sqlite::SqliteGroupRepo::new(pool.clone())),
            users: Arc::new(sqlite::SqliteUserRepo::new(pool.clone())),
            sessions: Arc::new(sqlite::SqliteSessionRepo::new(pool.clone())),
        };
        DbPool { pool, repos }
    }

    /// Create a database pool from configuration.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        match config {
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .create_if_missing(cfg.create_if_missing)
                            .journal_mode(if cfg.wal_mode {
                                sqlx::sqlite::SqliteJournalMode::Wal
                            } else {
                                sqlx::sqlite::SqliteJournalMode::Delete
                            })
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;

                Ok(Self::from_sqlite(pool))
            }
        }
    }

    /// Run database migrations using sqlx's migration runner.
    /// This automatically creates and manages a _sqlx_migrations table.
    pub async fn run_migrations(&self) -> DbResult<()> {
        tracing::info!("Running SQLite migrations");
        sqlx::migrate!("./migrations_sqlx/sqlite")
            .run(&self.pool)
            .await?;
        tracing::info!("SQLite migrations completed successfully");
        Ok(())
    }

    pub fn groups(&self) -> &dyn GroupRepo {
        self.repos.groups.as_ref()
    }

    pub fn users(&self) -> &dyn UserRepo {
        self.repos.users.as_ref()
    }

    pub fn sessions(&self) -> &dyn SessionRepo {
        self.repos.sessions.as_ref()
    }
}
