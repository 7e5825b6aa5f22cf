use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<validator::ValidationErrors> for DbError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Surface the first human-readable message, the way the store's
        // validation layer reports a single failure to the caller.
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Validation failed".to_string());
        DbError::Validation(message)
    }
}
