use sqlx::Row;
use uuid::Uuid;

use crate::{
    db::error::{DbError, DbResult},
    models::{Role, User},
};

/// Parse a UUID string from the database, returning a DbError on failure
pub fn parse_uuid(s: &str) -> DbResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DbError::Internal(format!("Invalid UUID in database: {}", e)))
}

/// Parse a User from a database row.
///
/// The roles column holds a JSON array of role labels; an unreadable
/// role set is an internal error, not a denial.
pub fn parse_user(row: &sqlx::sqlite::SqliteRow) -> DbResult<User> {
    let roles: String = row.get("roles");
    let roles: Vec<Role> = serde_json::from_str(&roles)?;

    Ok(User {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        username: row.get("username"),
        display_name: row.get("display_name"),
        roles,
        created_at: row.get("created_at"),
    })
}
