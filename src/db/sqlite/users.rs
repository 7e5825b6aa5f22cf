use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use super::common::parse_user;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::UserRepo,
    },
    models::{CreateUser, User},
};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn create(&self, input: CreateUser) -> DbResult<User> {
        input.validate()?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let roles_json = serde_json::to_string(&input.roles)?;

        sqlx::query(
            r#"
            INSERT INTO users (id, username, display_name, roles, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.username)
        .bind(&input.display_name)
        .bind(&roles_json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(format!("Username '{}' is already taken", input.username))
            }
            other => DbError::Sqlx(other),
        })?;

        Ok(User {
            id,
            username: input.username,
            display_name: input.display_name,
            roles: input.roles,
            created_at: now,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, display_name, roles, created_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, display_name, roles, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_user).transpose()
    }
}
