use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::common::parse_user;
use crate::{
    db::{error::DbResult, repos::SessionRepo},
    models::{Session, User},
};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn create(&self, user_id: Uuid, ttl: chrono::Duration) -> DbResult<Session> {
        let token = Uuid::new_v4().simple().to_string();
        let now = chrono::Utc::now();
        let expires_at = now + ttl;

        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&token)
        .bind(user_id.to_string())
        .bind(now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Session {
            token,
            user_id,
            created_at: now,
            expires_at,
        })
    }

    async fn authenticate(&self, token: &str) -> DbResult<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username, u.display_name, u.roles, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = ? AND s.expires_at > ?
            "#,
        )
        .bind(token)
        .bind(chrono::Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(parse_user).transpose()
    }
}
