use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;
use validator::Validate;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::GroupRepo,
    },
    models::{CreateGroup, Group, GroupOwner, UpdateGroup},
};

pub struct SqliteGroupRepo {
    pool: SqlitePool,
}

impl SqliteGroupRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Parse a Group from a joined row.
    fn parse_group(row: &sqlx::sqlite::SqliteRow) -> DbResult<Group> {
        Ok(Group {
            id: parse_uuid(&row.get::<String, _>("id"))?,
            title: row.get("title"),
            content: row.get("content"),
            owner: GroupOwner {
                id: parse_uuid(&row.get::<String, _>("owner_id"))?,
                display_name: row.get("owner_display_name"),
            },
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl GroupRepo for SqliteGroupRepo {
    async fn create(&self, owner_id: Uuid, input: CreateGroup) -> DbResult<Group> {
        input.validate()?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO groups (id, title, content, owner_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.title)
        .bind(&input.content)
        .bind(owner_id.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DbError::Internal("Group missing after insert".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Group>> {
        let row = sqlx::query(
            r#"
            SELECT g.id, g.title, g.content, g.owner_id, g.created_at,
                   u.display_name AS owner_display_name
            FROM groups g
            LEFT JOIN users u ON u.id = g.owner_id
            WHERE g.id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::parse_group).transpose()
    }

    async fn find_all(&self) -> DbResult<Vec<Group>> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.title, g.content, g.owner_id, g.created_at,
                   u.display_name AS owner_display_name
            FROM groups g
            LEFT JOIN users u ON u.id = g.owner_id
            ORDER BY g.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::parse_group).collect()
    }

    async fn update(&self, id: Uuid, input: UpdateGroup) -> DbResult<Group> {
        input.validate()?;

        let result = sqlx::query("UPDATE groups SET title = ?, content = ? WHERE id = ?")
            .bind(&input.title)
            .bind(&input.content)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        self.find_by_id(id).await?.ok_or(DbError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }
}
