use std::sync::Arc;

use uuid::Uuid;

use crate::{
    auth::Identity,
    db::{DbPool, DbResult},
    models::{CreateGroup, Group, UpdateGroup},
};

/// Service layer for group operations
#[derive(Clone)]
pub struct GroupService {
    db: Arc<DbPool>,
}

impl GroupService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Create a group owned by the acting identity.
    pub async fn create(&self, owner: &Identity, input: CreateGroup) -> DbResult<Group> {
        self.db.groups().create(owner.id, input).await
    }

    /// Get a group by ID
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Group>> {
        self.db.groups().find_by_id(id).await
    }

    /// All groups, newest first.
    pub async fn list(&self) -> DbResult<Vec<Group>> {
        self.db.groups().find_all().await
    }

    /// Replace a group's title and content.
    pub async fn update(&self, id: Uuid, input: UpdateGroup) -> DbResult<Group> {
        self.db.groups().update(id, input).await
    }

    /// Permanently remove a group.
    pub async fn delete(&self, id: Uuid) -> DbResult<()> {
        self.db.groups().delete(id).await
    }
}
