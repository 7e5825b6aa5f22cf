use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateGroup, Group, UpdateGroup},
};

#[async_trait]
pub trait GroupRepo: Send + Sync {
    /// Persist a new group owned by `owner_id`.
    ///
    /// The payload is validated before anything is written; a blank
    /// title fails with `DbError::Validation`.
    async fn create(&self, owner_id: Uuid, input: CreateGroup) -> DbResult<Group>;

    /// Fetch a group by id, owner display identity expanded.
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<Group>>;

    /// All groups ordered by creation time descending, owner display
    /// identities expanded.
    async fn find_all(&self) -> DbResult<Vec<Group>>;

    /// Replace a group's title and content. Owner and id are immutable.
    async fn update(&self, id: Uuid, input: UpdateGroup) -> DbResult<Group>;

    /// Permanently remove a group.
    async fn delete(&self, id: Uuid) -> DbResult<()>;
}
