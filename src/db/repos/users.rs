use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateUser, User},
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Provision an account. The username must be unique.
    async fn create(&self, input: CreateUser) -> DbResult<User>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    /// Fetch an account by its unique username.
    async fn find_by_username(&self, username: &str) -> DbResult<Option<User>>;
}
