use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{Session, User},
};

#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Issue a session for `user_id`, valid for `ttl` from now.
    async fn create(&self, user_id: Uuid, ttl: chrono::Duration) -> DbResult<Session>;

    /// Resolve a bearer token to the account it authenticates.
    ///
    /// Unknown and expired tokens resolve to `None`; they are not an
    /// error, the request simply proceeds unauthenticated.
    async fn authenticate(&self, token: &str) -> DbResult<Option<User>>;
}
