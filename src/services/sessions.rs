use std::sync::Arc;

use uuid::Uuid;

use crate::{
    auth::Identity,
    db::{DbPool, DbResult},
    models::Session,
};

/// Service layer for bearer-token sessions
#[derive(Clone)]
pub struct SessionService {
    db: Arc<DbPool>,
    ttl: chrono::Duration,
}

impl SessionService {
    pub fn new(db: Arc<DbPool>, ttl: chrono::Duration) -> Self {
        Self { db, ttl }
    }

    /// Issue a session for `user_id` with the configured lifetime.
    pub async fn create(&self, user_id: Uuid) -> DbResult<Session> {
        self.db.sessions().create(user_id, self.ttl).await
    }

    /// Resolve a bearer token to the identity it authenticates.
    /// Unknown and expired tokens resolve to None.
    pub async fn identity_for_token(&self, token: &str) -> DbResult<Option<Identity>> {
        Ok(self
            .db
            .sessions()
            .authenticate(token)
            .await?
            .map(Identity::from))
    }
}
