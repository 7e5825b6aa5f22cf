use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbPool, DbResult},
    models::{CreateUser, User},
};

/// Service layer for account records
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Provision an account.
    pub async fn create(&self, input: CreateUser) -> DbResult<User> {
        self.db.users().create(input).await
    }

    /// Get an account by ID
    pub async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        self.db.users().find_by_id(id).await
    }

    /// Get an account by its unique username
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        self.db.users().find_by_username(username).await
    }
}
