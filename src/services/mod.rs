mod groups;
mod sessions;
mod users;

use std::sync::Arc;

pub use groups::GroupService;
pub use sessions::SessionService;
pub use users::UserService;

use crate::{config::AppConfig, db::DbPool};

/// Aggregated service layer handed to handlers via `AppState`.
#[derive(Clone)]
pub struct Services {
    pub groups: GroupService,
    pub users: UserService,
    pub sessions: SessionService,
}

impl Services {
    pub fn new(db: Arc<DbPool>, config: &AppConfig) -> Self {
        let session_ttl = chrono::Duration::hours(config.auth.session_ttl_hours as i64);
        Self {
            groups: GroupService::new(db.clone()),
            users: UserService::new(db.clone()),
            sessions: SessionService::new(db, session_ttl),
        }
    }
}
