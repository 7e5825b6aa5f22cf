mod common;
mod groups;
mod sessions;
mod users;

pub use groups::SqliteGroupRepo;
pub use sessions::SqliteSessionRepo;
pub use users::SqliteUserRepo;
