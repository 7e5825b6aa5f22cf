mod groups;
mod sessions;
mod users;

pub use groups::GroupRepo;
pub use sessions::SessionRepo;
pub use users::UserRepo;
