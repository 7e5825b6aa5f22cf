use uuid::Uuid;

use crate::models::{Role, User};

/// The acting principal resolved for a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    /// Role labels from the account record.
    pub roles: Vec<Role>,
}

impl Identity {
    /// Check if the identity holds a specific role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            display_name: user.display_name,
            roles: user.roles,
        }
    }
}

/// Request extension carrying the resolved identity, if any.
///
/// Inserted by the identity middleware for every API request, so
/// handlers can rely on its presence.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Identity>);

impl CurrentUser {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}
