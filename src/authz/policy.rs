use http::Method;

use super::error::AuthzError;
use crate::{
    auth::Identity,
    models::{Group, Role},
};

/// Denial message returned to callers.
const DENIED: &str = "User is not authorized";

/// The two route shapes the policy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEndpoint {
    /// `/api/groups`
    Collection,
    /// `/api/groups/{group_id}`
    Item,
}

impl GroupEndpoint {
    /// Classify a matched route path as one of the group endpoints.
    ///
    /// An unrecognised path means the grants cannot be consulted at
    /// all: a policy evaluation failure, not a denial.
    pub fn from_route_path(path: &str) -> Result<Self, AuthzError> {
        match path {
            "/api/groups" => Ok(GroupEndpoint::Collection),
            "/api/groups/{group_id}" => Ok(GroupEndpoint::Item),
            _ => Err(AuthzError::PolicyEvaluation(format!(
                "No grants registered for route '{}'",
                path
            ))),
        }
    }
}

/// Result of an authorization check.
#[derive(Debug, Clone)]
pub struct AuthzResult {
    /// Whether access is allowed
    pub allowed: bool,
    /// Human-readable reason for a denial
    pub reason: Option<String>,
}

impl AuthzResult {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// Methods the static grant table allows for a role on an endpoint.
fn role_permits(role: Role, endpoint: GroupEndpoint, method: &Method) -> bool {
    match (role, endpoint) {
        (Role::Admin, _) => true,
        (Role::User, GroupEndpoint::Collection) => {
            *method == Method::GET || *method == Method::POST
        }
        (Role::User, GroupEndpoint::Item) => *method == Method::GET,
        (Role::Guest, _) => *method == Method::GET,
    }
}

/// Decide whether `identity` may perform `method` against the route at
/// `route_path`, with `group` being the entity already resolved for
/// item routes.
///
/// The ownership override is checked first and short-circuits the grant
/// table: when a group has been resolved and the authenticated identity
/// created it, any method is allowed.
pub fn authorize(
    identity: Option<&Identity>,
    route_path: &str,
    method: &Method,
    group: Option<&Group>,
) -> Result<AuthzResult, AuthzError> {
    if let (Some(group), Some(identity)) = (group, identity) {
        if group.owner.id == identity.id {
            return Ok(AuthzResult::allow());
        }
    }

    let endpoint = GroupEndpoint::from_route_path(route_path)?;

    // Unauthenticated requests are evaluated as guest.
    let roles: &[Role] = match identity {
        Some(identity) => &identity.roles,
        None => &[Role::Guest],
    };

    if roles
        .iter()
        .any(|role| role_permits(*role, endpoint, method))
    {
        Ok(AuthzResult::allow())
    } else {
        Ok(AuthzResult::deny(DENIED))
    }
}

/// Check authorization and return an error if denied.
pub fn require(
    identity: Option<&Identity>,
    route_path: &str,
    method: &Method,
    group: Option<&Group>,
) -> Result<(), AuthzError> {
    let result = authorize(identity, route_path, method, group)?;
    if result.allowed {
        Ok(())
    } else {
        tracing::debug!(
            path = %route_path,
            method = %method,
            user = identity.map(|i| i.username.as_str()).unwrap_or("guest"),
            "Request denied by policy"
        );
        Err(AuthzError::access_denied(
            result.reason.unwrap_or_else(|| DENIED.to_string()),
        ))
    }
}
