use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validators::validate_title;

/// A discussion group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    /// Title of the group
    pub title: String,
    /// Body text shown on the group page
    pub content: String,
    /// Display identity of the account that created the group.
    /// Set once at creation and never changed afterwards.
    pub owner: GroupOwner,
    pub created_at: DateTime<Utc>,
}

/// Minimal display identity of a group's owner.
///
/// Only the account id and display name are ever exposed through the
/// API; no other account fields leak into group responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOwner {
    pub id: Uuid,
    /// None when the owning account no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Request to create a group.
///
/// Only title and content are accepted; the owner is always the
/// authenticated caller and the id is store-generated.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGroup {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Request to replace a group's title and content.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGroup {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_fail_validation() {
        for title in ["", "   ", "\t\n"] {
            let input = CreateGroup {
                title: title.to_string(),
                content: String::new(),
            };
            assert!(input.validate().is_err(), "title {:?} should be rejected", title);
        }
    }

    #[test]
    fn nonblank_title_passes_validation() {
        let input = CreateGroup {
            title: "Rust meetup".to_string(),
            content: String::new(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn owner_display_name_omitted_when_absent() {
        let owner = GroupOwner {
            id: Uuid::new_v4(),
            display_name: None,
        };
        let json = serde_json::to_value(&owner).unwrap();
        assert!(json.get("display_name").is_none());
    }
}
