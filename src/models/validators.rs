use std::borrow::Cow;

use validator::ValidationError;

/// Reject empty or whitespace-only group titles.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("blank_title");
        err.message = Some(Cow::Borrowed("Title cannot be blank"));
        return Err(err);
    }
    Ok(())
}
