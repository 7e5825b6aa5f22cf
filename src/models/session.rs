use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An opaque bearer-token session.
///
/// Tokens past `expires_at` are ignored on lookup; the request proceeds
/// as guest.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
