//! Identity types for authenticated requests.
//!
//! Sessions are opaque bearer tokens looked up in the store; the
//! middleware in `crate::middleware` resolves them and attaches a
//! `CurrentUser` extension. A request without a valid session is not an
//! error here; it simply carries no identity and the authorization
//! policy treats it as guest.

mod error;
mod identity;

pub use error::AuthError;
pub use identity::{CurrentUser, Identity};
