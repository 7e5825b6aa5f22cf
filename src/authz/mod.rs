//! Authorization for the groups resource.
//!
//! Decisions combine two steps, in order:
//! 1. An ownership override: the creator of a group may do anything to
//!    it, whatever roles they hold.
//! 2. A static grant table from (role, endpoint class) to allowed HTTP
//!    methods.
//!
//! A denial is a structured result, not an error; only a failure to
//! consult the grants at all (an unrecognised route) surfaces as an
//! error, which the route boundary maps to a 500 distinct from the 403
//! denial path.

mod error;
mod policy;

pub use error::AuthzError;
pub use policy::{AuthzResult, GroupEndpoint, authorize, require};
