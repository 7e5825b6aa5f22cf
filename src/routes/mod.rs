mod error;
pub mod groups;
pub mod health;

use axum::Router;
pub use error::{ApiError, ErrorResponse};

use crate::AppState;

/// Routes mounted under `/api`.
pub fn get_api_routes() -> Router<AppState> {
    Router::new().merge(groups::routes())
}
