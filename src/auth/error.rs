use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{db::DbError, routes::ErrorResponse};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session lookup failed: {0}")]
    SessionLookup(#[from] DbError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Authentication error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("An internal error occurred")),
        )
            .into_response()
    }
}
