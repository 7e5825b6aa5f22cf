//! Identity resolution middleware.
//!
//! Resolves the bearer token (if any) into an identity and attaches it
//! to the request as a `CurrentUser` extension. Requests without a
//! valid session proceed as guest; the authorization policy decides
//! what guests may do. Only a store failure during lookup aborts the
//! request.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    AppState,
    auth::{AuthError, CurrentUser},
};

pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = match bearer_token(req.headers()) {
        Some(token) => state.services.sessions.identity_for_token(token).await?,
        None => None,
    };

    if let Some(identity) = &identity {
        tracing::debug!(
            user_id = %identity.id,
            username = %identity.username,
            "Request authenticated"
        );
    }

    req.extensions_mut().insert(CurrentUser(identity));
    Ok(next.run(req).await)
}

fn bearer_token(headers: &http::HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
