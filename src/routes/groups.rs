use axum::{
    Extension, Json, Router,
    extract::{MatchedPath, Path, State},
    http::StatusCode,
    routing::get,
};
use http::Method;
use uuid::Uuid;

use super::error::ApiError;
use crate::{
    AppState,
    auth::CurrentUser,
    authz,
    models::{CreateGroup, Group, UpdateGroup},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list).post(create))
        .route("/groups/{group_id}", get(read).put(update).delete(remove))
}

/// Resolve the `group_id` path parameter into a loaded entity.
///
/// A malformed identifier is rejected before the store is consulted,
/// distinct from the well-formed-but-absent case. The loaded entity is
/// passed explicitly to the policy and the handler body.
async fn resolve_group(state: &AppState, group_id: &str) -> Result<Group, ApiError> {
    let id = Uuid::parse_str(group_id)
        .map_err(|_| ApiError::BadRequest("Group is invalid".to_string()))?;

    state.services.groups.get_by_id(id).await?.ok_or_else(|| {
        ApiError::NotFound("No group with that identifier has been found".to_string())
    })
}

/// List all groups, newest first
#[tracing::instrument(name = "api.groups.list", skip_all)]
pub async fn list(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    path: MatchedPath,
) -> Result<Json<Vec<Group>>, ApiError> {
    authz::require(current_user.identity(), path.as_str(), &Method::GET, None)?;

    let groups = state.services.groups.list().await?;
    Ok(Json(groups))
}

/// Create a group owned by the authenticated caller
#[tracing::instrument(name = "api.groups.create", skip_all)]
pub async fn create(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    path: MatchedPath,
    Json(input): Json<CreateGroup>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    authz::require(current_user.identity(), path.as_str(), &Method::POST, None)?;

    // POST is never granted to guests, so an identity is present here.
    let Some(identity) = current_user.identity() else {
        return Err(ApiError::Forbidden("User is not authorized".to_string()));
    };

    let group = state.services.groups.create(identity, input).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// Show a single group
#[tracing::instrument(name = "api.groups.read", skip(state, current_user, path), fields(%group_id))]
pub async fn read(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    path: MatchedPath,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let group = resolve_group(&state, &group_id).await?;
    authz::require(
        current_user.identity(),
        path.as_str(),
        &Method::GET,
        Some(&group),
    )?;

    Ok(Json(group))
}

/// Replace a group's title and content
#[tracing::instrument(name = "api.groups.update", skip(state, current_user, path, input), fields(%group_id))]
pub async fn update(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    path: MatchedPath,
    Path(group_id): Path<String>,
    Json(input): Json<UpdateGroup>,
) -> Result<Json<Group>, ApiError> {
    let group = resolve_group(&state, &group_id).await?;
    authz::require(
        current_user.identity(),
        path.as_str(),
        &Method::PUT,
        Some(&group),
    )?;

    let updated = state.services.groups.update(group.id, input).await?;
    Ok(Json(updated))
}

/// Delete a group, acknowledging what was removed
#[tracing::instrument(name = "api.groups.delete", skip(state, current_user, path), fields(%group_id))]
pub async fn remove(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    path: MatchedPath,
    Path(group_id): Path<String>,
) -> Result<Json<Group>, ApiError> {
    let group = resolve_group(&state, &group_id).await?;
    authz::require(
        current_user.identity(),
        path.as_str(),
        &Method::DELETE,
        Some(&group),
    )?;

    state.services.groups.delete(group.id).await?;

    // Respond with the entity as it existed before removal.
    Ok(Json(group))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::models::Role;

    /// Create a test application with a unique in-memory database.
    /// Each call creates its own database to avoid test interference.
    async fn test_app() -> (axum::Router, crate::AppState) {
        use std::sync::atomic::{AtomicU64, Ordering};

        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let db_id = COUNTER.fetch_add(1, Ordering::SeqCst);

        let config_str = format!(
            r#"
[database]
type = "sqlite"
path = "file:groups_test_{}?mode=memory&cache=shared"
create_if_missing = true
run_migrations = true
wal_mode = false
busy_timeout_ms = 5000
"#,
            db_id
        );

        let config = crate::config::AppConfig::from_str(&config_str)
            .expect("Failed to parse test config");
        let state = crate::AppState::new(config.clone())
            .await
            .expect("Failed to create AppState");
        (crate::build_app(&config, state.clone()), state)
    }

    /// Seed an account with the given roles plus an active session,
    /// returning the user id and a bearer token.
    async fn seed_user(
        state: &crate::AppState,
        username: &str,
        roles: &[Role],
    ) -> (uuid::Uuid, String) {
        let user = state
            .services
            .users
            .create(crate::models::CreateUser {
                username: username.to_string(),
                display_name: format!("{} Display", username),
                roles: roles.to_vec(),
            })
            .await
            .expect("Failed to create user");
        let session = state
            .services
            .sessions
            .create(user.id)
            .await
            .expect("Failed to create session");
        (user.id, session.token)
    }

    async fn send(
        app: &axum::Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// POST a group as `token` and assert it was created.
    async fn create_group(app: &axum::Router, token: &str, title: &str, content: &str) -> Value {
        let (status, body) = send(
            app,
            "POST",
            "/api/groups",
            Some(token),
            Some(json!({ "title": title, "content": content })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body
    }

    // ========================================================================
    // Guest (unauthenticated) access
    // ========================================================================

    #[tokio::test]
    async fn guest_can_list_groups() {
        let (app, _state) = test_app().await;
        let (status, body) = send(&app, "GET", "/api/groups", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn guest_can_read_a_group() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;
        let created = create_group(&app, &token, "Open meetup", "all welcome").await;

        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());
        let (status, body) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Open meetup");
    }

    #[tokio::test]
    async fn guest_cannot_create() {
        let (app, _state) = test_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/groups",
            None,
            Some(json!({ "title": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "User is not authorized");
    }

    #[tokio::test]
    async fn guest_cannot_update_or_delete() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;
        let created = create_group(&app, &token, "target", "").await;
        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "PUT", &uri, None, Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "User is not authorized");

        let (status, _) = send(&app, "DELETE", &uri, None, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // ========================================================================
    // The "user" role
    // ========================================================================

    #[tokio::test]
    async fn user_can_create_and_sees_expanded_owner() {
        let (app, state) = test_app().await;
        let (user_id, token) = seed_user(&state, "alice", &[Role::User]).await;

        let created = create_group(&app, &token, "Rust meetup", "First Tuesday").await;
        assert!(created["id"].is_string());
        assert_eq!(created["title"], "Rust meetup");
        assert_eq!(created["content"], "First Tuesday");
        assert_eq!(created["owner"]["id"], user_id.to_string());
        assert_eq!(created["owner"]["display_name"], "alice Display");
        // No other owner fields leak into the response.
        assert_eq!(created["owner"].as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn client_supplied_owner_and_id_are_ignored() {
        let (app, state) = test_app().await;
        let (user_id, token) = seed_user(&state, "alice", &[Role::User]).await;

        let rogue_id = uuid::Uuid::new_v4().to_string();
        let (status, body) = send(
            &app,
            "POST",
            "/api/groups",
            Some(&token),
            Some(json!({
                "id": rogue_id,
                "title": "mine anyway",
                "owner": { "id": rogue_id },
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_ne!(body["id"], rogue_id);
        assert_eq!(body["owner"]["id"], user_id.to_string());
    }

    #[tokio::test]
    async fn user_can_read_someone_elses_group() {
        let (app, state) = test_app().await;
        let (_, owner_token) = seed_user(&state, "alice", &[Role::User]).await;
        let (_, reader_token) = seed_user(&state, "bob", &[Role::User]).await;
        let created = create_group(&app, &owner_token, "book club", "").await;

        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());
        let (status, body) = send(&app, "GET", &uri, Some(&reader_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
    }

    #[tokio::test]
    async fn user_cannot_touch_someone_elses_group() {
        let (app, state) = test_app().await;
        let (_, owner_token) = seed_user(&state, "alice", &[Role::User]).await;
        let (_, other_token) = seed_user(&state, "bob", &[Role::User]).await;
        let created = create_group(&app, &owner_token, "private-ish", "").await;
        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(&other_token),
            Some(json!({ "title": "hijacked" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "User is not authorized");

        let (status, _) = send(&app, "DELETE", &uri, Some(&other_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // The group is untouched.
        let (_, body) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(body["title"], "private-ish");
    }

    // ========================================================================
    // Ownership override
    // ========================================================================

    #[tokio::test]
    async fn owner_can_update_own_group() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;
        let created = create_group(&app, &token, "before", "old body").await;
        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(&token),
            Some(json!({ "title": "after", "content": "new body" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "after");
        assert_eq!(body["content"], "new body");
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["owner"]["id"], created["owner"]["id"]);
        assert_eq!(body["created_at"], created["created_at"]);
    }

    #[tokio::test]
    async fn owner_can_delete_own_group() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;
        let created = create_group(&app, &token, "short-lived", "").await;
        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        // The response acknowledges what was deleted.
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["title"], "short-lived");

        let (status, body) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["message"],
            "No group with that identifier has been found"
        );
    }

    #[tokio::test]
    async fn account_without_roles_has_no_table_grants() {
        let (app, state) = test_app().await;
        // Holds no roles at all; only ownership could let it in.
        let (_, token) = seed_user(&state, "roleless", &[]).await;
        let (_, admin_token) = seed_user(&state, "root", &[Role::Admin]).await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/groups",
            Some(&token),
            Some(json!({ "title": "blocked" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let created = create_group(&app, &admin_token, "admin owned", "").await;
        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    // ========================================================================
    // The "admin" role
    // ========================================================================

    #[tokio::test]
    async fn admin_can_do_everything_to_any_group() {
        let (app, state) = test_app().await;
        let (_, user_token) = seed_user(&state, "alice", &[Role::User]).await;
        let (_, admin_token) = seed_user(&state, "root", &[Role::Admin]).await;

        let created = create_group(&app, &user_token, "users group", "").await;
        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());

        let (status, _) = send(&app, "GET", &uri, Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(&admin_token),
            Some(json!({ "title": "moderated" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "moderated");
        // The owner did not change.
        assert_eq!(body["owner"]["id"], created["owner"]["id"]);

        let (status, _) = send(&app, "DELETE", &uri, Some(&admin_token), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    // ========================================================================
    // Validation and path resolution
    // ========================================================================

    #[tokio::test]
    async fn blank_title_is_rejected_and_not_persisted() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;

        for title in ["", "   "] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/groups",
                Some(&token),
                Some(json!({ "title": title, "content": "body" })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["message"], "Title cannot be blank");
        }

        let (_, body) = send(&app, "GET", "/api/groups", None, None).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn blank_title_on_update_is_rejected() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;
        let created = create_group(&app, &token, "keep me", "").await;
        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "PUT", &uri, Some(&token), Some(json!({ "title": " " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Title cannot be blank");
    }

    #[tokio::test]
    async fn malformed_id_is_a_bad_request() {
        let (app, _state) = test_app().await;
        let (status, body) = send(&app, "GET", "/api/groups/not-a-valid-id", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Group is invalid");
    }

    #[tokio::test]
    async fn absent_id_is_not_found() {
        let (app, _state) = test_app().await;
        let uri = format!("/api/groups/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["message"],
            "No group with that identifier has been found"
        );
    }

    // ========================================================================
    // Round trips and ordering
    // ========================================================================

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;
        let created = create_group(&app, &token, "round trip", "the body").await;

        let uri = format!("/api/groups/{}", created["id"].as_str().unwrap());
        let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], created["title"]);
        assert_eq!(body["content"], created["content"]);
        assert_eq!(body["owner"], created["owner"]);
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let (app, state) = test_app().await;
        let (_, token) = seed_user(&state, "alice", &[Role::User]).await;

        let first = create_group(&app, &token, "g1", "").await;
        let second = create_group(&app, &token, "g2", "").await;

        let (status, body) = send(&app, "GET", "/api/groups", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], second["id"]);
        assert_eq!(items[1]["id"], first["id"]);
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    #[tokio::test]
    async fn unknown_token_is_treated_as_guest() {
        let (app, _state) = test_app().await;

        let (status, _) = send(&app, "GET", "/api/groups", Some("bogus-token"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            "POST",
            "/api/groups",
            Some("bogus-token"),
            Some(json!({ "title": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn health_probe_is_unauthenticated() {
        let (app, _state) = test_app().await;
        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
