//! Huddle is a self-hosted community server exposing discussion groups
//! over a REST API.
//!
//! This crate ships the groups module of the larger monolith: the CRUD
//! surface under `/api/groups`, the authorization policy that gates it,
//! and the session plumbing needed to resolve the acting identity.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod auth;
pub mod authz;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;

use config::AppConfig;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<db::DbPool>,
    pub services: services::Services,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self, db::DbError> {
        let db = Arc::new(db::DbPool::from_config(&config.database).await?);
        if config.database.run_migrations() {
            db.run_migrations().await?;
        }

        let services = services::Services::new(db.clone(), &config);

        Ok(Self {
            config: Arc::new(config),
            db,
            services,
        })
    }
}

/// Assemble the router: health probe, API routes behind the identity
/// middleware, and the shared tower layers.
pub fn build_app(config: &AppConfig, state: AppState) -> Router {
    let api_routes = routes::get_api_routes().route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::identity_middleware,
    ));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_bytes))
        .with_state(state)
}
