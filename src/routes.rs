//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_code}`  - Short URL redirect (public)
//! - `GET  /health`        - Health check (public)
//! - `POST /auth/*`        - Registration and login (public)
//! - `POST /urls`          - Shorten (bearer token optional)
//! - `*    /urls[/{id}]`   - Management (bearer token required)
//!
//! Static segments win over `/{short_code}`, and the code generator never
//! issues a code equal to one of them.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token, required or optional per route
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routed application without outer middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{short_code}", get(redirect_handler))
        .merge(api::routes::auth_routes())
        .merge(api::routes::optional_auth_routes(state.clone()))
        .merge(api::routes::protected_routes(state.clone()))
        .with_state(state)
}

/// Constructs the application with tracing and trailing-slash normalisation.
///
/// Path normalisation has to wrap the router rather than be a router layer,
/// because routing happens before router layers run.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = build_router(state).layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
