//! API route configuration.

use crate::api::handlers::{
    create_url_handler, delete_url_handler, list_urls_handler, login_handler, register_handler,
    update_url_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

/// Owner-scoped short URL management, bearer token required.
///
/// # Endpoints
///
/// - `GET    /urls`       - List the caller's short URLs
/// - `PUT    /urls/{id}`  - Change the original URL
/// - `DELETE /urls/{id}`  - Soft-delete
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler))
        .route("/urls/{id}", put(update_url_handler).delete(delete_url_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}

/// Short URL creation, bearer token optional.
///
/// # Endpoints
///
/// - `POST /urls` - Shorten a URL, owned by the caller if authenticated
pub fn optional_auth_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_url_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::optional_layer))
}

/// Identity endpoints.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account
/// - `POST /auth/login`    - Obtain a bearer token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}
