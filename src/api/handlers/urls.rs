//! Handlers for short URL management (create, list, update, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::url::{CreateUrlRequest, CreateUrlResponse, UpdateUrlRequest, UrlResponse};
use crate::api::middleware::{AuthUser, MaybeAuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /urls` (bearer token optional)
///
/// With a valid token the new short URL is owned by the caller; without one
/// it is anonymous and can never be listed, updated or deleted.
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "originalUrl": "https://example.com/some/long/path",
///   "shortUrl": "http://localhost:3000/aB3x_9",
///   "shortCode": "aB3x_9"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if `originalUrl` is missing or not an http(s) URL.
/// Returns 500 if the short URL could not be stored.
pub async fn create_url_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<MaybeAuthUser>,
    Json(payload): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>), AppError> {
    payload.validate()?;

    let created = state
        .url_service
        .create_short_url(&payload.original_url, caller.user_id())
        .await?;

    tracing::info!(
        short_code = %created.short_code,
        owned = created.owner_id.is_some(),
        "Short URL created"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Lists the caller's short URLs, newest first.
///
/// # Endpoint
///
/// `GET /urls` (bearer token required)
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> Result<Json<Vec<UrlResponse>>, AppError> {
    let urls = state.url_service.list_owned(caller.user_id).await?;

    Ok(Json(urls.into_iter().map(UrlResponse::from).collect()))
}

/// Points one of the caller's short URLs at a new original URL.
///
/// # Endpoint
///
/// `PUT /urls/{id}` (bearer token required)
///
/// # Errors
///
/// Returns 404 if the id is unknown, deleted, or owned by someone else.
pub async fn update_url_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<UrlResponse>, AppError> {
    payload.validate()?;

    let updated = state
        .url_service
        .update(id, caller.user_id, &payload.original_url)
        .await?;

    Ok(Json(updated.into()))
}

/// Soft-deletes one of the caller's short URLs.
///
/// # Endpoint
///
/// `DELETE /urls/{id}` (bearer token required)
///
/// # Response
///
/// `204 No Content`; a second delete of the same id returns 404.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = state.url_service.delete(id, caller.user_id).await?;

    tracing::info!(short_code = %deleted.short_code, "Short URL deleted");

    Ok(StatusCode::NO_CONTENT)
}
