//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL and counts the visit.
///
/// # Endpoint
///
/// `GET /{short_code}` (public)
///
/// Answers `307 Temporary Redirect` so that clients do not cache the
/// redirect and every visit reaches the counter.
///
/// # Errors
///
/// Returns 404 if the code is unknown or deleted.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = state.url_service.resolve(&short_code).await?;

    Ok(Redirect::temporary(&url.original_url))
}
