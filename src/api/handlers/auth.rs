//! Handlers for registration and login.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{AuthRequest, AuthResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account and returns a bearer token for it.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiJ9...", "user": { "id": 1, "email": "ana@example.com" } }
/// ```
///
/// # Errors
///
/// Returns 400 for an invalid email or a password shorter than 6 characters.
/// Returns 409 if the email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .register(&payload.email, &payload.password)
        .await?;

    tracing::info!(user_id = session.user.id, "User registered");

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Exchanges email and password for a bearer token.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns 401 "Invalid credentials" for an unknown email, a deleted account
/// or a wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Unauthorized { .. }) {
                tracing::warn!("Failed login attempt");
            }
        })?;

    Ok(Json(session.into()))
}
