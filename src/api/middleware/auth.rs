//! Bearer token authentication middleware.
//!
//! Two layers share the same token handling:
//!
//! - [`layer`] requires a valid token and rejects the request otherwise.
//! - [`optional_layer`] never rejects; a missing or invalid token leaves the
//!   caller anonymous.
//!
//! The verified identity is attached to the request as an extension and read
//! by handlers with `Extension<AuthUser>` or `Extension<MaybeAuthUser>`.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Identity of an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Identity of a caller on an endpoint where authentication is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<i64> {
        self.0.map(|user| user.user_id)
    }
}

/// Requires a valid bearer token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header
/// is missing, is not a bearer credential, or carries an invalid or expired
/// token.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/urls", get(list_urls_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = bearer_token(&mut parts).await.ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({ "reason": "Authorization header is missing or invalid" }),
        )
    })?;

    let user_id = st.auth_service.verify_token(&token)?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(req).await)
}

/// Attaches the caller's identity if a valid bearer token is present.
///
/// Always inserts a [`MaybeAuthUser`]; it is `None` when the header is
/// absent or the token does not verify.
pub async fn optional_layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let user = match bearer_token(&mut parts).await {
        Some(token) => match st.auth_service.verify_token(&token) {
            Ok(user_id) => Some(AuthUser { user_id }),
            Err(_) => {
                tracing::debug!("Ignoring invalid bearer token on optional route");
                None
            }
        },
        None => None,
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(MaybeAuthUser(user));

    next.run(req).await
}

async fn bearer_token(parts: &mut Parts) -> Option<String> {
    AuthBearer::from_request_parts(parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token)
        .filter(|token| !token.is_empty())
}
