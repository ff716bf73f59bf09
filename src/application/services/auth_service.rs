//! Registration, login and bearer token verification.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

/// Token lifetime when not configured otherwise (one day).
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 86_400;

/// Upper bound on token lifetime (one year).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 365 * 86_400;

/// JWT claims carried by bearer tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: String,
    iat: i64,
    exp: i64,
}

/// A freshly authenticated user and the token issued for them.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Identity provider for the service.
///
/// Passwords are hashed with Argon2id on the blocking thread pool. Tokens are
/// HS256 JWTs whose subject is the user id; verifying one needs no store
/// round trip.
pub struct AuthService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - user store
    /// - `secret` - HMAC key for signing tokens; must be shared by every instance
    /// - `token_ttl_seconds` - lifetime of issued tokens
    pub fn new(repository: Arc<R>, secret: &str, token_ttl_seconds: u64) -> Self {
        let ttl_seconds = i64::try_from(token_ttl_seconds.min(MAX_TOKEN_TTL_SECONDS))
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);

        Self {
            repository,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Registers a new user and signs them in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on hashing, signing or store errors.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        if self.repository.find_by_email(email).await?.is_some() {
            return Err(email_taken(email));
        }

        let password_hash = hash_in_background(password.to_string()).await?;

        let user = self
            .repository
            .create(NewUser {
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| if e.is_conflict() { email_taken(email) } else { e })?;

        let token = self.issue_token(user.id)?;

        Ok(AuthSession { token, user })
    }

    /// Authenticates with email and password.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] ("Invalid credentials") for an
    /// unknown email, a soft-deleted user, or a wrong password alike.
    /// Returns [`AppError::Internal`] on hashing, signing or store errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let Some(user) = self.repository.find_active_by_email(email).await? else {
            return Err(invalid_credentials());
        };

        let valid = verify_in_background(password.to_string(), user.password_hash.clone()).await?;
        if !valid {
            return Err(invalid_credentials());
        }

        let token = self.issue_token(user.id)?;

        Ok(AuthSession { token, user })
    }

    /// Signs a token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if signing fails.
    pub fn issue_token(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Token signing failed");
            AppError::internal("Failed to issue token", json!({}))
        })
    }

    /// Verifies a bearer token and returns the user id it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the signature is wrong, the token
    /// is expired or malformed, or the subject is not a user id.
    pub fn verify_token(&self, token: &str) -> Result<i64, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| invalid_token())?;

        data.claims.sub.parse::<i64>().map_err(|_| invalid_token())
    }
}

async fn hash_in_background(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            AppError::internal("Failed to hash password", json!({}))
        })?
}

async fn verify_in_background(password: String, password_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            AppError::internal("Failed to verify password", json!({}))
        })?
}

fn email_taken(email: &str) -> AppError {
    AppError::conflict("Email already in use", json!({ "email": email }))
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}

fn invalid_token() -> AppError {
    AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid or expired token" }))
}
