//! Argon2id password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use serde_json::json;

use crate::error::AppError;

const SALT_LEN: usize = 16;

/// Hashes `password` into a PHC string with a fresh random salt.
///
/// CPU-bound; async callers should run it on the blocking pool.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the entropy source or hasher fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; SALT_LEN];
    getrandom::fill(&mut salt_bytes).map_err(|e| {
        tracing::error!(error = %e, "Entropy source failed");
        hash_failed()
    })?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        tracing::error!(error = %e, "Salt encoding failed");
        hash_failed()
    })?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "Argon2 hashing failed");
            hash_failed()
        })?;

    Ok(hash.to_string())
}

/// Checks `password` against a stored PHC string.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the stored hash cannot be parsed. A
/// mismatch is `Ok(false)`, not an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash does not parse");
        AppError::internal("Stored password hash is invalid", json!({}))
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn hash_failed() -> AppError {
    AppError::internal("Failed to hash password", json!({}))
}
