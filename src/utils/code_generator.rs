//! Short code generation.
//!
//! Codes are drawn uniformly from a 64-symbol URL-safe alphabet using the
//! operating system CSPRNG. No uniqueness check is made against the store;
//! the store's unique constraint is authoritative and the lifecycle engine
//! retries on collision.

use crate::error::AppError;
use serde_json::json;

/// Length of generated codes when not configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Accepted bounds for the configured code length.
pub const MIN_CODE_LENGTH: usize = 4;
pub const MAX_CODE_LENGTH: usize = 32;

/// URL-safe alphabet. Exactly 64 symbols, so `byte & 63` is uniform.
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Codes that would shadow a top-level route.
const RESERVED_CODES: &[&str] = &["health", "urls", "auth"];

const MAX_DRAWS: usize = 8;

/// Source of fresh short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Produces a new random code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the entropy source fails.
    fn generate(&self) -> Result<String, AppError>;
}

/// Fixed-length random code generator backed by `getrandom`.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator producing codes of `length` characters.
    ///
    /// `length` is clamped to `MIN_CODE_LENGTH..=MAX_CODE_LENGTH`.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> Result<String, AppError> {
        for _ in 0..MAX_DRAWS {
            let code = random_code(self.length).map_err(|e| {
                tracing::error!(error = %e, "Entropy source failed");
                AppError::internal("Failed to generate short code", json!({}))
            })?;

            if !is_reserved(&code) {
                return Ok(code);
            }
        }

        tracing::error!("Only reserved codes drawn");
        Err(AppError::internal("Failed to generate short code", json!({})))
    }
}

fn random_code(length: usize) -> Result<String, getrandom::Error> {
    let mut buffer = vec![0u8; length];
    getrandom::fill(&mut buffer)?;

    Ok(buffer
        .iter()
        .map(|b| char::from(ALPHABET[usize::from(b & 63)]))
        .collect())
}

/// Returns true if `code` shadows a top-level route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}

/// Returns true if `code` could have been issued by the generator.
///
/// Lets the redirect path reject garbage without a store round trip.
pub fn is_well_formed(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code.bytes().all(|b| ALPHABET.contains(&b))
}
