//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation
//! - [`password`] - Argon2 password hashing and verification
//! - [`url_validation`] - Original URL validation for request DTOs
//! - [`db_error`] - Classification of PostgreSQL constraint violations

pub mod code_generator;
pub mod db_error;
pub mod password;
pub mod url_validation;
