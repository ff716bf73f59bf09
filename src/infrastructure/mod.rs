//! Infrastructure layer for external integrations.
//!
//! This layer implements the repository traits defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-process implementations used when no database is
//!   configured, and by the test suite
//!
//! # Migrations
//!
//! The PostgreSQL schema lives in `migrations/` and is applied at startup by
//! [`run_migrations`].

pub mod memory;
pub mod persistence;

use sqlx::PgPool;

/// Applies pending migrations from `./migrations`.
///
/// # Errors
///
/// Returns an error if a migration fails or the database is unreachable.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
