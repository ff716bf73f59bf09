//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters and `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Short URL storage, resolution and owner-scoped mutation
//! - [`PgUserRepository`] - User accounts

pub mod pg_url_repository;
pub mod pg_user_repository;

pub use pg_url_repository::PgUrlRepository;
pub use pg_user_repository::PgUserRepository;
