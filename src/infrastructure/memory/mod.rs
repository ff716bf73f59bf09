//! In-process repository implementations.
//!
//! Used when no database is configured, and as the store behind the HTTP
//! integration tests. State lives behind a [`tokio::sync::Mutex`], so every
//! operation observes and mutates the store as one critical section, the
//! same guarantee the PostgreSQL implementations get from single statements.
//!
//! Nothing is persisted across restarts.

pub mod in_memory_url_repository;
pub mod in_memory_user_repository;

pub use in_memory_url_repository::InMemoryUrlRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
