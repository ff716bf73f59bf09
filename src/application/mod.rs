//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations by coordinating repository calls
//! and business rules. They are constructed explicitly with their
//! collaborators at startup and hold no mutable state between calls.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Short URL lifecycle: create, resolve, list, update, delete
//! - [`services::auth_service::AuthService`] - Registration, login and bearer token verification

pub mod services;
