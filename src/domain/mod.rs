//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by the infrastructure layer
//! - Business logic lives in services (see [`crate::application::services`])
//!
//! # Short URL Lifecycle
//!
//! ```text
//! create ──▶ Active ──(update)*──▶ Active ──delete──▶ Deleted (terminal)
//!              │  ▲
//!              └──┘ resolve (click counter only)
//! ```

pub mod entities;
pub mod repositories;
