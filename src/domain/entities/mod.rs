//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A short code mapped to an original URL, optionally owned
//! - [`User`] - A registered account that can own short URLs
//!
//! # Design Pattern
//!
//! Entities are paired with creation structs holding only caller-supplied
//! fields: `NewShortUrl`, `NewUser`. Identifiers and timestamps are assigned
//! by the store.

pub mod short_url;
pub mod user;

pub use short_url::{NewShortUrl, ShortUrl};
pub use user::{NewUser, User};
