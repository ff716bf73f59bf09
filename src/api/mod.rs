//! HTTP boundary: turns requests into service calls and service results
//! into JSON responses.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies and their validation
//! - [`handlers`] - One async handler per endpoint
//! - [`middleware`] - Bearer authentication (required or optional) and tracing
//! - [`routes`] - Route tables grouped by authentication mode

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
