//! HTTP layer: translates requests into pipeline calls and formats responses.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing
//! - [`routes`] - Route table under `/deeplink`

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
