//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx. Every
//! query is parameterized; rows are decoded through private `FromRow`
//! structs and converted into domain entities.
//!
//! # Repositories
//!
//! - [`PgDeeplinkRepository`] - Eligible deeplink lookup and variant loading
//! - [`PgAnalyticsRepository`] - Click and conversion inserts

pub mod pg_analytics_repository;
pub mod pg_deeplink_repository;

pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_deeplink_repository::PgDeeplinkRepository;
