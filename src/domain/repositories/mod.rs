//! Repository trait definitions for the domain layer.
//!
//! Traits abstract the destination store so the resolution pipeline can run
//! against PostgreSQL in production and against mocks or in-memory fakes in
//! tests.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`DeeplinkRepository`] - Eligible deeplink lookup and variant loading
//! - [`AnalyticsRepository`] - Click and conversion inserts

pub mod analytics_repository;
pub mod deeplink_repository;

pub use analytics_repository::AnalyticsRepository;
pub use deeplink_repository::DeeplinkRepository;

#[cfg(test)]
pub use analytics_repository::MockAnalyticsRepository;
#[cfg(test)]
pub use deeplink_repository::MockDeeplinkRepository;
