//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository and
//! cache calls, validation, and business rules. Services consume trait
//! objects injected at construction and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::ResolveService`] - Short code to destination URL, with click tracking
//! - [`services::ConversionService`] - Conversion ledger writes
//! - [`services::RateLimiter`] - Fixed-window per-client counters
//! - [`services::DeeplinkCache`] - Cache-aside deeplink lookups
//! - [`services::AnalyticsRecorder`] - Fire-and-forget click inserts

pub mod services;
