//! Business logic services for the application layer.
//!
//! The resolution pipeline is split into one type per step so each can be
//! tested on its own; [`ResolveService`] wires them together.

pub mod analytics_recorder;
pub mod conversion_service;
pub mod deeplink_cache;
pub mod rate_limiter;
pub mod resolve_service;
pub mod variant_selector;

pub use analytics_recorder::AnalyticsRecorder;
pub use conversion_service::ConversionService;
pub use deeplink_cache::DeeplinkCache;
pub use rate_limiter::RateLimiter;
pub use resolve_service::{ResolveRequest, ResolveService, ResolverSettings};
pub use variant_selector::{destination_for, select_variant};
