//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ConversionService, ResolveService};
use crate::domain::repositories::DeeplinkRepository;
use crate::infrastructure::cache::CacheService;

/// Services and clients shared across requests.
///
/// Cloned per request by Axum; every field is an `Arc` or `Copy`.
#[derive(Clone)]
pub struct AppState {
    pub resolve_service: Arc<ResolveService>,
    pub conversion_service: Arc<ConversionService>,
    /// Used by the health check to ping the store.
    pub deeplink_repository: Arc<dyn DeeplinkRepository>,
    /// Used by the health check to ping the cache.
    pub cache: Arc<dyn CacheService>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` for the client IP.
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(
        resolve_service: Arc<ResolveService>,
        conversion_service: Arc<ConversionService>,
        deeplink_repository: Arc<dyn DeeplinkRepository>,
        cache: Arc<dyn CacheService>,
        behind_proxy: bool,
    ) -> Self {
        Self {
            resolve_service,
            conversion_service,
            deeplink_repository,
            cache,
            behind_proxy,
        }
    }
}
