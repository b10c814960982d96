//! Resolution pipeline: short code in, destination URL out.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::debug;

use super::analytics_recorder::AnalyticsRecorder;
use super::deeplink_cache::DeeplinkCache;
use super::rate_limiter::RateLimiter;
use super::variant_selector::{destination_for, select_variant};
use crate::domain::entities::ClickEvent;
use crate::domain::repositories::{AnalyticsRepository, DeeplinkRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::geo::GeoLookup;

/// Tunables for the pipeline. Defaults are the production values.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Requests allowed per client and code within one window.
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_seconds: u64,
    /// TTL of `dl:{code}` entries.
    pub cache_ttl_seconds: u64,
    /// Upper bound on a detached click insert.
    pub analytics_timeout: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            rate_limit_max_requests: 50,
            rate_limit_window_seconds: 60,
            cache_ttl_seconds: 3600,
            analytics_timeout: Duration::from_secs(5),
        }
    }
}

/// Client request to resolve a short code.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub code: String,
    pub client_ip: String,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// Orchestrates one resolution.
///
/// # Request Flow
///
/// 1. Reject an empty code
/// 2. Count the request against `(client_ip, code)`
/// 3. Fetch the deeplink through the cache
/// 4. Load its variants from the store (never cached)
/// 5. Pick a variant by weight
/// 6. Choose the destination URL
/// 7. Look up the client's location
/// 8. Hand the click to the background recorder
/// 9. Return the destination
///
/// Steps 1-3 end the request on failure. A failing variant query also ends it
/// (the store is down); missing variants or location data do not.
pub struct ResolveService {
    rate_limiter: RateLimiter,
    deeplinks: DeeplinkCache,
    repository: Arc<dyn DeeplinkRepository>,
    geo: Arc<dyn GeoLookup>,
    analytics: AnalyticsRecorder,
}

impl ResolveService {
    /// Builds the pipeline from its shared clients.
    pub fn new(
        cache: Arc<dyn CacheService>,
        repository: Arc<dyn DeeplinkRepository>,
        analytics_repository: Arc<dyn AnalyticsRepository>,
        geo: Arc<dyn GeoLookup>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            rate_limiter: RateLimiter::new(
                cache.clone(),
                settings.rate_limit_max_requests,
                settings.rate_limit_window_seconds,
            ),
            deeplinks: DeeplinkCache::new(cache, repository.clone(), settings.cache_ttl_seconds),
            repository,
            geo,
            analytics: AnalyticsRecorder::new(analytics_repository, settings.analytics_timeout),
        }
    }

    /// Resolves a code using a freshly seeded generator for variant selection.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve_with_rng`].
    pub async fn resolve(&self, request: ResolveRequest) -> Result<String, AppError> {
        let mut rng = StdRng::from_rng(&mut rand::rng());
        self.resolve_with_rng(request, &mut rng).await
    }

    /// Resolves a code, drawing variant selection from `rng`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the code is empty
    /// - [`AppError::RateLimited`] if the client exceeded its window
    /// - [`AppError::NotFound`] if no eligible deeplink exists
    /// - [`AppError::Unavailable`] / [`AppError::Internal`] if the store fails
    pub async fn resolve_with_rng<R>(
        &self,
        request: ResolveRequest,
        rng: &mut R,
    ) -> Result<String, AppError>
    where
        R: Rng + Send + ?Sized,
    {
        let ResolveRequest {
            code,
            client_ip,
            user_agent,
            referrer,
        } = request;

        if code.trim().is_empty() {
            return Err(AppError::bad_request(
                "Deeplink code is required",
                json!({}),
            ));
        }

        self.rate_limiter.check(&client_ip, &code).await?;

        let link = self.deeplinks.get(&code).await?;

        let variants = self.repository.find_variants(&link.id).await?;
        let chosen = select_variant(&variants, rng);
        let destination = destination_for(&link, chosen).to_string();

        let geo = self.geo.lookup(&client_ip).unwrap_or_default();

        self.analytics.record(ClickEvent {
            deeplink_id: link.id.clone(),
            campaign_id: link.campaign_id.clone(),
            variant_id: chosen.map(|v| v.id.clone()),
            ip: client_ip,
            user_agent,
            referrer,
            country: geo.country,
            city: geo.city,
        });

        metrics::counter!("deeplink_resolutions_total").increment(1);
        debug!(
            "Resolved {} -> {} (variant: {:?})",
            code,
            destination,
            chosen.map(|v| v.id.as_str())
        );

        Ok(destination)
    }
}
