//! Cache-aside lookup of deeplinks.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::Deeplink;
use crate::domain::repositories::DeeplinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, keys::deeplink_key};

/// Deeplink lookups through the fast cache, falling back to the store.
///
/// # Cache Strategy
///
/// - **Cache hit**: Deserialize and return; the store is not touched
/// - **Cache miss**: Query the store for an eligible link, write it to the
///   cache with the configured TTL, then return it
/// - **Cache error or unreadable entry**: Log and treat as a miss
///
/// Entries are never invalidated when the underlying row changes. A link that
/// is deactivated, expires or is deleted after being cached keeps resolving
/// until its entry's TTL runs out.
pub struct DeeplinkCache {
    cache: Arc<dyn CacheService>,
    repository: Arc<dyn DeeplinkRepository>,
    ttl_seconds: u64,
}

impl DeeplinkCache {
    pub fn new(
        cache: Arc<dyn CacheService>,
        repository: Arc<dyn DeeplinkRepository>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            cache,
            repository,
            ttl_seconds,
        }
    }

    /// Returns the deeplink for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store has no eligible link for the code.
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] if the store query fails.
    pub async fn get(&self, code: &str) -> Result<Deeplink, AppError> {
        let key = deeplink_key(code);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Deeplink>(&raw) {
                Ok(link) => {
                    debug!("Cache HIT for {}", key);
                    metrics::counter!("deeplink_cache_hits_total").increment(1);
                    return Ok(link);
                }
                Err(e) => warn!("Discarding unreadable cache entry {}: {}", key, e),
            },
            Ok(None) => debug!("Cache MISS for {}", key),
            Err(e) => warn!("Cache read failed for {}: {}. Falling back to database.", key, e),
        }
        metrics::counter!("deeplink_cache_misses_total").increment(1);

        let link = self
            .repository
            .find_active_by_code(code)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Deeplink expired or invalid", json!({ "code": code }))
            })?;

        match serde_json::to_string(&link) {
            Ok(raw) => {
                if let Err(e) = self.cache.set_ex(&key, &raw, self.ttl_seconds).await {
                    warn!("Failed to cache {}: {}", key, e);
                }
            }
            Err(e) => warn!("Failed to serialize deeplink {}: {}", link.id, e),
        }

        Ok(link)
    }
}
