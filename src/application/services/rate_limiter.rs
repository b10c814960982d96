//! Fixed-window rate limiting per client and short code.

use std::sync::Arc;

use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, keys::rate_limit_key};

/// Counts requests per `(client_ip, code)` in a fixed window.
///
/// The window opens with the first request and lasts `window_seconds`; it is
/// not sliding. Counting relies on the cache's atomic increment, so the
/// limiter itself holds no state.
pub struct RateLimiter {
    cache: Arc<dyn CacheService>,
    max_requests: i64,
    window_seconds: u64,
}

impl RateLimiter {
    pub fn new(cache: Arc<dyn CacheService>, max_requests: u32, window_seconds: u64) -> Self {
        Self {
            cache,
            max_requests: i64::from(max_requests),
            window_seconds,
        }
    }

    /// Registers one request and decides whether it may proceed.
    ///
    /// The counter is created at 1 and given its expiry on that first
    /// increment only. Requests beyond `max_requests` within the window are
    /// rejected.
    ///
    /// If the cache cannot count, the request is allowed and a warning is
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] once the post-increment count exceeds
    /// the limit.
    pub async fn check(&self, client_ip: &str, code: &str) -> Result<(), AppError> {
        let key = rate_limit_key(client_ip, code);

        let hits = match self.cache.incr(&key).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!("Rate limit counter unavailable for {}: {}. Allowing request.", key, e);
                return Ok(());
            }
        };

        if hits == 1
            && let Err(e) = self.cache.expire(&key, self.window_seconds).await
        {
            // A counter without TTL would block this client forever.
            warn!("Failed to set window on {}: {}. Dropping counter.", key, e);
            if let Err(e) = self.cache.delete(&key).await {
                warn!("Failed to drop counter {}: {}", key, e);
            }
        }

        if hits > self.max_requests {
            metrics::counter!("deeplink_rate_limited_total").increment(1);
            warn!(
                client_ip = %client_ip,
                code = %code,
                hits,
                "Rate limit exceeded"
            );
            return Err(AppError::rate_limited(
                "Too many requests",
                json!({ "limit": self.max_requests, "window_seconds": self.window_seconds }),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::{CacheError, MemoryCache, MockCacheService};
    use std::time::Duration;

    #[tokio::test]
    async fn test_fiftieth_allowed_fifty_first_rejected() {
        let limiter = RateLimiter::new(Arc::new(MemoryCache::new()), 50, 60);

        for _ in 0..50 {
            assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
        }

        let result = limiter.check("10.0.0.1", "abc123").await;
        assert!(matches!(result, Err(AppError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let limiter = RateLimiter::new(Arc::new(MemoryCache::new()), 50, 1);

        for _ in 0..51 {
            let _ = limiter.check("10.0.0.1", "abc123").await;
        }
        assert!(limiter.check("10.0.0.1", "abc123").await.is_err());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        for _ in 0..50 {
            assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
        }
        assert!(limiter.check("10.0.0.1", "abc123").await.is_err());
    }

    #[tokio::test]
    async fn test_window_is_fixed_not_sliding() {
        let limiter = RateLimiter::new(Arc::new(MemoryCache::new()), 2, 2);

        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());

        // The window opened by the first request closes even though the
        // second request was recent.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
        assert!(limiter.check("10.0.0.1", "abc123").await.is_err());
    }

    #[tokio::test]
    async fn test_counters_are_per_client_and_code() {
        let limiter = RateLimiter::new(Arc::new(MemoryCache::new()), 1, 60);

        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
        assert!(limiter.check("10.0.0.1", "abc123").await.is_err());

        assert!(limiter.check("10.0.0.2", "abc123").await.is_ok());
        assert!(limiter.check("10.0.0.1", "other").await.is_ok());
    }

    #[tokio::test]
    async fn test_expiry_set_only_on_first_increment() {
        let mut cache = MockCacheService::new();
        cache
            .expect_incr()
            .withf(|key| key == "dl:ip:10.0.0.1:abc123")
            .times(1)
            .returning(|_| Ok(1));
        cache
            .expect_expire()
            .withf(|key, ttl| key == "dl:ip:10.0.0.1:abc123" && *ttl == 60)
            .times(1)
            .returning(|_, _| Ok(()));

        let limiter = RateLimiter::new(Arc::new(cache), 50, 60);
        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());

        let mut cache = MockCacheService::new();
        cache.expect_incr().times(1).returning(|_| Ok(7));
        cache.expect_expire().times(0);

        let limiter = RateLimiter::new(Arc::new(cache), 50, 60);
        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_counter_failure_fails_open() {
        let mut cache = MockCacheService::new();
        cache
            .expect_incr()
            .returning(|_| Err(CacheError::OperationError("down".to_string())));
        cache.expect_expire().times(0);

        let limiter = RateLimiter::new(Arc::new(cache), 50, 60);
        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_expire_drops_counter() {
        let mut cache = MockCacheService::new();
        cache.expect_incr().returning(|_| Ok(1));
        cache
            .expect_expire()
            .returning(|_, _| Err(CacheError::OperationError("down".to_string())));
        cache.expect_delete().times(1).returning(|_| Ok(true));

        let limiter = RateLimiter::new(Arc::new(cache), 50, 60);
        assert!(limiter.check("10.0.0.1", "abc123").await.is_ok());
    }
}
