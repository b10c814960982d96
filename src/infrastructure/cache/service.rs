//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store with TTLs and atomic counters.
///
/// Implementations must be thread-safe. Unlike a pure lookup cache, errors
/// are returned to the caller: the rate limiter and the deeplink cache each
/// decide how to degrade (both fail open).
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Reads a string value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on hit
    /// - `Ok(None)` on miss or expired entry
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a string value that expires after `ttl_seconds`.
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Atomically increments the integer at `key`, creating it at 1.
    ///
    /// Returns the post-increment value. A freshly created key has no expiry.
    async fn incr(&self, key: &str) -> CacheResult<i64>;

    /// Sets the time-to-live of an existing key.
    async fn expire(&self, key: &str, ttl_seconds: u64) -> CacheResult<()>;

    /// Removes a key. Returns `true` if something was deleted.
    async fn delete(&self, key: &str) -> CacheResult<bool>;

    /// Checks if the cache backend is reachable.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;
}
