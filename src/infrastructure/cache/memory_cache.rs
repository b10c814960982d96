//! In-process cache with TTLs, for development and tests.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use moka::future::Cache;
use moka::ops::compute::Op;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on live keys. Past it, least-used entries are evicted first.
const MAX_ENTRIES: u64 = 100_000;

#[derive(Clone)]
struct Slot {
    value: String,
    /// TTL to apply on this write. `None` keeps whatever expiry the key has.
    ttl: Option<Duration>,
}

/// Per-entry TTL taken from the write that stored it.
struct SlotExpiry;

impl Expiry<String, Slot> for SlotExpiry {
    fn expire_after_create(&self, _key: &String, slot: &Slot, _created_at: Instant) -> Option<Duration> {
        slot.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        slot: &Slot,
        _updated_at: Instant,
        duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        slot.ttl.or(duration_until_expiry)
    }
}

/// A cache that lives inside the process, backed by `moka`.
///
/// Expired entries are dropped by moka's housekeeping whether or not they
/// are read again, and the key count is capped. `incr`
/// and `expire` run through moka's per-key compute API, so they are atomic
/// per key the way Redis commands are.
///
/// Counters are not shared between instances: only use this when a single
/// process serves all traffic.
pub struct MemoryCache {
    inner: Cache<String, Slot>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(MAX_ENTRIES)
                .expire_after(SlotExpiry)
                .build(),
        }
    }
}

impl MemoryCache {
    pub fn new() -> Self {
        debug!("Using MemoryCache (moka, max {} entries)", MAX_ENTRIES);
        Self::default()
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.inner.get(key).await.map(|slot| slot.value))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        self.inner
            .insert(
                key.to_string(),
                Slot {
                    value: value.to_string(),
                    ttl: Some(Duration::from_secs(ttl_seconds)),
                },
            )
            .await;
        Ok(())
    }

    async fn incr(&self, key: &str) -> CacheResult<i64> {
        let entry = self
            .inner
            .entry_by_ref(key)
            .and_upsert_with(|current| async move {
                let value = match current {
                    Some(entry) => {
                        let value = entry.into_value().value;
                        match value.parse::<i64>() {
                            Ok(n) => n.saturating_add(1).to_string(),
                            // Left untouched; reported below.
                            Err(_) => value,
                        }
                    }
                    None => "1".to_string(),
                };
                Slot { value, ttl: None }
            })
            .await;

        entry.into_value().value.parse().map_err(|_| {
            CacheError::OperationError(format!("value at {} is not an integer", key))
        })
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> CacheResult<()> {
        let ttl = Duration::from_secs(ttl_seconds);

        self.inner
            .entry_by_ref(key)
            .and_compute_with(|current| async move {
                match current {
                    Some(entry) => Op::Put(Slot {
                        value: entry.into_value().value,
                        ttl: Some(ttl),
                    }),
                    None => Op::Nop,
                }
            })
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<bool> {
        Ok(self.inner.remove(key).await.is_some())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
