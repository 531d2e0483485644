//! Capacity-bounded cache with independent per-entry expiry.

use std::time::{Duration, Instant};

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use moka::Expiry;

use crate::observability::metrics;

#[derive(Clone)]
struct Entry<V> {
    value: V,
    ttl: Duration,
}

/// Reads the deadline from the entry itself so each key keeps its own TTL.
struct PerEntryTtl;

impl<V> Expiry<String, Entry<V>> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry<V>, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry<V>,
        _updated_at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// A thread-safe, process-local cache.
///
/// Cloning is cheap and every clone shares the same entries. A read after an
/// entry's deadline is a miss whether or not the entry has been evicted yet.
/// Once the cache is full, the least-recently-used entry is evicted.
#[derive(Clone)]
pub struct TtlCache<V> {
    inner: Cache<String, Entry<V>>,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Create an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let inner = Cache::builder()
            .max_capacity(capacity.max(1) as u64)
            .eviction_policy(EvictionPolicy::lru())
            .expire_after(PerEntryTtl)
            .build();
        Self { inner }
    }

    /// Get a live value and mark it recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.get(key).map(|entry| entry.value)
    }

    /// Whether a live value exists. Does not affect recency.
    pub fn has(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Insert or replace `key`, expiring `ttl` after now.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.inner.insert(key.into(), Entry { value, ttl });
        metrics::record_cache_size(self.inner.entry_count() as usize);
    }

    /// Number of live entries after pending evictions and expirations run.
    pub fn len(&self) -> usize {
        self.inner.run_pending_tasks();
        self.inner.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
