use moka::future::Cache;
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entry_count: u64,
}

/// Process-wide TTL cache: string keys, JSON-shaped values, fixed
/// time-to-live from insertion.
///
/// Backed by moka, which never returns an entry past its TTL; expired
/// entries are logically absent even before eviction runs. Hit/miss
/// counters cover every `get`, cumulative for the process lifetime.
pub struct TtlCache {
    cache: Cache<String, Value>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_live(ttl).build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let value = self.cache.get(key).await;
        match value {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        value
    }

    /// Overwrites any existing entry for `key` and restarts its TTL.
    pub async fn set(&self, key: String, value: Value) {
        self.cache.insert(key, value).await;
    }

    /// Snapshot of the currently live keys.
    pub async fn keys(&self) -> Vec<String> {
        self.cache.run_pending_tasks().await;
        self.cache.iter().map(|(key, _)| key.as_ref().clone()).collect()
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks().await;

        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.cache.entry_count(),
        }
    }
}
