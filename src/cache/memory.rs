//! `InMemoryCache` — a single-tier, TTL-aware reference implementation of
//! [`Cache`], grounded on the teacher's multi-tier `CacheManager` but
//! collapsed to the single tier the spec's response cache calls for.

use super::Cache;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        matches!(self.expires_at, Some(at) if Instant::now() > at)
    }
}

/// A process-local cache backed by a mutex-guarded `HashMap`. Expired
/// entries are evicted lazily, on the next `get`/`has`/`set` that touches
/// them, rather than by a background sweep.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of entries currently stored, including not-yet-evicted expired
    /// ones. Exposed for tests.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Option<Duration>) {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value,
                expires_at,
            },
        );
    }

    async fn has(&self, key: &str) -> bool {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    async fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn round_trips_a_value() {
        let cache = InMemoryCache::new();
        cache.set("k", json!({"a": 1}), None).await;
        assert_eq!(cache.get("k").await, Some(json!({"a": 1})));
        assert!(cache.has("k").await);
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("missing").await, None);
        assert!(!cache.has("missing").await);
    }

    #[tokio::test]
    async fn expired_entry_is_evicted_on_access() {
        let cache = InMemoryCache::new();
        cache
            .set("k", json!("v"), Some(Duration::from_millis(1)))
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let cache = InMemoryCache::new();
        cache.set("a", json!(1), None).await;
        cache.set("b", json!(2), None).await;
        cache.delete("a").await;
        assert!(!cache.has("a").await);
        assert!(cache.has("b").await);
        cache.clear().await;
        assert!(!cache.has("b").await);
    }
}
