//! Response cache (spec §4.2, component C2): a pluggable `Cache` trait plus
//! an in-memory reference implementation.

pub mod key;
mod memory;

pub use memory::InMemoryCache;

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// Object-safe cache contract. Swap-in storage (e.g. a Redis-backed cache)
/// only needs to implement this trait; the orchestrator never depends on
/// `InMemoryCache` directly.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Looks up a previously stored value, returning `None` if absent or
    /// expired.
    async fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Stores a value under `key`. `ttl` of `None` means the entry never
    /// expires on its own (still subject to `clear`).
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Option<Duration>);

    /// True if a live (non-expired) entry exists for `key`.
    async fn has(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    /// Removes a single entry, if present.
    async fn delete(&self, key: &str);

    /// Drops every entry.
    async fn clear(&self);
}
