use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Result;

/// Counters for one named cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries removed by TTL expiry or capacity pressure.
    pub evictions: u64,
    /// Entries currently held, including expired ones not yet reclaimed.
    pub size: usize,
}

/// A set of named caches, each with its own policy.
///
/// Every mutation of cached state goes through this trait.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Gets a value from the named cache.
    async fn get(&self, cache: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a value in the named cache.
    async fn put(&self, cache: &str, key: &str, value: &[u8]) -> Result<()>;

    /// Stores a value only if the named cache has not been evicted since
    /// `epoch` was read. Returns whether the value was stored.
    async fn put_if_current(
        &self,
        cache: &str,
        key: &str,
        value: &[u8],
        epoch: u64,
    ) -> Result<bool>;

    /// Returns the eviction epoch of the named cache. It increases on every
    /// `evict_all`.
    async fn epoch(&self, cache: &str) -> Result<u64>;

    /// Removes every entry from the named cache.
    async fn evict_all(&self, cache: &str) -> Result<()>;

    /// Names of all provisioned caches, sorted.
    async fn names(&self) -> Vec<String>;

    /// Reads the counters of the named cache without touching its entries.
    async fn stats(&self, cache: &str) -> Result<CacheStats>;
}
