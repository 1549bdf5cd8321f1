//! In-memory cache implementation with LRU eviction.
//!
//! Each named cache is an `LruCache` behind its own `tokio::sync::Mutex`, so
//! different names never contend. The name map sits behind a `RwLock` and is
//! only write-locked when an unlisted name is provisioned.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use wellca_core::cache::{Cache, CachePolicy, CacheStats, ExpiryMode, PolicyTable, Result};

/// A single cached value with the timestamps its expiry depends on.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    inserted_at: Instant,
    last_access: Instant,
}

impl CacheEntry {
    fn new(value: Vec<u8>, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
            last_access: now,
        }
    }

    /// Returns true if the entry has outlived the policy's TTL.
    fn is_expired(&self, policy: &CachePolicy, now: Instant) -> bool {
        let since = match policy.expiry {
            ExpiryMode::AfterWrite => self.inserted_at,
            ExpiryMode::AfterAccess => self.last_access,
        };
        now.duration_since(since) >= policy.ttl
    }
}

/// One named cache: its entries, policy, counters and eviction epoch.
#[derive(Debug)]
struct NamedCache {
    policy: CachePolicy,
    entries: LruCache<String, CacheEntry>,
    hits: u64,
    misses: u64,
    evictions: u64,
    epoch: u64,
}

impl NamedCache {
    fn new(policy: CachePolicy) -> Self {
        let capacity = NonZeroUsize::new(policy.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            policy,
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
            evictions: 0,
            epoch: 0,
        }
    }

    fn get(&mut self, key: &str, now: Instant) -> Option<Vec<u8>> {
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.is_expired(&self.policy, now),
            None => {
                self.misses += 1;
                return None;
            }
        };

        if expired {
            // Lazy cleanup: expired entries are reclaimed when touched
            self.entries.pop(key);
            self.evictions += 1;
            self.misses += 1;
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.last_access = now;
        self.hits += 1;
        Some(entry.value.clone())
    }

    fn put(&mut self, key: &str, value: &[u8], now: Instant) {
        let entry = CacheEntry::new(value.to_vec(), now);
        if let Some((displaced, _)) = self.entries.push(key.to_string(), entry) {
            // `push` hands back the old value on overwrite; only a different
            // key means capacity pushed something out
            if displaced != key {
                self.evictions += 1;
            }
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.epoch += 1;
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.entries.len(),
        }
    }
}

/// In-memory implementation of the named cache tier.
///
/// Caches listed in the policy table are provisioned up front. Any other
/// name is provisioned with the table's fallback policy on first use.
/// Expiry is lazy: entries past their TTL are removed when next read.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    caches: Arc<RwLock<HashMap<String, Arc<Mutex<NamedCache>>>>>,
    policies: Arc<PolicyTable>,
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(PolicyTable::standard())
    }
}

impl MemoryCache {
    /// Creates a cache tier with one cache per entry in the policy table.
    pub fn new(policies: PolicyTable) -> Self {
        let caches = policies
            .iter()
            .map(|(name, policy)| {
                (
                    name.to_string(),
                    Arc::new(Mutex::new(NamedCache::new(*policy))),
                )
            })
            .collect();

        Self {
            caches: Arc::new(RwLock::new(caches)),
            policies: Arc::new(policies),
        }
    }

    /// Returns the named cache, provisioning it if needed.
    async fn named(&self, name: &str) -> Arc<Mutex<NamedCache>> {
        if let Some(cache) = self.caches.read().await.get(name) {
            return Arc::clone(cache);
        }

        let mut caches = self.caches.write().await;
        let cache = caches.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!(cache = name, "Provisioning cache with fallback policy");
            Arc::new(Mutex::new(NamedCache::new(self.policies.policy_for(name))))
        });
        Arc::clone(cache)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, cache: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let named = self.named(cache).await;
        let mut named = named.lock().await;
        Ok(named.get(key, Instant::now()))
    }

    async fn put(&self, cache: &str, key: &str, value: &[u8]) -> Result<()> {
        let named = self.named(cache).await;
        named.lock().await.put(key, value, Instant::now());
        Ok(())
    }

    async fn put_if_current(
        &self,
        cache: &str,
        key: &str,
        value: &[u8],
        epoch: u64,
    ) -> Result<bool> {
        let named = self.named(cache).await;
        let mut named = named.lock().await;
        if named.epoch != epoch {
            return Ok(false);
        }
        named.put(key, value, Instant::now());
        Ok(true)
    }

    async fn epoch(&self, cache: &str) -> Result<u64> {
        let named = self.named(cache).await;
        let epoch = named.lock().await.epoch;
        Ok(epoch)
    }

    async fn evict_all(&self, cache: &str) -> Result<()> {
        let named = self.named(cache).await;
        named.lock().await.clear();
        Ok(())
    }

    async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    async fn stats(&self, cache: &str) -> Result<CacheStats> {
        // Reading stats must not provision a cache
        let Some(named) = self.caches.read().await.get(cache).cloned() else {
            return Ok(CacheStats::default());
        };
        let stats = named.lock().await.stats();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wellca_core::cache::{
        CHART_DATA, RECORD_BY_DATE, RECORD_RANGE, SERVICE_DETAILS, USER_PRODUCTIVITY,
    };

    const MINUTE: Duration = Duration::from_secs(60);

    fn small_cache(max_entries: usize) -> MemoryCache {
        MemoryCache::new(
            PolicyTable::new(CachePolicy::default())
                .with("small", CachePolicy::expire_after_write(30, max_entries)),
        )
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = MemoryCache::default();

        cache.put(RECORD_BY_DATE, "date:2024-03-01", b"{}").await.unwrap();
        let result = cache.get(RECORD_BY_DATE, "date:2024-03-01").await.unwrap();

        assert_eq!(result, Some(b"{}".to_vec()));
    }

    #[tokio::test]
    async fn test_same_key_in_different_caches_is_independent() {
        let cache = MemoryCache::default();

        cache.put(CHART_DATA, "monthly:2024-03", b"chart").await.unwrap();

        assert!(cache
            .get(SERVICE_DETAILS, "monthly:2024-03")
            .await
            .unwrap()
            .is_none());
        assert!(cache
            .get(CHART_DATA, "monthly:2024-03")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_hits_and_misses_are_counted() {
        let cache = MemoryCache::default();

        cache.get(CHART_DATA, "k").await.unwrap();
        cache.put(CHART_DATA, "k", b"v").await.unwrap();
        cache.get(CHART_DATA, "k").await.unwrap();
        cache.get(CHART_DATA, "k").await.unwrap();

        let stats = cache.stats(CHART_DATA).await.unwrap();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.size, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_expiry_ignores_reads() {
        let cache = MemoryCache::default();
        cache.put(RECORD_RANGE, "range", b"v").await.unwrap();

        tokio::time::advance(10 * MINUTE).await;
        assert!(cache.get(RECORD_RANGE, "range").await.unwrap().is_some());

        // The read above must not extend the 15 minute lifetime
        tokio::time::advance(5 * MINUTE).await;
        assert!(cache.get(RECORD_RANGE, "range").await.unwrap().is_none());

        let stats = cache.stats(RECORD_RANGE).await.unwrap();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.size, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_expiry_is_refreshed_by_reads() {
        let cache = MemoryCache::default();
        cache.put(USER_PRODUCTIVITY, "user", b"v").await.unwrap();

        tokio::time::advance(15 * MINUTE).await;
        assert!(cache.get(USER_PRODUCTIVITY, "user").await.unwrap().is_some());

        // 30 minutes since insertion but only 15 since the last read
        tokio::time::advance(15 * MINUTE).await;
        assert!(cache.get(USER_PRODUCTIVITY, "user").await.unwrap().is_some());

        tokio::time::advance(20 * MINUTE).await;
        assert!(cache.get(USER_PRODUCTIVITY, "user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = small_cache(3);

        cache.put("small", "key1", b"value1").await.unwrap();
        cache.put("small", "key2", b"value2").await.unwrap();
        cache.put("small", "key3", b"value3").await.unwrap();

        // Access key1 to make it recently used
        cache.get("small", "key1").await.unwrap();

        // Insert a 4th entry - should evict key2 (least recently used)
        cache.put("small", "key4", b"value4").await.unwrap();

        assert!(cache.get("small", "key1").await.unwrap().is_some());
        assert!(cache.get("small", "key2").await.unwrap().is_none());
        assert!(cache.get("small", "key3").await.unwrap().is_some());
        assert!(cache.get("small", "key4").await.unwrap().is_some());

        let stats = cache.stats("small").await.unwrap();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.size, 3);
    }

    #[tokio::test]
    async fn test_overwrite_is_not_an_eviction() {
        let cache = small_cache(1);

        cache.put("small", "key", b"first").await.unwrap();
        cache.put("small", "key", b"second").await.unwrap();

        let result = cache.get("small", "key").await.unwrap();
        assert_eq!(result, Some(b"second".to_vec()));
        assert_eq!(cache.stats("small").await.unwrap().evictions, 0);
    }

    #[tokio::test]
    async fn test_evict_all_clears_and_bumps_epoch() {
        let cache = MemoryCache::default();
        cache.put(CHART_DATA, "a", b"1").await.unwrap();
        cache.put(CHART_DATA, "b", b"2").await.unwrap();
        let before = cache.epoch(CHART_DATA).await.unwrap();

        cache.evict_all(CHART_DATA).await.unwrap();

        assert!(cache.get(CHART_DATA, "a").await.unwrap().is_none());
        assert!(cache.get(CHART_DATA, "b").await.unwrap().is_none());
        assert_eq!(cache.epoch(CHART_DATA).await.unwrap(), before + 1);

        let stats = cache.stats(CHART_DATA).await.unwrap();
        assert_eq!(stats.size, 0);
        // Invalidation is not an eviction
        assert_eq!(stats.evictions, 0);
    }

    #[tokio::test]
    async fn test_evict_all_on_empty_cache_is_harmless() {
        let cache = MemoryCache::default();

        cache.evict_all(SERVICE_DETAILS).await.unwrap();
        cache.evict_all(SERVICE_DETAILS).await.unwrap();

        assert_eq!(cache.stats(SERVICE_DETAILS).await.unwrap().size, 0);
    }

    #[tokio::test]
    async fn test_put_if_current_rejects_stale_epoch() {
        let cache = MemoryCache::default();
        let epoch = cache.epoch(RECORD_BY_DATE).await.unwrap();

        // A write invalidates between the read and the store
        cache.evict_all(RECORD_BY_DATE).await.unwrap();

        let stored = cache
            .put_if_current(RECORD_BY_DATE, "date:2024-03-01", b"stale", epoch)
            .await
            .unwrap();
        assert!(!stored);
        assert!(cache
            .get(RECORD_BY_DATE, "date:2024-03-01")
            .await
            .unwrap()
            .is_none());

        let epoch = cache.epoch(RECORD_BY_DATE).await.unwrap();
        let stored = cache
            .put_if_current(RECORD_BY_DATE, "date:2024-03-01", b"fresh", epoch)
            .await
            .unwrap();
        assert!(stored);
    }

    #[tokio::test]
    async fn test_names_lists_standard_caches_sorted() {
        let cache = MemoryCache::default();

        let names = cache.names().await;

        assert_eq!(
            names,
            vec![
                "allUserProductivity",
                "chartData",
                "overallProductivity",
                "serviceDetails",
                "userProductivity",
                "wellcaData",
                "wellcaRangeData",
            ]
        );
    }

    #[tokio::test]
    async fn test_unlisted_name_is_provisioned_on_first_use() {
        let cache = MemoryCache::default();

        // Stats alone do not provision
        assert_eq!(cache.stats("adHoc").await.unwrap(), CacheStats::default());
        assert!(!cache.names().await.contains(&"adHoc".to_string()));

        cache.put("adHoc", "k", b"v").await.unwrap();

        assert!(cache.names().await.contains(&"adHoc".to_string()));
        assert_eq!(cache.stats("adHoc").await.unwrap().size, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unlisted_name_uses_fallback_ttl() {
        let cache = MemoryCache::default();
        cache.put("adHoc", "k", b"v").await.unwrap();

        tokio::time::advance(29 * MINUTE).await;
        assert!(cache.get("adHoc", "k").await.unwrap().is_some());

        tokio::time::advance(MINUTE).await;
        assert!(cache.get("adHoc", "k").await.unwrap().is_none());
    }

    #[test]
    fn test_zero_capacity_holds_one_entry() {
        let named = NamedCache::new(CachePolicy::expire_after_write(1, 0));
        assert_eq!(named.entries.cap().get(), 1);
    }
}
