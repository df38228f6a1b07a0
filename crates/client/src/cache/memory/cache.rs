//! In-memory cache implementation with LRU eviction.
//!
//! Entries remember the instant they were captured and their TTL. Expiry is
//! lazy: an expired entry reads as absent but stays in the store until it is
//! overwritten, invalidated or evicted.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;
use tokio::time::Instant;

use finanzas_core::cache::{key_matches, Cache, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    captured_at: Instant,
    ttl: Option<Duration>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            value,
            captured_at: Instant::now(),
            ttl,
        }
    }

    /// An entry is valid while strictly less than `ttl` has elapsed.
    fn is_expired(&self) -> bool {
        self.ttl
            .is_some_and(|ttl| self.captured_at.elapsed() >= ttl)
    }
}

/// In-memory cache with lazy TTL expiry and LRU eviction.
///
/// Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` entries (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Keys currently stored, most recently used first.
    pub async fn keys(&self) -> Vec<String> {
        self.store
            .read()
            .await
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if entry.is_expired() => Ok(None),
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<()> {
        let mut store = self.store.write().await;
        let keys_to_delete: Vec<String> = store
            .iter()
            .filter(|(key, _)| key_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in keys_to_delete {
            store.pop(&key);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.store.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MAX_ENTRIES: usize = 1000;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.set("expenses_list_{}", b"[]", None).await.unwrap();
        assert_eq!(
            cache.get("expenses_list_{}").await.unwrap(),
            Some(b"[]".to_vec())
        );
        assert_eq!(cache.get("incomes_list_{}").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.set("budgets_list_{}", b"[]", None).await.unwrap();
        cache.delete("budgets_list_{}").await.unwrap();
        assert!(cache.get("budgets_list_{}").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_boundary() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let ttl = Duration::from_secs(300);
        cache.set("dashboard_summary_{}", b"1", Some(ttl)).await.unwrap();

        tokio::time::advance(ttl - Duration::from_millis(1)).await;
        assert!(cache.get("dashboard_summary_{}").await.unwrap().is_some());

        tokio::time::advance(Duration::from_millis(2)).await;
        assert!(cache.get("dashboard_summary_{}").await.unwrap().is_none());

        // Lazy expiry: the entry is still stored
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_exactly_at_ttl() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        let ttl = Duration::from_secs(10);
        cache.set("k", b"v", Some(ttl)).await.unwrap();
        tokio::time::advance(ttl).await;
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_matching_is_substring() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.set("expenses_list_{}", b"1", None).await.unwrap();
        cache
            .set("analytics_expenses_{\"year\":2024}", b"2", None)
            .await
            .unwrap();
        cache.set("incomes_list_{}", b"3", None).await.unwrap();

        cache.delete_matching("expenses").await.unwrap();

        assert!(cache.get("expenses_list_{}").await.unwrap().is_none());
        assert!(cache
            .get("analytics_expenses_{\"year\":2024}")
            .await
            .unwrap()
            .is_none());
        assert!(cache.get("incomes_list_{}").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new(TEST_MAX_ENTRIES);
        cache.set("a", b"1", None).await.unwrap();
        cache.set("b", b"2", None).await.unwrap();
        cache.clear().await.unwrap();
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(2);
        cache.set("a", b"1", None).await.unwrap();
        cache.set("b", b"2", None).await.unwrap();
        // Touch "a" so "b" becomes least recently used
        cache.get("a").await.unwrap();
        cache.set("c", b"3", None).await.unwrap();

        assert!(cache.get("a").await.unwrap().is_some());
        assert!(cache.get("b").await.unwrap().is_none());
        assert!(cache.get("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let cache = MemoryCache::new(0);
        cache.set("a", b"1", None).await.unwrap();
        assert_eq!(cache.len().await, 1);
    }
}
