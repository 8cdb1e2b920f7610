use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{CacheError, CacheStore};

#[derive(Clone)]
struct CacheEntry {
    value: String,
    expiry: Instant,
}

/// In-process cache store backed by a `DashMap`.
///
/// Backs the test suite. `set_available(false)` makes every operation fail like
/// an unreachable Redis would.
#[derive(Clone, Default)]
pub struct MemoryCacheStore {
    store: Arc<DashMap<String, CacheEntry>>,
    unavailable: Arc<AtomicBool>,
    mutations: Arc<AtomicU64>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Number of successful set/delete operations so far.
    pub fn mutation_count(&self) -> u64 {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store
            .get(key)
            .map(|entry| entry.expiry > Instant::now())
            .unwrap_or(false)
    }

    /// Live keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix) && entry.value().expiry > now)
            .map(|entry| entry.key().clone())
            .collect();
        keys.sort();
        keys
    }

    /// Remaining lifetime of a live key.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.store
            .get(key)
            .and_then(|entry| entry.expiry.checked_duration_since(Instant::now()))
    }

    fn check_available(&self) -> Result<(), CacheError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::Pool("memory cache marked unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.check_available()?;

        let now = Instant::now();
        let value = match self.store.get(key) {
            Some(entry) if entry.expiry > now => Some(entry.value.clone()),
            Some(_) => None,
            None => return Ok(None),
        };
        if value.is_none() {
            self.store.remove_if(key, |_, entry| entry.expiry <= now);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.check_available()?;

        self.store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expiry: Instant::now() + ttl,
            },
        );
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.check_available()?;

        let existed = self.store.remove(key).is_some();
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(existed)
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        self.check_available()?;

        let keys: Vec<String> = self
            .store
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();

        let deleted = keys
            .iter()
            .filter(|key| self.store.remove(key.as_str()).is_some())
            .count() as u64;
        if deleted > 0 {
            self.mutations.fetch_add(1, Ordering::SeqCst);
        }
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expired_entries_read_as_absent() {
        let store = MemoryCacheStore::new();
        store.set("k", "v", Duration::from_millis(0)).await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.contains_key("k"));
    }

    #[tokio::test]
    async fn delete_by_prefix_only_touches_matching_keys() {
        let store = MemoryCacheStore::new();
        let ttl = Duration::from_secs(60);
        store.set("blog:list:page:1:limit:10", "a", ttl).await.unwrap();
        store.set("blog:list:page:2:limit:10", "b", ttl).await.unwrap();
        store.set("blog:post:x", "c", ttl).await.unwrap();

        assert_eq!(store.delete_by_prefix("blog:list:").await.unwrap(), 2);
        assert_eq!(store.delete_by_prefix("blog:list:").await.unwrap(), 0);
        assert!(store.contains_key("blog:post:x"));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_operation() {
        let store = MemoryCacheStore::new();
        store.set_available(false);

        assert!(store.get("k").await.is_err());
        assert!(store.set("k", "v", Duration::from_secs(1)).await.is_err());
        assert!(store.delete_by_prefix("k").await.is_err());
        assert_eq!(store.mutation_count(), 0);
    }
}
