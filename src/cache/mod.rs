// ============================================================================
// CACHE LAYER - read-through / write-invalidate support for blog posts
// ============================================================================

pub mod disabled_store;
pub mod invalidation;
pub mod memory_store;
pub mod redis_store;

pub use disabled_store::DisabledCacheStore;
pub use invalidation::{InvalidationOutcome, InvalidationStrategy, PrefixInvalidation};
pub use memory_store::MemoryCacheStore;
pub use redis_store::RedisCacheStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache connection unavailable: {0}")]
    Pool(String),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache operation timed out: {operation}")]
    Timeout { operation: &'static str },
}

/// Key/value capability the blog cache is built on.
///
/// Values are opaque strings; callers own serialization. Every method may fail,
/// and callers treat every failure as "cache unavailable", never as a request error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Returns whether the key existed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Enumerate every key starting with `prefix` and delete them in one batch.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    async fn ping(&self) -> Result<(), CacheError>;
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    /// Key absent, or present with an empty value.
    Miss,
    /// Cache unreachable, timed out, or holding a value that does not decode.
    Degraded(String),
}

/// Best-effort JSON view over a [`CacheStore`].
#[derive(Clone)]
pub struct CacheClient {
    store: Arc<dyn CacheStore>,
}

impl CacheClient {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// Fetch and decode `key`. Never fails.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        match self.store.get(key).await {
            Ok(Some(data)) if !data.is_empty() => match serde_json::from_str(&data) {
                Ok(value) => {
                    debug!(key = %key, "Cache HIT");
                    CacheLookup::Hit(value)
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Cached value does not decode, treating as miss");
                    CacheLookup::Degraded(format!("malformed value: {}", e))
                }
            },
            Ok(_) => {
                debug!(key = %key, "Cache MISS");
                CacheLookup::Miss
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache unavailable on read, falling back to store");
                CacheLookup::Degraded(e.to_string())
            }
        }
    }

    /// Serialize and store `value` under `key`. Failures are logged and reported as `false`.
    pub async fn write_through<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> bool {
        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                error!(key = %key, error = %e, "Failed to serialize value for cache");
                return false;
            }
        };

        match self.store.set(key, &data, ttl).await {
            Ok(()) => {
                debug!(key = %key, ttl_secs = ttl.as_secs(), "Cached value");
                true
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cache write-through skipped");
                false
            }
        }
    }

    /// Delete a single key. Failure is logged at error level so a stale entry is visible.
    pub async fn evict(&self, key: &str) -> bool {
        match self.store.delete(key).await {
            Ok(existed) => {
                debug!(key = %key, existed, "Evicted cache entry");
                true
            }
            Err(e) => {
                error!(key = %key, error = %e, "Failed to evict cache entry");
                false
            }
        }
    }
}
