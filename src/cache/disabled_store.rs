use async_trait::async_trait;
use std::time::Duration;

use super::{CacheError, CacheStore};

/// Cache store used when `CACHE_ENABLED=false`: every read misses, every write is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCacheStore;

#[async_trait]
impl CacheStore for DisabledCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
        Ok(0)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
