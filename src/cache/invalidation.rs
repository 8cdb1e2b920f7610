use async_trait::async_trait;
use tracing::{debug, warn};

use super::CacheStore;
use crate::cache_key::LIST_KEY_PREFIX;

/// Result of a best-effort list invalidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidationOutcome {
    /// Number of cached list pages removed.
    Cleared(u64),
    /// The cache could not be enumerated or purged; stale pages live until TTL.
    Skipped(String),
}

/// Decides which cached list pages a write must drop.
#[async_trait]
pub trait InvalidationStrategy: Send + Sync {
    async fn invalidate_lists(&self, cache: &dyn CacheStore) -> InvalidationOutcome;
}

/// Drops every cached list page, whatever the write touched.
#[derive(Debug, Clone)]
pub struct PrefixInvalidation {
    prefix: String,
}

impl PrefixInvalidation {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }
}

impl Default for PrefixInvalidation {
    fn default() -> Self {
        Self::new(LIST_KEY_PREFIX)
    }
}

#[async_trait]
impl InvalidationStrategy for PrefixInvalidation {
    async fn invalidate_lists(&self, cache: &dyn CacheStore) -> InvalidationOutcome {
        match cache.delete_by_prefix(&self.prefix).await {
            Ok(deleted) => {
                debug!(prefix = %self.prefix, deleted, "Invalidated cached list pages");
                InvalidationOutcome::Cleared(deleted)
            }
            Err(e) => {
                warn!(prefix = %self.prefix, error = %e, "List invalidation skipped");
                InvalidationOutcome::Skipped(e.to_string())
            }
        }
    }
}
