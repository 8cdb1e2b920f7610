// ============================================================================
// REDIS CACHE STORE
// ============================================================================

use async_trait::async_trait;
use deadpool_redis::{Connection, Pool as RedisPool};
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use super::{CacheError, CacheStore};

/// Redis-backed [`CacheStore`] on a shared `deadpool_redis` pool.
///
/// Every call, including checking out a connection, runs under `op_timeout`.
#[derive(Clone)]
pub struct RedisCacheStore {
    pool: RedisPool,
    op_timeout: Duration,
}

impl RedisCacheStore {
    pub fn new(pool: RedisPool, op_timeout: Duration) -> Self {
        Self { pool, op_timeout }
    }

    /// Create the pool from a URL. No connection is opened until first use.
    pub fn from_url(redis_url: &str, op_timeout: Duration) -> anyhow::Result<Self> {
        let pool = deadpool_redis::Config::from_url(redis_url)
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| anyhow::anyhow!("Failed to create Redis pool: {}", e))?;
        Ok(Self::new(pool, op_timeout))
    }

    /// Close the pool; later operations fail and degrade to the store.
    pub fn close(&self) {
        self.pool.close();
        info!("Redis pool closed");
    }

    async fn get_connection(&self) -> Result<Connection, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Pool(e.to_string()))
    }

    async fn with_timeout<T, F>(&self, operation: &'static str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout { operation })?
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.with_timeout("get", async {
            let mut conn = self.get_connection().await?;
            let value: Option<String> = conn.get(key).await?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.with_timeout("set", async {
            let mut conn = self.get_connection().await?;
            conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.with_timeout("del", async {
            let mut conn = self.get_connection().await?;
            let deleted: i64 = conn.del(key).await?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let pattern = format!("{}*", prefix);

        self.with_timeout("delete_by_prefix", async {
            let mut conn = self.get_connection().await?;

            let keys: Vec<String> = redis::cmd("KEYS")
                .arg(&pattern)
                .query_async(&mut conn)
                .await?;

            if keys.is_empty() {
                return Ok(0);
            }

            let deleted: u64 = conn.del(&keys).await?;
            debug!(pattern = %pattern, matched = keys.len(), deleted, "Deleted keys by prefix");
            Ok(deleted)
        })
        .await
    }

    async fn ping(&self) -> Result<(), CacheError> {
        self.with_timeout("ping", async {
            let mut conn = self.get_connection().await?;
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok(())
        })
        .await
    }
}
