use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::cache::{CacheClient, CacheStore, DisabledCacheStore, RedisCacheStore};
use crate::cache_ttl::CacheTtl;
use crate::db::{create_pool, ensure_schema};
use crate::domains::blog::{BlogService, PgBlogRepository};
use crate::domains::users::{PgUserRepository, UserService};
use shared::{AuthService, Config};

/// Shared application state: pools and the services built on them.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    /// `None` when caching is disabled.
    pub redis_store: Option<RedisCacheStore>,
    pub cache_enabled: bool,
    pub auth: Arc<AuthService>,
    pub blog_service: BlogService,
    pub user_service: UserService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = create_pool(&config.database)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
        ensure_schema(&db_pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bootstrap schema: {}", e))?;

        let (redis_store, cache_store): (Option<RedisCacheStore>, Arc<dyn CacheStore>) =
            if config.redis.enabled {
                let store = RedisCacheStore::from_url(
                    &config.redis.url,
                    Duration::from_millis(config.redis.operation_timeout_ms),
                )?;
                match store.ping().await {
                    Ok(()) => info!("✅ Redis cache reachable"),
                    Err(e) => warn!(
                        error = %e,
                        "⚠️ Redis unreachable at startup; serving from the database until it recovers"
                    ),
                }
                (Some(store.clone()), Arc::new(store))
            } else {
                info!("ℹ️ CACHE_ENABLED=false, blog cache disabled");
                (None, Arc::new(DisabledCacheStore))
            };

        let auth = Arc::new(AuthService::new(&config.auth)?);
        let query_timeout = Duration::from_secs(config.database.query_timeout_seconds);

        let blog_service = BlogService::new(
            Arc::new(PgBlogRepository::new(db_pool.clone(), query_timeout)),
            CacheClient::new(cache_store),
            CacheTtl::from_env(),
        );
        let user_service = UserService::new(
            Arc::new(PgUserRepository::new(db_pool.clone(), query_timeout)),
            auth.clone(),
        );

        Ok(Self {
            db_pool,
            redis_store,
            cache_enabled: config.redis.enabled,
            auth,
            blog_service,
            user_service,
        })
    }

    /// Close both pools. In-flight requests must already be drained.
    pub async fn shutdown(&self) {
        if let Some(store) = &self.redis_store {
            store.close();
        }
        self.db_pool.close().await;
        info!("Database pool closed");
    }
}
