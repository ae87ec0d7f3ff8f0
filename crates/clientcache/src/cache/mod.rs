//! Cache backend implementations.
//!
//! This module provides concrete implementations of the `Cache` trait defined
//! in `clientcache_core::cache` and picks one at startup.
//!
//! # Feature Flags
//!
//! - `redis` (default): Redis cache, single node or cluster
//! - `redis-tls`: `rediss://` connections
//!
//! The in-memory LRU cache is always available. It is used when
//! `CACHE_BACKEND=memory`, and as the fallback when Redis cannot be reached
//! at startup.

use std::sync::Arc;

use clientcache_core::cache::Cache;

use crate::config::{CacheBackend, Config};

pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;

/// Connects to the configured cache backend.
///
/// Never fails: an unreachable Redis is logged and replaced with the
/// in-memory cache so the service can still start.
pub async fn connect(config: &Config) -> Arc<dyn Cache> {
    match config.cache_backend {
        CacheBackend::Memory => {
            tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
            Arc::new(MemoryCache::new(config.cache_max_entries))
        }
        CacheBackend::Redis => connect_redis(config).await,
    }
}

#[cfg(feature = "redis")]
async fn connect_redis(config: &Config) -> Arc<dyn Cache> {
    let cache = match RedisCache::connect(&config.redis).await {
        Ok(cache) => cache,
        Err(err) => {
            tracing::warn!(error = %err, "Redis connection failed, falling back to in-memory cache");
            return Arc::new(MemoryCache::new(config.cache_max_entries));
        }
    };

    match cache.ping().await {
        Ok(()) => {
            tracing::info!(
                cluster = config.redis.is_cluster(),
                tls = config.redis.tls,
                "Using Redis cache"
            );
            Arc::new(cache)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Redis ping failed, falling back to in-memory cache");
            Arc::new(MemoryCache::new(config.cache_max_entries))
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(config: &Config) -> Arc<dyn Cache> {
    tracing::warn!("Built without the `redis` feature, falling back to in-memory cache");
    Arc::new(MemoryCache::new(config.cache_max_entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::RedisSettings;

    #[tokio::test]
    async fn test_memory_backend() {
        let config = Config {
            cache_backend: CacheBackend::Memory,
            ..Config::from_env()
        };
        let cache = connect(&config).await;
        cache.set("k", b"v", None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn test_unreachable_redis_falls_back_to_memory() {
        let config = Config {
            cache_backend: CacheBackend::Redis,
            redis: RedisSettings {
                url: Some("redis://127.0.0.1:1".to_string()),
                pool_size: 1,
                command_timeout: Duration::from_millis(300),
                ..RedisSettings::default()
            },
            ..Config::from_env()
        };

        let cache = connect(&config).await;

        assert!(cache.ping().await.is_ok());
        cache.set("k", b"v", None).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
