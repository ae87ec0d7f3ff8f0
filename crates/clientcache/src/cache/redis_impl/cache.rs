//! Redis cache implementation.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionLike, ConnectionManager};
use redis::cluster_async::ClusterConnection;
use redis::{AsyncCommands, Cmd, Pipeline, RedisFuture, RedisResult, Value};

use clientcache_core::cache::{Cache, CacheError, Result};

use super::error::map_redis_error;
use crate::config::RedisSettings;

/// A connection to either a single node or a cluster.
#[derive(Clone)]
enum RedisConnection {
    Single(ConnectionManager),
    Cluster(ClusterConnection),
}

impl ConnectionLike for RedisConnection {
    fn req_packed_command<'a>(&'a mut self, cmd: &'a Cmd) -> RedisFuture<'a, Value> {
        match self {
            RedisConnection::Single(conn) => conn.req_packed_command(cmd),
            RedisConnection::Cluster(conn) => conn.req_packed_command(cmd),
        }
    }

    fn req_packed_commands<'a>(
        &'a mut self,
        cmd: &'a Pipeline,
        offset: usize,
        count: usize,
    ) -> RedisFuture<'a, Vec<Value>> {
        match self {
            RedisConnection::Single(conn) => conn.req_packed_commands(cmd, offset, count),
            RedisConnection::Cluster(conn) => conn.req_packed_commands(cmd, offset, count),
        }
    }

    fn get_db(&self) -> i64 {
        match self {
            RedisConnection::Single(conn) => conn.get_db(),
            RedisConnection::Cluster(conn) => conn.get_db(),
        }
    }
}

/// Redis cache backend.
///
/// Single-node deployments spread commands over `pool_size` connection
/// managers in round-robin order. Each manager reconnects on its own after a
/// dropped connection.
pub struct RedisCache {
    connections: Vec<RedisConnection>,
    next: AtomicUsize,
    command_timeout: Duration,
}

impl RedisCache {
    /// Connects using the given settings.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if a connection cannot be
    /// established, or `CacheError::Timeout` if establishing it takes longer
    /// than the command timeout.
    pub async fn connect(settings: &RedisSettings) -> Result<Self> {
        let urls = settings.connection_urls();
        let timeout = settings.command_timeout;

        let connections = if settings.is_cluster() {
            let client = redis::cluster::ClusterClient::new(urls).map_err(map_redis_error)?;
            let conn = bounded(timeout, client.get_async_connection()).await?;
            vec![RedisConnection::Cluster(conn)]
        } else {
            let url = urls
                .into_iter()
                .next()
                .ok_or_else(|| CacheError::ConnectionFailed("no Redis URL".to_string()))?;
            let client = redis::Client::open(url).map_err(map_redis_error)?;

            let mut connections = Vec::with_capacity(settings.pool_size.max(1));
            for _ in 0..settings.pool_size.max(1) {
                let conn = bounded(timeout, ConnectionManager::new(client.clone())).await?;
                connections.push(RedisConnection::Single(conn));
            }
            connections
        };

        tracing::debug!(
            cluster = settings.is_cluster(),
            connections = connections.len(),
            "Connected to Redis"
        );

        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
            command_timeout: timeout,
        })
    }

    fn connection(&self) -> RedisConnection {
        let i = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        self.connections[i].clone()
    }
}

/// Runs a Redis future, failing with `CacheError::Timeout` if it outlives `timeout`.
async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(map_redis_error),
        Err(_) => Err(CacheError::Timeout(timeout.as_millis() as u64)),
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection();
        bounded(
            self.command_timeout,
            conn.get::<_, Option<Vec<u8>>>(key),
        )
        .await
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.connection();

        match ttl {
            Some(duration) => {
                let seconds = duration.as_secs().max(1);
                bounded(
                    self.command_timeout,
                    conn.set_ex::<_, _, ()>(key, value, seconds),
                )
                .await
            }
            None => bounded(self.command_timeout, conn.set::<_, _, ()>(key, value)).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection();
        bounded(self.command_timeout, conn.del::<_, ()>(key)).await
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection();
        let cmd = redis::cmd("PING");
        let pong: String = bounded(self.command_timeout, cmd.query_async(&mut conn)).await?;
        if pong.eq_ignore_ascii_case("PONG") {
            Ok(())
        } else {
            Err(CacheError::OperationFailed(format!(
                "unexpected PING reply: {}",
                pong
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Settings pointing at `REDIS_URL` (default: redis://localhost:6379).
    fn test_settings() -> RedisSettings {
        RedisSettings {
            url: Some(
                std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            ),
            pool_size: 2,
            command_timeout: Duration::from_millis(2_000),
            ..RedisSettings::default()
        }
    }

    /// Skip test if Redis not available.
    async fn get_test_cache() -> Option<RedisCache> {
        let cache = RedisCache::connect(&test_settings()).await.ok()?;
        cache.ping().await.ok()?;
        Some(cache)
    }

    /// Generate a unique test key to avoid conflicts.
    fn test_key(suffix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        format!("test:redis_cache:{}:{}", nanos, suffix)
    }

    #[tokio::test]
    async fn test_redis_set_and_get() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("set_get");
        let value = b"hello world";

        cache.set(&key, value, None).await.unwrap();

        let result = cache.get(&key).await.unwrap();
        assert_eq!(result, Some(value.to_vec()));

        cache.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_get_nonexistent() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let result = cache.get(&test_key("nonexistent")).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_redis_delete() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("delete");
        cache.set(&key, b"to be deleted", None).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        cache.delete(&key).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_ttl_expiration() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = test_key("ttl");
        cache
            .set(&key, b"short-lived", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_round_robin_connections() {
        let Some(cache) = get_test_cache().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        assert_eq!(cache.connections.len(), 2);
        let key = test_key("round_robin");
        cache.set(&key, b"v", None).await.unwrap();
        // Consecutive reads go through different connections and see the same value.
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(cache.get(&key).await.unwrap(), Some(b"v".to_vec()));
        cache.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let settings = RedisSettings {
            url: Some("redis://127.0.0.1:1".to_string()),
            pool_size: 1,
            command_timeout: Duration::from_millis(500),
            ..RedisSettings::default()
        };

        let result = RedisCache::connect(&settings).await;
        assert!(matches!(
            result,
            Err(CacheError::ConnectionFailed(_)) | Err(CacheError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let fut = std::future::pending::<RedisResult<()>>();
        let result = bounded(Duration::from_millis(10), fut).await;
        assert_eq!(result, Err(CacheError::Timeout(10)));
    }
}
