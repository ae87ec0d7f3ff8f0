//! Generic cache-aside read.
//!
//! Every cached read in the service goes through [`CacheAside::fetch`]:
//!
//! 1. Read the key. A hit that deserializes is returned as is.
//! 2. On a miss, or on bytes that no longer deserialize, call the loader and
//!    write its result back with the configured TTL.
//! 3. If the cache itself errors (connection refused, timeout), call the
//!    loader and skip the write-back.
//!
//! [`CacheAside::fetch_or_fallback`] swaps in a different loader for step 3.
//! A failed write is logged and never fails the read. Loader errors propagate.
//! Every read is counted in the shared [`CacheStats`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use clientcache_core::cache::{deserialize_json, serialize_json, Cache};

use super::stats::CacheStats;

/// Where a fetched value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
    Hit,
    Miss,
    /// Cached bytes failed to deserialize and were replaced.
    Corrupted,
    /// The cache errored; the value was loaded and not cached.
    Unavailable,
}

impl CacheSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheSource::Hit => "hit",
            CacheSource::Miss => "miss",
            CacheSource::Corrupted => "corrupted",
            CacheSource::Unavailable => "unavailable",
        }
    }
}

/// A value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<V> {
    pub value: V,
    pub source: CacheSource,
}

/// Cache-aside reader bound to one cache and one TTL.
pub struct CacheAside<C: Cache + ?Sized> {
    cache: Arc<C>,
    ttl: Duration,
    stats: Arc<CacheStats>,
}

impl<C: Cache + ?Sized> Clone for CacheAside<C> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<C: Cache + ?Sized> CacheAside<C> {
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl,
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// Counts reads into `stats` instead of a private counter.
    pub fn with_stats(mut self, stats: Arc<CacheStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Returns the cached value for `key`, or loads, caches and returns it.
    pub async fn fetch<V, E, F, Fut>(&self, key: &str, loader: F) -> Result<Loaded<V>, E>
    where
        V: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, E>> + Send,
    {
        let source = match self.lookup(key).await {
            Ok(value) => {
                return Ok(Loaded {
                    value,
                    source: CacheSource::Hit,
                })
            }
            Err(source) => source,
        };

        let value = loader().await?;

        if source != CacheSource::Unavailable {
            self.store(key, &value).await;
        }

        Ok(Loaded { value, source })
    }

    /// Like [`fetch`](Self::fetch), but calls `fallback` instead of `loader`
    /// when the cache is unreachable. Nothing is written in that case.
    pub async fn fetch_or_fallback<V, E, F, Fut, G, GFut>(
        &self,
        key: &str,
        loader: F,
        fallback: G,
    ) -> Result<Loaded<V>, E>
    where
        V: Serialize + DeserializeOwned + Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, E>> + Send,
        G: FnOnce() -> GFut + Send,
        GFut: Future<Output = Result<V, E>> + Send,
    {
        let source = match self.lookup(key).await {
            Ok(value) => {
                return Ok(Loaded {
                    value,
                    source: CacheSource::Hit,
                })
            }
            Err(source) => source,
        };

        if source == CacheSource::Unavailable {
            let value = fallback().await?;
            return Ok(Loaded { value, source });
        }

        let value = loader().await?;
        self.store(key, &value).await;

        Ok(Loaded { value, source })
    }

    /// Reads and decodes `key`. `Err` carries why the value must be loaded.
    async fn lookup<V: DeserializeOwned>(&self, key: &str) -> Result<V, CacheSource> {
        let outcome = match self.cache.get(key).await {
            Ok(Some(bytes)) => match deserialize_json::<V>(&bytes) {
                Ok(value) => {
                    tracing::trace!(key, "Cache hit");
                    Ok(value)
                }
                Err(err) => {
                    tracing::warn!(key, error = %err, "Cached value deserialization failed");
                    Err(CacheSource::Corrupted)
                }
            },
            Ok(None) => {
                tracing::trace!(key, "Cache miss");
                Err(CacheSource::Miss)
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache unavailable, falling back to data source");
                Err(CacheSource::Unavailable)
            }
        };

        self.stats.record(match &outcome {
            Ok(_) => CacheSource::Hit,
            Err(source) => *source,
        });

        outcome
    }

    async fn store<V: Serialize>(&self, key: &str, value: &V) {
        let bytes = match serialize_json(value) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "Failed to serialize value for cache");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, &bytes, Some(self.ttl)).await {
            tracing::warn!(key, error = %err, "Failed to write cache entry");
        }
    }
}
