//! Per-filter cached record repository.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use clientcache_core::cache::{records_key, Cache};
use clientcache_core::filter::FilterCriteria;
use clientcache_core::record::FlatRecord;
use clientcache_core::storage::{RecordRepository, RepositoryError, Result};

use super::aside::{CacheAside, Loaded};
use super::stats::CacheStats;

/// Caches the result of every distinct filter under its own key.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedRecordRepository<R, C>
where
    R: RecordRepository + ?Sized,
    C: Cache + ?Sized,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
}

impl<R, C> CachedRecordRepository<R, C>
where
    R: RecordRepository + ?Sized,
    C: Cache + ?Sized,
{
    /// Creates a new cached record repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cached filter results
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            aside: CacheAside::new(cache, ttl),
        }
    }

    /// Counts reads into a shared [`CacheStats`].
    pub fn with_stats(mut self, stats: Arc<CacheStats>) -> Self {
        self.aside = self.aside.with_stats(stats);
        self
    }

    /// Fetches records and reports whether they came from the cache.
    pub async fn fetch_with_source(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Loaded<Vec<FlatRecord>>> {
        let key = records_key(criteria);
        let loaded = self
            .aside
            .fetch::<_, RepositoryError, _, _>(&key, || self.repository.fetch_records(criteria))
            .await?;

        tracing::debug!(
            key = %key,
            source = loaded.source.as_str(),
            records = loaded.value.len(),
            "Fetched records"
        );

        Ok(loaded)
    }
}

#[async_trait]
impl<R, C> RecordRepository for CachedRecordRepository<R, C>
where
    R: RecordRepository + ?Sized + 'static,
    C: Cache + ?Sized + 'static,
{
    async fn fetch_records(&self, criteria: &FilterCriteria) -> Result<Vec<FlatRecord>> {
        self.fetch_with_source(criteria)
            .await
            .map(|loaded| loaded.value)
    }
}
