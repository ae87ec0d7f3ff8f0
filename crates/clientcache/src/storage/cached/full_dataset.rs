//! Complete-dataset cached record repository.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use clientcache_core::cache::{complete_dataset_key, Cache};
use clientcache_core::filter::{filter_records, FilterCriteria};
use clientcache_core::record::FlatRecord;
use clientcache_core::storage::{RecordRepository, RepositoryError, Result};

use super::aside::{CacheAside, CacheSource};
use super::stats::CacheStats;

/// Caches every record under one key and filters in process.
///
/// An empty dataset means the store has nothing to filter, so the request
/// falls through to a filtered repository query instead. While the cache is
/// unreachable each request queries the repository with its own filter
/// rather than loading the complete dataset.
pub struct FullDatasetRepository<R, C>
where
    R: RecordRepository + ?Sized,
    C: Cache + ?Sized,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
}

impl<R, C> FullDatasetRepository<R, C>
where
    R: RecordRepository + ?Sized,
    C: Cache + ?Sized,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            aside: CacheAside::new(cache, ttl),
        }
    }

    pub fn with_stats(mut self, stats: Arc<CacheStats>) -> Self {
        self.aside = self.aside.with_stats(stats);
        self
    }
}

#[async_trait]
impl<R, C> RecordRepository for FullDatasetRepository<R, C>
where
    R: RecordRepository + ?Sized + 'static,
    C: Cache + ?Sized + 'static,
{
    async fn fetch_records(&self, criteria: &FilterCriteria) -> Result<Vec<FlatRecord>> {
        let key = complete_dataset_key();
        let all = FilterCriteria::default();
        let loaded = self
            .aside
            .fetch_or_fallback::<_, RepositoryError, _, _, _, _>(
                &key,
                || self.repository.fetch_records(&all),
                || self.repository.fetch_records(criteria),
            )
            .await?;

        if loaded.source == CacheSource::Unavailable {
            tracing::debug!(records = loaded.value.len(), "Queried repository with filter");
            return Ok(loaded.value);
        }

        tracing::debug!(
            source = loaded.source.as_str(),
            records = loaded.value.len(),
            "Loaded complete dataset"
        );

        let dataset = loaded.value;
        if dataset.is_empty() {
            tracing::warn!("Complete dataset is empty, querying repository with filter");
            return self.repository.fetch_records(criteria).await;
        }

        let filtered = filter_records(&dataset, criteria);
        tracing::debug!(
            total = dataset.len(),
            matched = filtered.len(),
            "Filtered complete dataset"
        );
        Ok(filtered)
    }
}
