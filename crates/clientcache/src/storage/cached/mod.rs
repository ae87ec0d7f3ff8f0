//! Cached repository decorators.
//!
//! Both decorators wrap a `RecordRepository` and read through a cache using
//! [`CacheAside`]:
//!
//! - [`CachedRecordRepository`] caches each filter result under its own key.
//! - [`FullDatasetRepository`] caches the complete dataset once and filters
//!   it in process.
//!
//! `CACHE_STRATEGY` picks one at startup through [`with_strategy`]. Reads from
//! either are counted in a shared [`CacheStats`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let repo = Arc::new(SqliteRepository::new("clientcache.db").await?);
//! let cache = Arc::new(MemoryCache::new(10_000));
//!
//! let cached_repo = CachedRecordRepository::new(repo, cache, Duration::from_secs(1800));
//! ```

use std::sync::Arc;

use clientcache_core::cache::Cache;
use clientcache_core::storage::RecordRepository;

use crate::config::{CacheStrategy, Config};

mod aside;
mod full_dataset;
mod records;
mod stats;

pub use aside::{CacheAside, CacheSource, Loaded};
pub use full_dataset::FullDatasetRepository;
pub use records::CachedRecordRepository;
pub use stats::{spawn_stats_logger, CacheStats, CacheStatsSnapshot};

/// Wraps `repository` in the decorator selected by `config.cache_strategy`.
pub fn with_strategy(
    config: &Config,
    repository: Arc<dyn RecordRepository>,
    cache: Arc<dyn Cache>,
    stats: Arc<CacheStats>,
) -> Arc<dyn RecordRepository> {
    match config.cache_strategy {
        CacheStrategy::PerFilter => {
            tracing::info!(ttl_secs = config.cache_ttl_seconds, "Caching records per filter");
            Arc::new(
                CachedRecordRepository::new(repository, cache, config.cache_ttl())
                    .with_stats(stats),
            )
        }
        CacheStrategy::FullDataset => {
            tracing::info!(
                ttl_secs = config.full_dataset_ttl_seconds,
                "Caching the complete dataset"
            );
            Arc::new(
                FullDatasetRepository::new(repository, cache, config.full_dataset_ttl())
                    .with_stats(stats),
            )
        }
    }
}
