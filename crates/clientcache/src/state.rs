//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use clientcache_core::cache::Cache;
use clientcache_core::storage::RecordRepository;

use crate::preload::SharedPreloadStatus;
use crate::storage::cached::CacheStats;

/// Shared application state.
///
/// Cloned for each request handler. `records` is the cached repository
/// selected by `CACHE_STRATEGY`; `cache` is the raw backend behind it.
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordRepository>,
    pub cache: Arc<dyn Cache>,
    /// TTL applied by `/api/cache/set` when the request omits one.
    pub default_ttl: Duration,
    pub preload_status: SharedPreloadStatus,
    /// Read counters shared with the cached repository.
    pub stats: Arc<CacheStats>,
}

impl AppState {
    pub fn new(
        records: Arc<dyn RecordRepository>,
        cache: Arc<dyn Cache>,
        default_ttl: Duration,
        preload_status: SharedPreloadStatus,
        stats: Arc<CacheStats>,
    ) -> Self {
        Self {
            records,
            cache,
            default_ttl,
            preload_status,
            stats,
        }
    }
}
