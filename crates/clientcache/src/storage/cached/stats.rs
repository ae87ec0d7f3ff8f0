//! Cache read counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use super::aside::CacheSource;

/// Counts cache-aside reads by outcome. Shared by every decorator in the
/// process.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    corrupted: AtomicU64,
    unavailable: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, source: CacheSource) {
        let counter = match source {
            CacheSource::Hit => &self.hits,
            CacheSource::Miss => &self.misses,
            CacheSource::Corrupted => &self.corrupted,
            CacheSource::Unavailable => &self.unavailable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let corrupted = self.corrupted.load(Ordering::Relaxed);
        let unavailable = self.unavailable.load(Ordering::Relaxed);
        let requests = hits + misses + corrupted + unavailable;

        CacheStatsSnapshot {
            hits,
            misses,
            corrupted,
            unavailable,
            requests,
            hit_ratio: if requests == 0 {
                0.0
            } else {
                hits as f64 / requests as f64
            },
        }
    }
}

/// A point-in-time view of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub corrupted: u64,
    pub unavailable: u64,
    pub requests: u64,
    pub hit_ratio: f64,
}

/// Logs a snapshot every `every` until the task is aborted.
pub fn spawn_stats_logger(stats: Arc<CacheStats>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let snapshot = stats.snapshot();
            tracing::info!(
                hits = snapshot.hits,
                misses = snapshot.misses,
                corrupted = snapshot.corrupted,
                unavailable = snapshot.unavailable,
                hit_ratio = snapshot.hit_ratio,
                "Cache statistics"
            );
        }
    })
}
