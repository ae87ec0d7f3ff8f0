use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Priority assigned to jobs that do not override [`PreloadJob::priority`].
pub const DEFAULT_PRIORITY: u32 = 100;

/// Estimate assigned to jobs that do not override [`PreloadJob::estimated_duration`].
pub const DEFAULT_ESTIMATED_DURATION: Duration = Duration::from_millis(1000);

/// A unit of cache warm-up work run once at startup.
#[async_trait]
pub trait PreloadJob: Send + Sync {
    /// Unique job name, used for include/exclude lists and logs.
    fn name(&self) -> &str;

    /// Lower values run earlier.
    fn priority(&self) -> u32 {
        DEFAULT_PRIORITY
    }

    fn enabled(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        ""
    }

    /// Expected run time, used to derive the job timeout.
    fn estimated_duration(&self) -> Duration {
        DEFAULT_ESTIMATED_DURATION
    }

    /// Warms the cache.
    async fn preload(&self) -> Result<()>;
}
