use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use clientcache_core::filter::FilterCriteria;
use clientcache_core::preload::{PreloadError, PreloadJob, Result};
use clientcache_core::storage::RecordRepository;

const SCENARIO_PAUSE: Duration = Duration::from_millis(50);

/// Warms the record cache for a fixed list of filter scenarios.
///
/// Scenarios are fetched through the cached repository, so each one leaves
/// its result in the cache. A failing scenario does not stop the rest; the
/// job reports failure once all have been attempted.
pub struct ScenarioPreloadJob {
    repository: Arc<dyn RecordRepository>,
    scenarios: Vec<FilterCriteria>,
    pause: Duration,
}

impl ScenarioPreloadJob {
    pub const NAME: &'static str = "product-services";

    pub fn new(repository: Arc<dyn RecordRepository>, scenarios: Vec<FilterCriteria>) -> Self {
        Self {
            repository,
            scenarios,
            pause: SCENARIO_PAUSE,
        }
    }

    /// Overrides the pause between scenarios.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }
}

#[async_trait]
impl PreloadJob for ScenarioPreloadJob {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> u32 {
        1
    }

    fn description(&self) -> &str {
        "Product services record cache"
    }

    fn estimated_duration(&self) -> Duration {
        Duration::from_millis(2000)
    }

    async fn preload(&self) -> Result<()> {
        let mut failures = 0usize;

        for (i, scenario) in self.scenarios.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            match self.repository.fetch_records(scenario).await {
                Ok(records) => {
                    tracing::debug!(scenario = i, records = records.len(), "Preloaded scenario")
                }
                Err(err) => {
                    failures += 1;
                    tracing::warn!(scenario = i, error = %err, "Failed to preload scenario");
                }
            }
        }

        if failures > 0 {
            return Err(PreloadError::Failed(format!(
                "{} of {} scenarios failed",
                failures,
                self.scenarios.len()
            )));
        }

        Ok(())
    }
}
