use std::sync::Arc;
use std::time::Duration;

use super::{PreloadJob, PreloadPolicy};

/// A job selected to run, with its timeout.
#[derive(Clone)]
pub struct PlannedJob {
    pub job: Arc<dyn PreloadJob>,
    pub timeout: Duration,
}

impl std::fmt::Debug for PlannedJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannedJob")
            .field("name", &self.job.name())
            .field("priority", &self.job.priority())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Returns `max(estimated * multiplier, min_timeout)`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use clientcache_core::preload::{job_timeout, PreloadPolicy};
///
/// let policy = PreloadPolicy::default();
/// assert_eq!(job_timeout(Duration::from_secs(1), &policy), Duration::from_secs(30));
/// assert_eq!(job_timeout(Duration::from_secs(20), &policy), Duration::from_secs(60));
/// ```
pub fn job_timeout(estimated: Duration, policy: &PreloadPolicy) -> Duration {
    estimated
        .saturating_mul(policy.timeout_multiplier)
        .max(policy.min_timeout)
}

/// Selects and orders the jobs to run.
///
/// Disabled jobs, excluded names and (when an include list is set) names not
/// on the include list are dropped. The rest are sorted by ascending priority;
/// the sort is stable so ties keep discovery order.
pub fn plan_jobs(jobs: &[Arc<dyn PreloadJob>], policy: &PreloadPolicy) -> Vec<PlannedJob> {
    let mut selected: Vec<Arc<dyn PreloadJob>> = jobs
        .iter()
        .filter(|job| job.enabled())
        .filter(|job| !policy.exclude.iter().any(|name| name == job.name()))
        .filter(|job| {
            policy.include_only.is_empty()
                || policy.include_only.iter().any(|name| name == job.name())
        })
        .cloned()
        .collect();

    selected.sort_by_key(|job| job.priority());

    selected
        .into_iter()
        .map(|job| PlannedJob {
            timeout: job_timeout(job.estimated_duration(), policy),
            job,
        })
        .collect()
}
