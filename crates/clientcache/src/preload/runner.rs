use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use clientcache_core::preload::{
    plan_jobs, JobOutcome, JobStatus, PlannedJob, PreloadError, PreloadPolicy, PreloadState,
    PreloadStatus, PreloadSummary,
};

use super::PreloadRegistry;

/// Status handle shared between the preloader and the HTTP layer.
pub type SharedPreloadStatus = Arc<RwLock<PreloadStatus>>;

/// Runs registered preload jobs sequentially in priority order.
///
/// Each job runs in its own task under `max(estimate * multiplier,
/// min_timeout)`. A job that fails, panics or times out is recorded and the
/// queue moves on.
pub struct CachePreloader {
    registry: PreloadRegistry,
    policy: PreloadPolicy,
    status: SharedPreloadStatus,
}

impl CachePreloader {
    pub fn new(registry: PreloadRegistry, policy: PreloadPolicy) -> Self {
        Self {
            registry,
            policy,
            status: Arc::new(RwLock::new(PreloadStatus::default())),
        }
    }

    /// Returns the shared status handle.
    pub fn status(&self) -> SharedPreloadStatus {
        Arc::clone(&self.status)
    }

    /// Runs the preloader in a background task.
    pub fn spawn(self) -> JoinHandle<PreloadSummary> {
        tokio::spawn(async move { self.run().await })
    }

    /// Runs every planned job and returns the summary.
    pub async fn run(&self) -> PreloadSummary {
        if !self.policy.enabled {
            tracing::info!("Cache preloading disabled");
            self.finish(PreloadSummary::default()).await;
            return PreloadSummary::default();
        }

        self.advance().await;
        let plan = plan_jobs(self.registry.jobs(), &self.policy);
        tracing::info!(
            registered = self.registry.len(),
            planned = plan.len(),
            "Discovered cache preload jobs"
        );

        self.advance().await;
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(plan.len());

        for (i, planned) in plan.iter().enumerate() {
            if i > 0 && !self.policy.inter_job_delay.is_zero() {
                tokio::time::sleep(self.policy.inter_job_delay).await;
            }
            outcomes.push(run_job(planned).await);
        }

        let summary = PreloadSummary::from_outcomes(outcomes, started.elapsed());
        tracing::info!(
            jobs = summary.total(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            total_ms = summary.total_elapsed_ms,
            "Cache preloading complete"
        );

        self.finish(summary.clone()).await;
        summary
    }

    /// Moves to the next lifecycle state: idle, discovering, running.
    async fn advance(&self) {
        let mut status = self.status.write().await;
        status.state = status.state.next();
        tracing::debug!(state = status.state.as_str(), "Preload state changed");
    }

    async fn finish(&self, summary: PreloadSummary) {
        let mut status = self.status.write().await;
        status.state = PreloadState::Done;
        status.summary = Some(summary);
    }
}

async fn run_job(planned: &PlannedJob) -> JobOutcome {
    let name = planned.job.name().to_string();
    let priority = planned.job.priority();
    let timeout_ms = planned.timeout.as_millis() as u64;

    tracing::info!(job = %name, priority, timeout_ms, "Starting preload job");

    let job = Arc::clone(&planned.job);
    let started = Instant::now();
    let mut handle = tokio::spawn(async move { job.preload().await });

    let (status, error) = match tokio::time::timeout(planned.timeout, &mut handle).await {
        Ok(Ok(Ok(()))) => (JobStatus::Succeeded, None),
        Ok(Ok(Err(err))) => (JobStatus::Failed, Some(err.to_string())),
        Ok(Err(join_err)) => (
            JobStatus::Failed,
            Some(PreloadError::Failed(join_err.to_string()).to_string()),
        ),
        Err(_) => {
            handle.abort();
            (
                JobStatus::TimedOut,
                Some(PreloadError::TimedOut { timeout_ms }.to_string()),
            )
        }
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match (&status, &error) {
        (JobStatus::Succeeded, _) => {
            tracing::info!(job = %name, elapsed_ms, "Preload job succeeded")
        }
        (JobStatus::TimedOut, Some(err)) => {
            tracing::warn!(job = %name, elapsed_ms, error = %err, "Preload job timed out")
        }
        (_, err) => {
            tracing::error!(job = %name, elapsed_ms, error = ?err, "Preload job failed")
        }
    }

    JobOutcome {
        name,
        priority,
        status,
        elapsed_ms,
        error,
    }
}
