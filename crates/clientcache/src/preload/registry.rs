use std::sync::Arc;

use clientcache_core::preload::PreloadJob;

/// Collection of preload jobs discovered at startup.
#[derive(Default, Clone)]
pub struct PreloadRegistry {
    jobs: Vec<Arc<dyn PreloadJob>>,
}

impl PreloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a job. Registration order breaks priority ties.
    pub fn register(&mut self, job: Arc<dyn PreloadJob>) {
        tracing::debug!(
            job = job.name(),
            priority = job.priority(),
            description = job.description(),
            "Registered preload job"
        );
        self.jobs.push(job);
    }

    pub fn jobs(&self) -> &[Arc<dyn PreloadJob>] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
