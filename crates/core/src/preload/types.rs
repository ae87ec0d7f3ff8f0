use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle of the startup preloader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreloadState {
    Idle,
    Discovering,
    Running,
    Done,
}

impl PreloadState {
    /// Returns the state that follows this one. `Done` is terminal.
    pub fn next(self) -> Self {
        match self {
            PreloadState::Idle => PreloadState::Discovering,
            PreloadState::Discovering => PreloadState::Running,
            PreloadState::Running | PreloadState::Done => PreloadState::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreloadState::Idle => "idle",
            PreloadState::Discovering => "discovering",
            PreloadState::Running => "running",
            PreloadState::Done => "done",
        }
    }
}

/// How a single job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobStatus {
    Succeeded,
    Failed,
    TimedOut,
}

impl JobStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }
}

/// Result of running one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOutcome {
    pub name: String,
    pub priority: u32,
    pub status: JobStatus,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Counts and per-job outcomes of a completed preload run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total_elapsed_ms: u64,
    pub jobs: Vec<JobOutcome>,
}

impl PreloadSummary {
    /// Builds a summary from outcomes in execution order.
    pub fn from_outcomes(jobs: Vec<JobOutcome>, total_elapsed: Duration) -> Self {
        let succeeded = jobs.iter().filter(|j| j.status.is_success()).count();
        Self {
            succeeded,
            failed: jobs.len() - succeeded,
            total_elapsed_ms: total_elapsed.as_millis() as u64,
            jobs,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Snapshot exposed through the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreloadStatus {
    pub state: PreloadState,
    pub summary: Option<PreloadSummary>,
}

impl Default for PreloadStatus {
    fn default() -> Self {
        Self {
            state: PreloadState::Idle,
            summary: None,
        }
    }
}

/// Knobs controlling which jobs run and how long each may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadPolicy {
    pub enabled: bool,
    pub timeout_multiplier: u32,
    pub min_timeout: Duration,
    pub inter_job_delay: Duration,
    /// Job names that never run.
    pub exclude: Vec<String>,
    /// When non-empty, only these job names run.
    pub include_only: Vec<String>,
}

impl Default for PreloadPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_multiplier: 3,
            min_timeout: Duration::from_millis(30_000),
            inter_job_delay: Duration::from_millis(200),
            exclude: Vec::new(),
            include_only: Vec::new(),
        }
    }
}
