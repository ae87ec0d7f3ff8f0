mod error;
mod plan;
mod traits;
mod types;

pub use error::{PreloadError, Result};
pub use plan::{job_timeout, plan_jobs, PlannedJob};
pub use traits::{PreloadJob, DEFAULT_ESTIMATED_DURATION, DEFAULT_PRIORITY};
pub use types::{JobOutcome, JobStatus, PreloadPolicy, PreloadState, PreloadStatus, PreloadSummary};
