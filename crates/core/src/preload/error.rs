use thiserror::Error;

/// Errors a preload job can end with. Neither aborts the preload queue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreloadError {
    #[error("Preload failed: {0}")]
    Failed(String),
    #[error("Preload timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
}

/// Result type for preload jobs.
pub type Result<T> = std::result::Result<T, PreloadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display() {
        let error = PreloadError::Failed("database unavailable".to_string());
        assert_eq!(error.to_string(), "Preload failed: database unavailable");
    }

    #[test]
    fn test_timed_out_display() {
        let error = PreloadError::TimedOut { timeout_ms: 30000 };
        assert_eq!(error.to_string(), "Preload timed out after 30000ms");
    }
}
