use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// Every variant is treated as "cache unavailable" on the read path: callers
/// log it and fall back to the data source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache command timed out after {0}ms")]
    Timeout(u64),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
