//! Error types for scanlog
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in scanlog
#[derive(Debug, Error)]
pub enum ScanlogError {
    /// Input rejected before it reached the log (e.g. an empty code)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The decision collaborator failed or did not answer in time
    #[error("Classification unavailable: {0}")]
    ClassificationUnavailable(String),

    /// Unparseable filter, code kind or script text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A shared lock was poisoned by a panicking holder
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScanlogError {
    /// Nothing in the core is fatal; callers recover per session or per operation.
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Only a failed classification is worth retrying with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScanlogError::ClassificationUnavailable(_))
    }
}

/// Result type alias for scanlog operations
pub type Result<T> = std::result::Result<T, ScanlogError>;
