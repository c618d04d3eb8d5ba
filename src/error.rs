//! Error types for rich-text normalization
//!
//! The normalization stages themselves are total: they recover from
//! malformed markup instead of failing. Errors only originate at the
//! edges of the pipeline: the external sanitizer, configuration loading,
//! and the blocking-task wrapper.

use thiserror::Error;

/// Result type alias for normalization operations
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Error types for normalization operations
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The external sanitizer rejected or failed on its input
    #[error("Sanitizer failed: {0}")]
    Sanitizer(String),

    /// Configuration document is structurally valid JSON but semantically wrong
    #[error("Invalid normalizer configuration: {0}")]
    Config(String),

    /// IO error while reading configuration or input
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Blocking normalization task panicked or was cancelled
    #[error("Normalization task failed: {0}")]
    TaskJoin(String),
}

impl From<anyhow::Error> for NormalizeError {
    fn from(error: anyhow::Error) -> Self {
        NormalizeError::Sanitizer(error.to_string())
    }
}

impl From<tokio::task::JoinError> for NormalizeError {
    fn from(error: tokio::task::JoinError) -> Self {
        NormalizeError::TaskJoin(error.to_string())
    }
}

impl NormalizeError {
    /// Whether the failure came from the external sanitizer rather than from
    /// this crate's own configuration or plumbing
    #[must_use]
    pub fn is_sanitizer_failure(&self) -> bool {
        matches!(self, NormalizeError::Sanitizer(_))
    }
}
