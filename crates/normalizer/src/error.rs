//! Error types for the normalizer.

use thiserror::Error;

/// Normalizer error type.
#[derive(Debug, Error)]
pub enum Error {
    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Downstream notification channel closed.
    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type for normalizer operations.
pub type Result<T> = std::result::Result<T, Error>;
