//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur in the embeddings system.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Provider not configured (no API key).
    #[error("embedding provider not configured")]
    ProviderNotConfigured,

    /// The provider could not be reached at all.
    #[error("provider unreachable: {0}")]
    ProviderUnavailable(String),

    /// The provider was reached but returned a failure status or an
    /// unexpected payload.
    #[error("provider error: {0}")]
    Provider(String),

    /// Empty or whitespace-only input text.
    #[error("empty input text")]
    EmptyInput,

    /// Vector dimensionality inconsistent with the index.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Snapshot file unreadable or unwritable.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            EmbeddingError::ProviderUnavailable(err.to_string())
        } else {
            EmbeddingError::Provider(err.to_string())
        }
    }
}
