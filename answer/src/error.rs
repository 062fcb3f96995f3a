//! Error types for answer composition.

use thiserror::Error;

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, AnswerError>;

/// Errors that can occur while generating an answer.
///
/// These never reach the end user: the composer always falls back to
/// the deterministic template path instead of surfacing them.
#[derive(Error, Debug)]
pub enum AnswerError {
    /// Provider not configured (no API key).
    #[error("generation provider not configured")]
    ProviderNotConfigured,

    /// The provider could not be reached at all.
    #[error("provider unreachable: {0}")]
    ProviderUnavailable(String),

    /// The provider was reached but returned a failure status or an
    /// unexpected payload.
    #[error("provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for AnswerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            AnswerError::ProviderUnavailable(err.to_string())
        } else {
            AnswerError::Provider(err.to_string())
        }
    }
}
