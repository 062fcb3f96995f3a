//! Error types for the retrieval engine.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur in the retrieval engine.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Malformed caller input, e.g. a zero chunk size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Embedding or index error.
    ///
    /// Snapshot I/O failures arrive through here too, wrapped in
    /// [`passage_embeddings::EmbeddingError`].
    #[error("embedding error: {0}")]
    Embedding(#[from] passage_embeddings::EmbeddingError),
}
