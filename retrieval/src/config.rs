//! Configuration for the retrieval engine.

use serde::{Deserialize, Serialize};

use crate::chunker::DEFAULT_CHUNK_CHARS;

/// Tuning knobs for chunking and search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chunk width, in characters.
    pub chunk_chars: usize,

    /// Default number of results returned by `query`.
    pub top_k: usize,

    /// Default similarity floor; filters obvious non-matches.
    pub min_similarity: f32,
}

impl EngineConfig {
    /// Set the chunk width.
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars;
        self
    }

    /// Set the default result count.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the default similarity floor.
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_chars: DEFAULT_CHUNK_CHARS,
            top_k: 3,
            min_similarity: 0.2,
        }
    }
}
