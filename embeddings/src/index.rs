//! In-memory vector index with cosine-similarity search.
//!
//! The index owns an insertion-ordered sequence of chunks. Chunks are
//! created on `insert`, never mutated, and destroyed only by `clear` or
//! a snapshot load replacing the whole sequence. Search is a linear scan,
//! which is fine at the scale this index is built for (tens to low
//! hundreds of chunks).

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::similarity::cosine_similarity;

/// A stored chunk: the unit of embedding and retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The chunk text, non-empty and immutable once stored.
    pub text: String,

    /// The embedding vector.
    pub embedding: Embedding,

    /// Caller-supplied provenance, stored and returned opaquely.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A search hit, derived per query and never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The matched chunk text.
    pub text: String,

    /// The matched chunk's metadata.
    pub metadata: Map<String, Value>,

    /// Cosine similarity to the query, in [-1, 1].
    pub similarity: f32,
}

/// An insertion-ordered in-memory vector index.
///
/// All embeddings in one index share a single dimensionality, fixed by
/// the first inserted (or loaded) chunk; a mismatch fails fast rather
/// than silently computing garbage similarity.
#[derive(Debug, Default)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    dimension: Option<usize>,
}

impl VectorIndex {
    /// Create a new, empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The index's embedding dimensionality, or `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Number of stored chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Remove all chunks. The dimensionality resets with the content.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.dimension = None;
        info!("cleared vector index");
    }

    pub(crate) fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub(crate) fn replace(&mut self, chunks: Vec<Chunk>) {
        self.dimension = chunks.first().map(|c| c.embedding.len());
        self.chunks = chunks;
    }

    /// Append a chunk to the index.
    ///
    /// Fails with [`EmbeddingError::DimensionMismatch`] if the embedding's
    /// dimensionality differs from the chunks already stored, and with
    /// [`EmbeddingError::EmptyInput`] for empty text.
    pub fn insert(
        &mut self,
        text: impl Into<String>,
        embedding: Embedding,
        metadata: Map<String, Value>,
    ) -> Result<()> {
        let text = text.into();
        if text.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        match self.dimension {
            Some(expected) if embedding.len() != expected => {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
            None => self.dimension = Some(embedding.len()),
            Some(_) => {}
        }

        self.chunks.push(Chunk {
            text,
            embedding,
            metadata,
        });
        Ok(())
    }

    /// Search for the chunks most similar to `query`.
    ///
    /// Returns at most `top_k` results, ordered by descending similarity,
    /// all scoring at least `min_similarity`. Ties keep their original
    /// insertion order. An empty index yields an empty result set, not an
    /// error; so does `top_k == 0`.
    pub fn search(
        &self,
        query: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> Result<Vec<QueryResult>> {
        if self.chunks.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        if let Some(expected) = self.dimension {
            if query.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                });
            }
        }

        let mut scored: Vec<(OrderedFloat<f32>, usize)> = Vec::with_capacity(self.chunks.len());
        for (position, chunk) in self.chunks.iter().enumerate() {
            let score = cosine_similarity(query, &chunk.embedding)?;
            if score >= min_similarity {
                scored.push((OrderedFloat(score), position));
            }
        }

        // Stable sort: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let results = scored
            .into_iter()
            .take(top_k)
            .map(|(score, position)| {
                let chunk = &self.chunks[position];
                QueryResult {
                    text: chunk.text.clone(),
                    metadata: chunk.metadata.clone(),
                    similarity: score.0,
                }
            })
            .collect();

        Ok(results)
    }
}
