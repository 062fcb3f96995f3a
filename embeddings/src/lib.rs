//! # Passage Embeddings
//!
//! This crate provides the embedding boundary and the in-memory vector
//! index at the heart of the Passage retrieval system.
//!
//! ## Features
//!
//! - **Embedding Generation**: Convert text to dense vectors via an
//!   OpenAI-compatible embeddings API
//! - **Similarity Search**: Cosine-similarity k-nearest-neighbor search
//!   over an insertion-ordered chunk sequence
//! - **Snapshots**: Flat-file save/restore of the full index so
//!   embeddings survive process restarts without re-billing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Embeddings System                      │
//! ├─────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► VectorIndex        │
//! │        │                                 │              │
//! │        ▼                                 ▼              │
//! │  OpenAI-compatible API          cosine search + snapshot│
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;
pub mod snapshot;

pub use error::{EmbeddingError, Result};
pub use index::{Chunk, QueryResult, VectorIndex};
pub use provider::{EmbeddingProvider, OpenAiProvider, ProviderConfig};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
