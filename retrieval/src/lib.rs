//! # Passage Retrieval
//!
//! This crate is the front door of the Passage retrieval core. It
//! composes the document chunker, the embedding provider boundary, and
//! the in-memory vector index into a single engine exposing four calls:
//! `add_document`, `query`, `snapshot_save`, and `snapshot_load`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Retrieval Engine                      │
//! ├─────────────────────────────────────────────────────────┤
//! │                                                         │
//! │   document ──► Chunker ──► EmbeddingProvider ──► insert │
//! │                                                    │    │
//! │                                              VectorIndex│
//! │                                                    │    │
//! │   query ─────► EmbeddingProvider ──► search ──► ranked  │
//! │                                                 chunks  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use passage_embeddings::{OpenAiProvider, ProviderConfig};
//! use passage_retrieval::RetrievalEngine;
//!
//! let provider = Arc::new(OpenAiProvider::new(ProviderConfig::from_env()));
//! let engine = RetrievalEngine::new(provider);
//!
//! engine.add_document(text, metadata).await?;
//! let results = engine.query("how do I export results?").await?;
//! ```

pub mod chunker;
pub mod config;
pub mod engine;
pub mod error;

pub use chunker::chunk_text;
pub use config::EngineConfig;
pub use engine::{IndexStats, RetrievalEngine};
pub use error::{Result, RetrievalError};

// Re-export from dependencies for convenience
pub use passage_embeddings::{EmbeddingProvider, QueryResult, VectorIndex};
