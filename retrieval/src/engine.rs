//! Retrieval engine implementation.

use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use passage_embeddings::{EmbeddingProvider, QueryResult, VectorIndex};

use crate::chunker::chunk_text;
use crate::config::EngineConfig;
use crate::error::Result;

/// The retrieval engine: chunker + embedder + vector index.
///
/// Each call runs start to finish without internal parallelism, but the
/// engine itself is safe to share across concurrent callers: the index
/// sits behind a reader-writer lock, and provider calls are awaited with
/// no lock held.
pub struct RetrievalEngine {
    config: EngineConfig,
    provider: Arc<dyn EmbeddingProvider>,
    index: Arc<RwLock<VectorIndex>>,
}

impl RetrievalEngine {
    /// Create an engine with default configuration and a fresh index.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self::with_config(provider, EngineConfig::default())
    }

    /// Create an engine with the given configuration and a fresh index.
    pub fn with_config(provider: Arc<dyn EmbeddingProvider>, config: EngineConfig) -> Self {
        Self::with_index(provider, config, Arc::new(RwLock::new(VectorIndex::new())))
    }

    /// Create an engine over an existing shared index.
    ///
    /// Two engines given the same handle serve the same corpus without
    /// embedding it twice. Whoever keeps the last handle owns the
    /// snapshot lifecycle; two independent savers racing over one file
    /// is a caller bug.
    pub fn with_index(
        provider: Arc<dyn EmbeddingProvider>,
        config: EngineConfig,
        index: Arc<RwLock<VectorIndex>>,
    ) -> Self {
        Self {
            config,
            provider,
            index,
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// A shareable handle to the underlying index.
    pub fn index(&self) -> Arc<RwLock<VectorIndex>> {
        Arc::clone(&self.index)
    }

    /// Chunk, embed, and insert a document.
    ///
    /// Each chunk gets a copy of `metadata` extended with a 0-based
    /// `chunk_id`. A chunk whose embedding fails is skipped with a
    /// warning rather than rejecting the whole document; the returned
    /// count is the number of chunks actually inserted.
    pub async fn add_document(&self, text: &str, metadata: Map<String, Value>) -> Result<usize> {
        let chunks = chunk_text(text, self.config.chunk_chars)?;
        debug!(chunks = chunks.len(), "processed document into chunks");

        let mut inserted = 0;
        for (chunk_id, chunk) in chunks.into_iter().enumerate() {
            // Provider round trip happens before the write lock is taken.
            let embedding = match self.provider.embed(&chunk).await {
                Ok(embedding) => embedding,
                Err(err) => {
                    warn!(chunk_id, %err, "skipping chunk: embedding failed");
                    continue;
                }
            };

            let mut chunk_metadata = metadata.clone();
            chunk_metadata.insert("chunk_id".to_string(), Value::from(chunk_id as u64));

            self.index
                .write()
                .await
                .insert(chunk, embedding, chunk_metadata)?;
            inserted += 1;
        }

        info!(inserted, "added document to index");
        Ok(inserted)
    }

    /// Retrieve the ranked chunks most relevant to `text`, using the
    /// configured defaults for result count and similarity floor.
    ///
    /// An empty index yields an empty result set; a failed query
    /// embedding propagates as an error, distinguishable from "no
    /// relevant matches found".
    pub async fn query(&self, text: &str) -> Result<Vec<QueryResult>> {
        self.query_with(text, self.config.top_k, self.config.min_similarity)
            .await
    }

    /// Like [`query`](Self::query), with per-call tuning.
    pub async fn query_with(
        &self,
        text: &str,
        top_k: usize,
        min_similarity: f32,
    ) -> Result<Vec<QueryResult>> {
        let query_embedding = self.provider.embed(text).await?;
        let results = self
            .index
            .read()
            .await
            .search(&query_embedding, top_k, min_similarity)?;
        debug!(results = results.len(), "query complete");
        Ok(results)
    }

    /// Snapshot the index to `path`, excluding concurrent inserts.
    pub async fn snapshot_save(&self, path: impl AsRef<Path>) -> Result<()> {
        let index = self.index.write().await;
        index.save_snapshot(path.as_ref()).await?;
        Ok(())
    }

    /// Restore the index from `path`.
    ///
    /// Returns `false` when there is nothing usable to load, so callers
    /// can rebuild from source data instead.
    pub async fn snapshot_load(&self, path: impl AsRef<Path>) -> Result<bool> {
        let mut index = self.index.write().await;
        Ok(index.load_snapshot(path.as_ref()).await?)
    }

    /// Current index size and dimensionality, for health reporting.
    pub async fn stats(&self) -> IndexStats {
        let index = self.index.read().await;
        IndexStats {
            chunks: index.len(),
            dimension: index.dimension(),
        }
    }
}

/// Point-in-time index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of stored chunks.
    pub chunks: usize,

    /// Embedding dimensionality, `None` while the index is empty.
    pub dimension: Option<usize>,
}
