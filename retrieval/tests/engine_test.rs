//! Integration tests for the retrieval engine, driven by a deterministic
//! in-process embedding provider.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{Map, Value};
use tempfile::TempDir;

use passage_embeddings::{Embedding, EmbeddingError, EmbeddingProvider};
use passage_retrieval::{EngineConfig, RetrievalEngine, RetrievalError};

/// Deterministic test provider: the same text always embeds to the same
/// 4-dimensional vector, with an optional per-text failure list.
struct StubProvider {
    fail_on: Vec<String>,
}

impl StubProvider {
    fn new() -> Self {
        Self { fail_on: Vec::new() }
    }

    fn failing_on(texts: &[&str]) -> Self {
        Self {
            fail_on: texts.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-embedding"
    }

    async fn embed(&self, text: &str) -> passage_embeddings::Result<Embedding> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        if self.fail_on.iter().any(|t| t == text) {
            return Err(EmbeddingError::Provider("stub failure".to_string()));
        }

        let mut vector = [0.0f32; 4];
        for (i, ch) in text.chars().enumerate() {
            vector[i % 4] += (ch as u32 % 13) as f32 + 1.0;
        }
        Ok(vector.to_vec())
    }
}

fn engine_with(provider: StubProvider, chunk_chars: usize) -> RetrievalEngine {
    RetrievalEngine::with_config(
        Arc::new(provider),
        EngineConfig::default().with_chunk_chars(chunk_chars),
    )
}

fn meta(source: &str) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("source".to_string(), Value::from(source));
    m
}

#[tokio::test]
async fn add_document_chunks_and_numbers_them() {
    let engine = engine_with(StubProvider::new(), 2);

    let added = engine.add_document("AAAA", meta("docs")).await.unwrap();
    assert_eq!(added, 2);

    let stats = engine.stats().await;
    assert_eq!(stats.chunks, 2);
    assert_eq!(stats.dimension, Some(4));

    // Both chunks carry the caller metadata plus a 0-based chunk_id.
    let results = engine.query_with("AA", 10, -1.0).await.unwrap();
    assert_eq!(results.len(), 2);

    let mut chunk_ids: Vec<u64> = results
        .iter()
        .map(|r| r.metadata["chunk_id"].as_u64().unwrap())
        .collect();
    chunk_ids.sort_unstable();
    assert_eq!(chunk_ids, vec![0, 1]);
    for result in &results {
        assert_eq!(result.metadata["source"], "docs");
    }
}

#[tokio::test]
async fn add_document_skips_failed_chunks() {
    // "abcdef" with width 2 chunks into "ab", "cd", "ef"; "cd" fails.
    let engine = engine_with(StubProvider::failing_on(&["cd"]), 2);

    let added = engine.add_document("abcdef", Map::new()).await.unwrap();
    assert_eq!(added, 2);
    assert_eq!(engine.stats().await.chunks, 2);

    let chunk_ids: Vec<u64> = engine
        .query_with("ab", 10, -1.0)
        .await
        .unwrap()
        .iter()
        .map(|r| r.metadata["chunk_id"].as_u64().unwrap())
        .collect();
    assert!(!chunk_ids.contains(&1), "failed chunk must not be inserted");
}

#[tokio::test]
async fn query_on_empty_index_returns_empty() {
    let engine = engine_with(StubProvider::new(), 100);
    let results = engine.query("anything at all").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn query_propagates_embedding_failure() {
    let engine = engine_with(StubProvider::failing_on(&["broken query"]), 100);
    engine.add_document("some document", Map::new()).await.unwrap();

    let err = engine.query("broken query").await.unwrap_err();
    assert!(matches!(err, RetrievalError::Embedding(_)), "got {err:?}");
}

#[tokio::test]
async fn query_respects_configured_top_k() {
    let engine = RetrievalEngine::with_config(
        Arc::new(StubProvider::new()),
        EngineConfig::default().with_chunk_chars(2).with_top_k(3),
    );

    engine.add_document("aabbccddeeff", Map::new()).await.unwrap();
    assert_eq!(engine.stats().await.chunks, 6);

    let results = engine.query_with("aa", 3, -1.0).await.unwrap();
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn engines_can_share_one_index() {
    let first = engine_with(StubProvider::new(), 100);
    let second = RetrievalEngine::with_index(
        Arc::new(StubProvider::new()),
        EngineConfig::default(),
        first.index(),
    );

    first
        .add_document("shared corpus text", meta("docs"))
        .await
        .unwrap();

    // The second engine sees the first engine's chunks without
    // re-embedding anything.
    assert_eq!(second.stats().await.chunks, 1);
    let results = second.query("shared corpus text").await.unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn snapshot_round_trip_through_engine() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("embeddings_cache.json");

    let engine = engine_with(StubProvider::new(), 100);
    engine
        .add_document("a document worth keeping", meta("docs"))
        .await
        .unwrap();
    engine.snapshot_save(&path).await.unwrap();

    let restored = engine_with(StubProvider::new(), 100);
    assert!(restored.snapshot_load(&path).await.unwrap());
    assert_eq!(restored.stats().await, engine.stats().await);
}

#[tokio::test]
async fn snapshot_load_missing_file_is_false_not_error() {
    let dir = TempDir::new().unwrap();
    let engine = engine_with(StubProvider::new(), 100);

    let loaded = engine
        .snapshot_load(dir.path().join("nope.json"))
        .await
        .unwrap();
    assert!(!loaded);
}

#[tokio::test]
async fn add_document_rejects_zero_chunk_size() {
    let engine = engine_with(StubProvider::new(), 0);
    let err = engine.add_document("text", Map::new()).await.unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidArgument(_)));
}
