//! Embedding providers.
//!
//! The provider is a pure boundary call: one outbound request per
//! `embed`, no retries, no local caching. Callers decide how to react to
//! failures; the index's snapshot mechanism handles reuse across runs.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Credentials and endpoint settings for an OpenAI-compatible provider.
///
/// Ambient configuration is resolved here, at the composition edge;
/// nothing deeper in the stack reads environment variables.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key, if configured.
    pub api_key: Option<String>,

    /// API base URL, without a trailing slash.
    pub base_url: String,

    /// Embedding model identifier sent with each request.
    pub model: String,
}

impl ProviderConfig {
    /// Create a configuration with an explicit API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Read credentials from the environment (`OPENAI_API_KEY`,
    /// optionally `PASSAGE_BASE_URL`).
    pub fn from_env() -> Self {
        let mut config = Self {
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            ..Self::default()
        };
        if let Ok(base_url) = std::env::var("PASSAGE_BASE_URL") {
            config.base_url = base_url;
        }
        config
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
        }
    }
}

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// The model identifier this provider embeds with.
    fn model(&self) -> &str;

    /// Generate an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Embedding>;
}

/// Embedding provider backed by an OpenAI-compatible `/embeddings` API.
pub struct OpenAiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new provider from the given configuration.
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Check if the provider is usable (API key set).
    pub fn is_available(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn embed(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;

        debug!(model = %self.config.model, "requesting embedding");

        let body = serde_json::json!({
            "input": text,
            "model": self.config.model,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Provider(format!(
                "embedding request failed with {status}: {error_text}"
            )));
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            EmbeddingError::Provider(format!("unexpected embedding payload: {e}"))
        })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::Provider("no embedding in response".to_string()))?;

        if embedding.is_empty() {
            return Err(EmbeddingError::Provider(
                "empty embedding vector in response".to_string(),
            ));
        }

        debug!(dimension = embedding.len(), "received embedding");
        Ok(embedding)
    }
}

/// Response shape of the `/embeddings` endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
