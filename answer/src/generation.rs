//! Generation provider boundary for the primary answer path.
//!
//! One outbound call per composed answer: a system instruction plus a
//! single formatted prompt, expecting a single text completion back.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AnswerError, Result};

/// Credentials and endpoint settings for an OpenAI-compatible chat API.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// API key, if configured.
    pub api_key: Option<String>,

    /// API base URL, without a trailing slash.
    pub base_url: String,

    /// Chat model identifier sent with each request.
    pub model: String,
}

impl GenerationConfig {
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

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// Trait for text-generation providers.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Produce a completion for `prompt` under the given system
    /// instruction.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

/// Generation provider backed by an OpenAI-compatible `/chat/completions`
/// API.
pub struct OpenAiChatProvider {
    config: GenerationConfig,
    client: reqwest::Client,
}

impl OpenAiChatProvider {
    /// Create a new provider from the given configuration.
    pub fn new(config: GenerationConfig) -> Self {
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
impl GenerationProvider for OpenAiChatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(AnswerError::ProviderNotConfigured)?;

        debug!(model = %self.config.model, "requesting completion");

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt},
            ],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnswerError::Provider(format!(
                "completion request failed with {status}: {error_text}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnswerError::Provider(format!("unexpected completion payload: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnswerError::Provider("no completion in response".to_string()))
    }
}

/// Response shape of the `/chat/completions` endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}
