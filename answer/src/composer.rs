//! Answer composition from ranked retrieval results.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use passage_embeddings::QueryResult;

use crate::generation::GenerationProvider;
use crate::template;

/// Tuning knobs for answer composition.
#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Hard usefulness gate: below this top similarity the composer
    /// answers "not found" instead of building on weak matches.
    pub min_usefulness: f32,

    /// How many ranked chunks ground the generation prompt.
    pub grounding_chunks: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            min_usefulness: 0.25,
            grounding_chunks: 3,
        }
    }
}

/// Where an answer's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// The external generation provider.
    Generated,
    /// Deterministic template assembly.
    Template,
    /// Nothing relevant enough to answer from.
    NotFound,
}

/// A citation for one ranked chunk backing the answer.
#[derive(Debug, Clone, Serialize)]
pub struct Citation {
    /// Source name from the chunk's metadata.
    pub source: String,

    /// Cosine similarity of the cited chunk.
    pub similarity: f32,
}

impl Citation {
    /// Render as e.g. `"release notes (87% relevance)"`.
    pub fn label(&self) -> String {
        format!(
            "{} ({}% relevance)",
            self.source,
            (self.similarity * 100.0) as i32
        )
    }
}

/// A composed answer with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// The answer text.
    pub text: String,

    /// Which path produced the text.
    pub source: AnswerSource,

    /// Citations for the ranked chunks, best first.
    pub citations: Vec<Citation>,
}

/// Composes natural-language answers from ranked chunks.
///
/// The primary path makes one billed call to a generation provider; the
/// fallback path makes none. Composition never fails: provider errors
/// degrade to the template path, low-relevance results degrade to a
/// generic not-found answer.
pub struct AnswerComposer {
    config: ComposerConfig,
    provider: Option<Arc<dyn GenerationProvider>>,
}

impl AnswerComposer {
    /// Template-only composer; never makes an external call.
    pub fn new() -> Self {
        Self {
            config: ComposerConfig::default(),
            provider: None,
        }
    }

    /// Composer that prefers the given generation provider.
    pub fn with_provider(provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            config: ComposerConfig::default(),
            provider: Some(provider),
        }
    }

    /// Override the default configuration.
    pub fn with_config(mut self, config: ComposerConfig) -> Self {
        self.config = config;
        self
    }

    /// Compose an answer for `query` from `results` (ranked, best
    /// first).
    pub async fn compose(&self, query: &str, results: &[QueryResult]) -> Answer {
        let citations = citations(results);

        let relevant = results
            .first()
            .is_some_and(|top| top.similarity >= self.config.min_usefulness);
        if !relevant {
            debug!("no result clears the usefulness gate");
            return Answer {
                text: template::NOT_FOUND.to_string(),
                source: AnswerSource::NotFound,
                citations,
            };
        }

        if let Some(provider) = &self.provider {
            let (system, prompt) = self.grounding_prompt(query, results);
            match provider.complete(&system, &prompt).await {
                Ok(text) => {
                    return Answer {
                        text: text.trim().to_string(),
                        source: AnswerSource::Generated,
                        citations,
                    };
                }
                Err(err) => {
                    warn!(%err, "generation failed, falling back to template answer");
                }
            }
        }

        Answer {
            text: template::render(query, results),
            source: AnswerSource::Template,
            citations,
        }
    }

    fn grounding_prompt(&self, query: &str, results: &[QueryResult]) -> (String, String) {
        let system = "You answer questions strictly from the provided context passages. \
             If the context does not contain the answer, say so plainly."
            .to_string();

        let mut prompt = String::from("Context:\n");
        for result in results.iter().take(self.config.grounding_chunks) {
            prompt.push_str(&format!(
                "\nDocument (relevance {:.2}):\n{}\n",
                result.similarity, result.text
            ));
        }
        prompt.push_str(&format!("\nQuestion: {query}"));

        (system, prompt)
    }
}

impl Default for AnswerComposer {
    fn default() -> Self {
        Self::new()
    }
}

fn citations(results: &[QueryResult]) -> Vec<Citation> {
    results
        .iter()
        .map(|r| Citation {
            source: r
                .metadata
                .get("source")
                .and_then(|v| v.as_str())
                .unwrap_or("Documentation")
                .to_string(),
            similarity: r.similarity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, Value};

    fn result(text: &str, source: &str, similarity: f32) -> QueryResult {
        let mut metadata = Map::new();
        metadata.insert("source".to_string(), Value::from(source));
        QueryResult {
            text: text.to_string(),
            metadata,
            similarity,
        }
    }

    #[test]
    fn test_citation_labels() {
        let citation = Citation {
            source: "release notes".to_string(),
            similarity: 0.876,
        };
        assert_eq!(citation.label(), "release notes (87% relevance)");
    }

    #[tokio::test]
    async fn test_not_found_below_usefulness_gate() {
        let composer = AnswerComposer::new();
        let results = [result("weakly related text.", "docs", 0.1)];

        let answer = composer.compose("a question", &results).await;

        assert_eq!(answer.source, AnswerSource::NotFound);
        assert_eq!(answer.text, template::NOT_FOUND);
        // Citations still describe what was considered.
        assert_eq!(answer.citations.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_on_empty_results() {
        let composer = AnswerComposer::new();
        let answer = composer.compose("a question", &[]).await;

        assert_eq!(answer.source, AnswerSource::NotFound);
        assert!(answer.citations.is_empty());
    }

    #[tokio::test]
    async fn test_template_path_without_provider() {
        let composer = AnswerComposer::new();
        let results = [result("Exports run nightly.", "docs", 0.9)];

        let answer = composer.compose("when do exports run", &results).await;

        assert_eq!(answer.source, AnswerSource::Template);
        assert!(answer.text.contains("Exports run nightly."));
        assert_eq!(answer.citations[0].source, "docs");
    }

    #[test]
    fn test_grounding_prompt_caps_chunks() {
        let composer = AnswerComposer::new();
        let results: Vec<QueryResult> = (0..5)
            .map(|i| result(&format!("chunk number {i}."), "docs", 0.9))
            .collect();

        let (system, prompt) = composer.grounding_prompt("the question", &results);

        assert!(system.contains("context passages"));
        assert!(prompt.contains("chunk number 0."));
        assert!(prompt.contains("chunk number 2."));
        assert!(!prompt.contains("chunk number 3."));
        assert!(prompt.ends_with("Question: the question"));
    }
}
