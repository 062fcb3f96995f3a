//! # Passage Answer
//!
//! Turns ranked retrieval results into a natural-language answer with
//! citations. The primary path grounds a text-generation call in the
//! top-ranked chunks; when no provider is configured or the call fails,
//! a deterministic template assembles a degraded-mode answer instead of
//! surfacing the failure.

pub mod composer;
pub mod error;
pub mod generation;
mod template;

pub use composer::{Answer, AnswerComposer, AnswerSource, Citation, ComposerConfig};
pub use error::{AnswerError, Result};
pub use generation::{GenerationConfig, GenerationProvider, OpenAiChatProvider};
