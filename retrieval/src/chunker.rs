//! Fixed-width document chunking.
//!
//! Documents are split into contiguous, non-overlapping slices of a
//! fixed number of characters; concatenating the slices reproduces the
//! input exactly. The slicing is deliberately naive and can cut mid-word
//! or mid-sentence; that is a quality limitation, not a correctness bug.

use crate::error::{Result, RetrievalError};

/// Default chunk width, in characters.
pub const DEFAULT_CHUNK_CHARS: usize = 1000;

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Text that fits in one chunk is returned unchanged. Otherwise every
/// chunk except possibly the last holds exactly `max_chars` characters
/// and the last holds the remainder. Slicing counts Unicode scalar
/// values, so a multi-byte character is never split.
pub fn chunk_text(text: &str, max_chars: usize) -> Result<Vec<String>> {
    if max_chars == 0 {
        return Err(RetrievalError::InvalidArgument(
            "chunk size must be a positive number of characters".to_string(),
        ));
    }

    if text.chars().count() <= max_chars {
        return Ok(vec![text.to_string()]);
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}
