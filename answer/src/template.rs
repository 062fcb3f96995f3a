//! Deterministic fallback answer assembly.
//!
//! Used when no generation provider is configured or its call fails.
//! The output is a heuristic degraded-mode answer: an opening clause
//! picked by similarity band, keyword-bearing sentences from the top
//! chunk, at most one excerpt from the runners-up, and a fixed closing
//! invitation. It never fails for any valid chunk set.

use passage_embeddings::QueryResult;

pub(crate) const NOT_FOUND: &str =
    "I couldn't find any information related to your query in the indexed documents.";

const CLOSING: &str = "Let me know if you'd like more detail on any of this.";

/// Maximum keyword-bearing sentences pulled from the top chunk.
const MAX_TOP_SENTENCES: usize = 3;

pub(crate) fn render(query: &str, results: &[QueryResult]) -> String {
    let Some(top) = results.first() else {
        return NOT_FOUND.to_string();
    };

    let keywords = keywords(query);
    let mut answer = opening_for(top.similarity).to_string();

    let mut picked = 0;
    for sentence in sentences(&top.text) {
        if picked == MAX_TOP_SENTENCES {
            break;
        }
        if bears_keyword(sentence, &keywords) {
            answer.push(' ');
            answer.push_str(sentence);
            picked += 1;
        }
    }
    if picked == 0 {
        // No keyword hit anywhere in the top chunk: quote its opening
        // sentence rather than answering with nothing.
        if let Some(first) = sentences(&top.text).next() {
            answer.push(' ');
            answer.push_str(first);
        }
    }

    // One extra excerpt from the second or third chunk, only when it
    // introduces keyword-bearing content the answer doesn't already
    // contain verbatim.
    for extra in results.iter().skip(1).take(2) {
        let fresh = sentences(&extra.text)
            .find(|s| bears_keyword(s, &keywords) && !answer.contains(s));
        if let Some(sentence) = fresh {
            answer.push_str("\n\nRelated: ");
            answer.push_str(sentence);
            break;
        }
    }

    answer.push_str("\n\n");
    answer.push_str(CLOSING);
    answer
}

fn opening_for(similarity: f32) -> &'static str {
    if similarity > 0.8 {
        "Based on the indexed documents:"
    } else if similarity > 0.6 {
        "This looks relevant to your question:"
    } else if similarity > 0.4 {
        "This might be related to what you're asking:"
    } else {
        "I'm not certain this answers your question, but the closest match is:"
    }
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn keywords(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 4)
        .map(str::to_lowercase)
        .collect()
}

fn bears_keyword(sentence: &str, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return false;
    }
    let lower = sentence.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn result(text: &str, similarity: f32) -> QueryResult {
        QueryResult {
            text: text.to_string(),
            metadata: Map::new(),
            similarity,
        }
    }

    #[test]
    fn test_opening_bands() {
        assert_eq!(opening_for(0.9), "Based on the indexed documents:");
        assert_eq!(opening_for(0.7), "This looks relevant to your question:");
        assert_eq!(opening_for(0.5), "This might be related to what you're asking:");
        assert_eq!(
            opening_for(0.3),
            "I'm not certain this answers your question, but the closest match is:"
        );
        // Band edges are exclusive.
        assert_eq!(opening_for(0.8), "This looks relevant to your question:");
        assert_eq!(opening_for(0.6), "This might be related to what you're asking:");
        assert_eq!(
            opening_for(0.4),
            "I'm not certain this answers your question, but the closest match is:"
        );
    }

    #[test]
    fn test_render_empty_results_is_not_found() {
        assert_eq!(render("anything", &[]), NOT_FOUND);
    }

    #[test]
    fn test_render_picks_keyword_sentences() {
        let results = [result(
            "Forms support exports in several formats. The sky is blue. \
             Exports run nightly.",
            0.9,
        )];
        let answer = render("how do exports work", &results);

        assert!(answer.starts_with("Based on the indexed documents:"));
        assert!(answer.contains("exports in several formats."));
        assert!(answer.contains("Exports run nightly."));
        assert!(!answer.contains("The sky is blue."));
        assert!(answer.ends_with(CLOSING));
    }

    #[test]
    fn test_render_falls_back_to_first_sentence_without_keyword_hits() {
        let results = [result("Completely unrelated content. More of it.", 0.9)];
        let answer = render("zzzz qqqq", &results);

        assert!(answer.contains("Completely unrelated content."));
        assert!(!answer.contains("More of it."));
    }

    #[test]
    fn test_runner_up_excerpt_requires_new_content() {
        let shared = "Exports run nightly.";
        let results = [
            result(&format!("Forms support exports. {shared}"), 0.9),
            // Second chunk repeats a sentence already in the answer.
            result(shared, 0.8),
            result("Exports can be scheduled weekly too.", 0.7),
        ];
        let answer = render("tell me about exports", &results);

        // The duplicate is skipped; the third chunk's fresh sentence wins.
        assert_eq!(answer.matches(shared).count(), 1);
        assert!(answer.contains("Related: Exports can be scheduled weekly too."));
    }

    #[test]
    fn test_render_never_panics_on_degenerate_chunks() {
        let results = [result("", 0.9), result("   ", 0.8)];
        let answer = render("", &results);
        assert!(answer.ends_with(CLOSING));
    }
}
