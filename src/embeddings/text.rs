//! Text preparation before embedding

/// Longest input sent to the embedding API, in characters
///
/// Roughly 6k tokens of English text, below the 8191-token limit of the
/// OpenAI embedding models.
pub const MAX_EMBEDDING_CHARS: usize = 24_000;

/// Collapse whitespace runs and cap the length at a character boundary
pub fn prepare_text(text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match normalized.char_indices().nth(MAX_EMBEDDING_CHARS) {
        Some((cut, _)) => normalized[..cut].to_string(),
        None => normalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(prepare_text("  Hello\n\n world\t!  "), "Hello world !");
    }

    #[test]
    fn test_short_text_is_unchanged() {
        assert_eq!(prepare_text("What does Able do?"), "What does Able do?");
    }

    #[test]
    fn test_long_text_is_capped_on_char_boundary() {
        let text = "é".repeat(MAX_EMBEDDING_CHARS + 10);
        let prepared = prepare_text(&text);
        assert_eq!(prepared.chars().count(), MAX_EMBEDDING_CHARS);
    }
}
