use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?\n]+").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").unwrap());

/// Collapses every whitespace run into one space and trims the ends.
pub fn normalize(input: &str) -> String {
    WHITESPACE.replace_all(input.trim(), " ").into_owned()
}

/// Splits on runs of `.`, `!`, `?` and newlines, dropping empty pieces.
/// Each sentence comes back whitespace-normalized.
pub fn sentences(text: &str) -> Vec<String> {
    SENTENCE_END
        .split(text)
        .map(normalize)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Lowercase words, apostrophe contractions kept whole.
pub fn words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase().replace('\u{2019}', "'");

    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("   hello   "), "hello");
        assert_eq!(normalize("  multiple   spaces  "), "multiple spaces");
        assert_eq!(normalize("line\n\tbreaks"), "line breaks");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("     "), "");
    }

    #[test]
    fn test_sentences() {
        assert_eq!(
            sentences("Great acting! The plot dragged... Would I watch again?"),
            vec!["Great acting", "The plot dragged", "Would I watch again"]
        );
    }

    #[test]
    fn test_sentences_newlines_and_noise() {
        assert_eq!(sentences("first\nsecond\n\n"), vec!["first", "second"]);
        assert!(sentences("?!.").is_empty());
    }

    #[test]
    fn test_sentences_inner_whitespace() {
        assert_eq!(
            sentences("Great \t cast\r\n  boring   plot "),
            vec!["Great cast", "boring plot"]
        );
    }

    #[test]
    fn test_words() {
        assert_eq!(words("Don't BUY it, 10/10!"), vec!["don't", "buy", "it", "10", "10"]);
        assert_eq!(words("isn\u{2019}t"), vec!["isn't"]);
    }

    #[test]
    fn test_words_special_characters() {
        assert!(words("!@#$%^&*()").is_empty());
        assert_eq!(words("abc123!@#"), vec!["abc123"]);
    }
}
