//! Preprocessing for chat input: normalization, tokenization, stopword filtering.

mod stopwords;

pub use stopwords::{is_stopword, ENGLISH_STOPWORDS};

/// Result of running `preprocess` on one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocessed {
    pub original: String,
    /// Lowercased, trimmed, single-spaced text. Triage matches against this.
    pub normalized: String,
    pub tokens: Vec<String>,
    /// `tokens` without stopwords.
    pub content_tokens: Vec<String>,
}

impl Preprocessed {
    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Trim, lowercase, and collapse whitespace runs to a single space.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercased word tokens. Apostrophes are kept inside words ("don't") and stripped
/// at the edges.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|s| s.trim_matches('\''))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stopword(t))
        .collect()
}

/// Keep at most `max_tokens` whitespace-separated words. Text within the limit is
/// returned unchanged.
pub fn truncate_words(text: &str, max_tokens: usize) -> String {
    let mut words = text.split_whitespace();
    let kept: Vec<&str> = words.by_ref().take(max_tokens).collect();
    if words.next().is_none() {
        return text.to_string();
    }
    kept.join(" ")
}

pub fn preprocess(text: &str) -> Preprocessed {
    let normalized = normalize(text);
    let tokens = tokenize(&normalized);
    let content_tokens: Vec<String> = tokens
        .iter()
        .filter(|t| !is_stopword(t))
        .cloned()
        .collect();
    tracing::debug!(
        tokens = tokens.len(),
        content_tokens = ?content_tokens,
        "preprocessed input"
    );
    Preprocessed {
        original: text.to_string(),
        normalized,
        tokens,
        content_tokens,
    }
}
