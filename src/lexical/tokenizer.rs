/// Splits text into index terms.
pub trait Tokenize: Send + Sync {
    /// Returns the terms of `text` in order (duplicates preserved).
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Lowercase + whitespace split.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenize for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }
}
