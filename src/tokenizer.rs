use std::collections::HashMap;
use std::sync::Arc;

/// Whitespace tokenizer with a per-run cache keyed by the exact input text.
///
/// Normalized text is tokenized once while building the frequency index and
/// again when building stem sequences; the second call is served from cache.
#[derive(Debug, Default)]
pub struct Tokenizer {
    cache: HashMap<String, Arc<[String]>>,
    hits: usize,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize(&mut self, text: &str) -> Arc<[String]> {
        if let Some(tokens) = self.cache.get(text) {
            self.hits += 1;
            return Arc::clone(tokens);
        }

        let tokens: Arc<[String]> = text.split_whitespace().map(str::to_string).collect();
        self.cache.insert(text.to_string(), Arc::clone(&tokens));
        tokens
    }

    pub fn cached_texts(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_hits(&self) -> usize {
        self.hits
    }
}
