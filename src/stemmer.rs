use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;

/// Morphological reduction of a single token.
pub trait Stem {
    fn stem(&self, token: &str) -> String;
}

/// Snowball stemmer for Portuguese speech text.
pub struct SnowballStemmer {
    stemmer: Stemmer,
}

impl SnowballStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        SnowballStemmer {
            stemmer: Stemmer::create(algorithm),
        }
    }

    pub fn portuguese() -> Self {
        Self::new(Algorithm::Portuguese)
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::portuguese()
    }
}

impl Stem for SnowballStemmer {
    fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}

/// Caches stems for the lifetime of one corpus run.
pub struct MemoizedStemmer<'a> {
    inner: &'a dyn Stem,
    cache: HashMap<String, String>,
    misses: usize,
}

impl<'a> MemoizedStemmer<'a> {
    pub fn new(inner: &'a dyn Stem) -> Self {
        MemoizedStemmer {
            inner,
            cache: HashMap::new(),
            misses: 0,
        }
    }

    pub fn stem(&mut self, token: &str) -> &str {
        if !self.cache.contains_key(token) {
            self.misses += 1;
            let stem = self.inner.stem(token);
            self.cache.insert(token.to_string(), stem);
        }
        &self.cache[token]
    }

    /// Number of times the wrapped stemmer actually ran.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn cached_tokens(&self) -> usize {
        self.cache.len()
    }
}
