use crate::errors::{CorpusError, CorpusResult};
use crate::frequency_index::TokenFrequencyIndex;
use crate::stemmer::{MemoizedStemmer, Stem};
use crate::stopwords::StopwordPolicy;
use crate::text_normalizer::TextNormalizer;
use crate::tokenizer::Tokenizer;

/// State owned by a single corpus run.
///
/// A run moves through two passes separated by `finalize`: `ingest`
/// normalizes documents and feeds the frequency index, `finalize` derives the
/// stopword policy from the complete index, and `stem_document` produces the
/// pruned stem sequences. Calls out of that order are rejected.
pub struct CorpusRun<'a> {
    normalizer: &'a TextNormalizer,
    tokenizer: Tokenizer,
    index: TokenFrequencyIndex,
    policy: StopwordPolicy,
    stemmer: MemoizedStemmer<'a>,
}

/// Tokens that survived stopword pruning and their stems, position for position.
#[derive(Debug, Clone, PartialEq)]
pub struct StemmedDocument {
    pub tokens: Vec<String>,
    pub stems: Vec<String>,
}

impl<'a> CorpusRun<'a> {
    pub fn new(normalizer: &'a TextNormalizer, stemmer: &'a dyn Stem) -> Self {
        Self::with_policy(normalizer, stemmer, StopwordPolicy::new())
    }

    pub fn with_policy(
        normalizer: &'a TextNormalizer,
        stemmer: &'a dyn Stem,
        policy: StopwordPolicy,
    ) -> Self {
        CorpusRun {
            normalizer,
            tokenizer: Tokenizer::new(),
            index: TokenFrequencyIndex::new(),
            policy,
            stemmer: MemoizedStemmer::new(stemmer),
        }
    }

    /// First pass: normalizes one document and registers its distinct tokens.
    pub fn ingest(&mut self, raw: Option<&str>) -> CorpusResult<String> {
        if self.policy.is_finalized() {
            return Err(CorpusError::IndexSealed);
        }

        let normalized = self.normalizer.normalize(raw)?;
        let tokens = self.tokenizer.tokenize(&normalized);
        self.index
            .register_document(tokens.iter().map(String::as_str));
        Ok(normalized)
    }

    /// Seals the frequency index and extends the stopword list from it.
    /// Returns the number of corpus-derived stopwords.
    pub fn finalize(&mut self, high_threshold: f64, low_threshold: f64) -> CorpusResult<usize> {
        let total_docs = self.index.documents();
        self.policy
            .finalize(&self.index, total_docs, high_threshold, low_threshold)
    }

    /// Second pass: prunes stopwords from a normalized document and stems the rest.
    pub fn stem_document(&mut self, normalized: &str) -> CorpusResult<StemmedDocument> {
        if !self.policy.is_finalized() {
            return Err(CorpusError::PolicyNotFinalized("stemming documents"));
        }

        let tokens: Vec<String> = self
            .tokenizer
            .tokenize(normalized)
            .iter()
            .filter(|token| !self.policy.is_stopword(token))
            .cloned()
            .collect();
        let stems = tokens
            .iter()
            .map(|token| self.stemmer.stem(token).to_string())
            .collect();

        Ok(StemmedDocument { tokens, stems })
    }

    pub fn index(&self) -> &TokenFrequencyIndex {
        &self.index
    }

    pub fn policy(&self) -> &StopwordPolicy {
        &self.policy
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn stemmer(&self) -> &MemoizedStemmer<'a> {
        &self.stemmer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stemmer::SnowballStemmer;

    #[test]
    fn test_two_pass_flow() {
        let normalizer = TextNormalizer::default();
        let stemmer = SnowballStemmer::default();
        let mut run = CorpusRun::new(&normalizer, &stemmer);

        let docs = [
            "O deputado votou a reforma.",
            "A reforma tributária foi votada.",
            "Reforma já!",
        ];
        let normalized: Vec<String> = docs
            .iter()
            .map(|doc| run.ingest(Some(doc)).unwrap())
            .collect();

        assert_eq!(run.index().documents(), 3);
        assert_eq!(run.index().doc_count("reforma"), 3);

        run.finalize(0.9, 0.0).unwrap();
        assert!(run.policy().is_stopword("reforma"));

        let stemmed = run.stem_document(&normalized[0]).unwrap();
        assert_eq!(stemmed.tokens, vec!["deputado", "votou"]);
        assert_eq!(stemmed.stems.len(), stemmed.tokens.len());
        assert_eq!(run.tokenizer().cache_hits(), 1);
    }

    #[test]
    fn test_stemming_before_finalize_is_rejected() {
        let normalizer = TextNormalizer::default();
        let stemmer = SnowballStemmer::default();
        let mut run = CorpusRun::new(&normalizer, &stemmer);

        let normalized = run.ingest(Some("discurso")).unwrap();
        assert!(matches!(
            run.stem_document(&normalized),
            Err(CorpusError::PolicyNotFinalized(_))
        ));
    }

    #[test]
    fn test_ingest_after_finalize_is_rejected() {
        let normalizer = TextNormalizer::default();
        let stemmer = SnowballStemmer::default();
        let mut run = CorpusRun::new(&normalizer, &stemmer);

        run.ingest(Some("discurso")).unwrap();
        run.finalize(0.9, 0.01).unwrap();

        assert!(matches!(
            run.ingest(Some("outro discurso")),
            Err(CorpusError::IndexSealed)
        ));
        assert!(matches!(
            run.finalize(0.9, 0.01),
            Err(CorpusError::PolicyAlreadyFinalized)
        ));
        assert_eq!(run.index().documents(), 1);
    }

    #[test]
    fn test_absent_text_does_not_touch_index() {
        let normalizer = TextNormalizer::default();
        let stemmer = SnowballStemmer::default();
        let mut run = CorpusRun::new(&normalizer, &stemmer);

        assert!(matches!(run.ingest(None), Err(CorpusError::InvalidInput)));
        assert_eq!(run.index().documents(), 0);
    }
}
