use std::collections::{HashMap, HashSet};

/// Corpus-wide document frequency: for every token, the number of distinct
/// documents containing it at least once.
///
/// Counts only ever grow, and no count exceeds `documents()`.
#[derive(Debug, Default, Clone)]
pub struct TokenFrequencyIndex {
    doc_counts: HashMap<String, usize>,
    documents: usize,
}

impl TokenFrequencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one document. Repeated tokens within the document count once.
    pub fn register_document<'a, I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: HashSet<&str> = tokens.into_iter().collect();
        for token in distinct {
            *self.doc_counts.entry(token.to_string()).or_insert(0) += 1;
        }
        self.documents += 1;
    }

    pub fn doc_count(&self, token: &str) -> usize {
        self.doc_counts.get(token).copied().unwrap_or(0)
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn distinct_tokens(&self) -> usize {
        self.doc_counts.len()
    }

    /// Tokens by document count, highest first; ties are ordered lexically.
    pub fn most_common(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .doc_counts
            .iter()
            .map(|(token, count)| (token.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_counts_documents_not_occurrences() {
        let mut index = TokenFrequencyIndex::new();
        index.register_document(["vota", "sim", "vota", "vota"]);
        index.register_document(["vota", "nao"]);

        assert_eq!(index.doc_count("vota"), 2);
        assert_eq!(index.doc_count("sim"), 1);
        assert_eq!(index.doc_count("ausente"), 0);
        assert_eq!(index.documents(), 2);
        assert_eq!(index.distinct_tokens(), 3);
    }

    #[test]
    fn test_most_common_order_is_deterministic() {
        let mut index = TokenFrequencyIndex::new();
        index.register_document(["b", "a", "c"]);
        index.register_document(["c", "b"]);
        index.register_document(["c"]);

        assert_eq!(index.most_common(), vec![("c", 3), ("b", 2), ("a", 1)]);

        let mut tied = TokenFrequencyIndex::new();
        tied.register_document(["zeta", "alfa", "mu"]);
        assert_eq!(tied.most_common(), vec![("alfa", 1), ("mu", 1), ("zeta", 1)]);
    }

    #[test]
    fn test_empty_document_still_counts() {
        let mut index = TokenFrequencyIndex::new();
        index.register_document(std::iter::empty::<&str>());
        assert_eq!(index.documents(), 1);
        assert_eq!(index.distinct_tokens(), 0);
    }

    proptest! {
        #[test]
        fn prop_doc_count_never_exceeds_documents(
            docs in prop::collection::vec(prop::collection::vec("[a-e]{1,2}", 0..12), 0..20)
        ) {
            let mut index = TokenFrequencyIndex::new();
            for doc in &docs {
                index.register_document(doc.iter().map(String::as_str));
            }

            prop_assert_eq!(index.documents(), docs.len());
            for (token, count) in index.most_common() {
                prop_assert!(count <= index.documents());
                let expected = docs.iter().filter(|d| d.iter().any(|t| t == token)).count();
                prop_assert_eq!(count, expected);
            }
        }
    }
}
