use crate::models::StemRow;
use std::collections::BTreeSet;

/// Deduplicated stems with 1-based ids assigned in lexical order, so the same
/// corpus always yields the same ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StemVocabulary {
    stems: Vec<String>,
}

impl StemVocabulary {
    pub fn from_sequences<'s, I>(sequences: I) -> Self
    where
        I: IntoIterator<Item = &'s [String]>,
    {
        let unique: BTreeSet<&str> = sequences
            .into_iter()
            .flat_map(|sequence| sequence.iter().map(String::as_str))
            .collect();

        StemVocabulary {
            stems: unique.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn id(&self, stem: &str) -> Option<usize> {
        self.stems
            .binary_search_by(|probe| probe.as_str().cmp(stem))
            .ok()
            .map(|idx| idx + 1)
    }

    pub fn stem(&self, id: usize) -> Option<&str> {
        id.checked_sub(1)
            .and_then(|idx| self.stems.get(idx))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    pub fn rows(&self) -> Vec<StemRow> {
        self.stems
            .iter()
            .enumerate()
            .map(|(idx, stem)| StemRow {
                id: idx + 1,
                stem: stem.clone(),
            })
            .collect()
    }
}
