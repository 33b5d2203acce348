use crate::errors::{CorpusError, CorpusResult};
use serde::{Deserialize, Serialize};

/// One row of the input speech table. Empty cells deserialize as `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpeechRow {
    pub speech: Option<String>,
    pub id: Option<String>,
    pub author_name: Option<String>,
    pub author_party: Option<String>,
    pub author_region: Option<String>,
    pub date: Option<String>,
    pub updated_at: Option<String>,
    pub stage: Option<String>,
}

impl SpeechRow {
    /// Extracts the metadata fields, rejecting the row if any is absent or blank.
    pub fn metadata(&self) -> CorpusResult<SpeechMetadata> {
        let fields = [
            ("id", &self.id),
            ("author_name", &self.author_name),
            ("author_party", &self.author_party),
            ("author_region", &self.author_region),
            ("date", &self.date),
            ("updated_at", &self.updated_at),
            ("stage", &self.stage),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(CorpusError::malformed(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }

        let value = |field: &Option<String>| field.clone().unwrap_or_default();
        Ok(SpeechMetadata {
            id: value(&self.id),
            author_name: value(&self.author_name),
            author_party: value(&self.author_party),
            author_region: value(&self.author_region),
            date: value(&self.date),
            updated_at: value(&self.updated_at),
            stage: value(&self.stage),
        })
    }
}

/// Metadata table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechMetadata {
    pub id: String,
    pub author_name: String,
    pub author_party: String,
    pub author_region: String,
    pub date: String,
    pub updated_at: String,
    pub stage: String,
}

impl SpeechMetadata {
    pub const COLUMNS: [&'static str; 7] = [
        "id",
        "author_name",
        "author_party",
        "author_region",
        "date",
        "updated_at",
        "stage",
    ];
}

/// A document accepted into the corpus.
///
/// `normalized` is set by the first pass; `tokens` and `stem_sequence` by
/// the second. `tokens` holds the tokens that survived stopword pruning, so
/// both sequences always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRecord {
    pub metadata: SpeechMetadata,
    pub original: String,
    pub normalized: String,
    pub tokens: Vec<String>,
    pub stem_sequence: Vec<String>,
}

impl SpeechRecord {
    pub fn id(&self) -> &str {
        &self.metadata.id
    }
}

/// Document table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRow {
    pub id: String,
    pub original: String,
    /// Comma-joined stems in token order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<String>,
}

/// Stem vocabulary table row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StemRow {
    pub id: usize,
    pub stem: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusTables {
    pub documents: Vec<DocumentRow>,
    pub metadata: Vec<SpeechMetadata>,
    pub stems: Vec<StemRow>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    InvalidInput,
    MalformedRecord,
}

/// A record left out of the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordIssue {
    /// 1-based data row in the input table.
    pub row: usize,
    pub id: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl RecordIssue {
    pub fn new(row: usize, id: Option<String>, error: &CorpusError) -> Self {
        let kind = match error {
            CorpusError::InvalidInput => IssueKind::InvalidInput,
            _ => IssueKind::MalformedRecord,
        };
        RecordIssue {
            row,
            id,
            kind,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub accepted: usize,
    pub skipped: Vec<RecordIssue>,
    pub distinct_tokens: usize,
    pub base_stopwords: usize,
    pub adaptive_stopwords: Vec<String>,
    pub stems: usize,
    pub tokenizer_cache_hits: usize,
    pub tokenizer_cached_texts: usize,
    pub stemmer_calls: usize,
    pub stemmer_cached_tokens: usize,
}
