use std::io;

use thiserror::Error;

/// Errors raised while building a corpus.
///
/// Record-level variants (`InvalidInput`, `MalformedRecord`) are collected
/// into the run report; the remaining variants abort the run.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("raw speech text is absent")]
    InvalidInput,
    #[error("malformed record: {reason}")]
    MalformedRecord { id: Option<String>, reason: String },
    #[error("stopword policy has already been finalized")]
    PolicyAlreadyFinalized,
    #[error("stopword policy must be finalized before {0}")]
    PolicyNotFinalized(&'static str),
    #[error("frequency index is sealed; documents cannot be registered after finalize")]
    IndexSealed,
    #[error("input table is missing column(s): {0}")]
    MissingColumns(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl CorpusError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        CorpusError::MalformedRecord {
            id: None,
            reason: reason.into(),
        }
    }

    /// Malformed input row whose `id` cell could still be read.
    pub fn malformed_row(id: Option<String>, reason: impl Into<String>) -> Self {
        CorpusError::MalformedRecord {
            id,
            reason: reason.into(),
        }
    }

    /// Identifier of the offending record, when the error carries one.
    pub fn record_id(&self) -> Option<&str> {
        match self {
            CorpusError::MalformedRecord { id, .. } => id.as_deref(),
            _ => None,
        }
    }

    /// True for errors that only disqualify a single record.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            CorpusError::InvalidInput | CorpusError::MalformedRecord { .. }
        )
    }
}

pub type CorpusResult<T> = Result<T, CorpusError>;
