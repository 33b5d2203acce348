use crate::errors::{CorpusError, CorpusResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How digits are removed from speech text during normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DigitHandling {
    /// Every digit becomes a space ("art5" -> "art ").
    Space,
    /// Digit runs are deleted outright ("art5" -> "art").
    Remove,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tokens present in at least this share of documents become stopwords.
    pub high_threshold: f64,
    /// Tokens present in at most this share of documents become stopwords.
    pub low_threshold: f64,
    pub digits: DigitHandling,
    /// Emit the comma-joined stem sequence as a `tokens` column.
    pub include_tokens: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            high_threshold: 0.9,
            low_threshold: 0.01,
            digits: DigitHandling::Space,
            include_tokens: true,
        }
    }
}

impl PipelineConfig {
    pub fn new(high_threshold: f64, low_threshold: f64) -> Self {
        PipelineConfig {
            high_threshold,
            low_threshold,
            ..Default::default()
        }
    }

    /// Only near-universal tokens (99% of documents) are pruned as common.
    pub fn near_universal() -> Self {
        Self::new(0.99, 0.01)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> CorpusResult<()> {
        for (name, value) in [
            ("high_threshold", self.high_threshold),
            ("low_threshold", self.low_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(CorpusError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.low_threshold > self.high_threshold {
            return Err(CorpusError::Configuration(format!(
                "low_threshold ({}) exceeds high_threshold ({})",
                self.low_threshold, self.high_threshold
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_thresholds() {
        let config = PipelineConfig::default();
        assert_eq!(config.high_threshold, 0.9);
        assert_eq!(config.low_threshold, 0.01);
        assert_eq!(config.digits, DigitHandling::Space);
        assert!(config.include_tokens);
        assert!(config.validate().is_ok());

        let near = PipelineConfig::near_universal();
        assert_eq!(near.high_threshold, 0.99);
        assert_eq!(near.low_threshold, 0.01);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(PipelineConfig::new(1.5, 0.01).validate().is_err());
        assert!(PipelineConfig::new(0.9, -0.1).validate().is_err());
        assert!(PipelineConfig::new(f64::NAN, 0.01).validate().is_err());
        assert!(PipelineConfig::new(0.1, 0.5).validate().is_err());
        assert!(PipelineConfig::new(1.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"high_threshold": 0.99, "digits": "remove"}"#).unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.high_threshold, 0.99);
        assert_eq!(config.low_threshold, 0.01);
        assert_eq!(config.digits, DigitHandling::Remove);
        assert!(config.include_tokens);
    }
}
