use crate::config::PipelineConfig;
use crate::logger::*;
use crate::models::RunReport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const REPORT_FILE: &str = "report.json";

/// Provenance of one run: effective configuration, counts and checksums of
/// every table read or written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: String,
    pub generated_at: String,
    pub config: PipelineConfig,
    pub documents: usize,
    pub skipped: usize,
    pub stems: usize,
    pub base_stopwords: usize,
    pub adaptive_stopwords: usize,
    pub input_checksums: BTreeMap<String, String>,
    pub output_checksums: BTreeMap<String, String>,
}

pub struct ManifestGenerator {
    output_base: PathBuf,
    logger: DiagnosticLogger,
    generated_at: String,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path, logger: DiagnosticLogger) -> Result<Self> {
        Ok(Self::with_timestamp(output_dir, logger, Utc::now()))
    }

    pub fn with_timestamp(output_dir: &Path, logger: DiagnosticLogger, timestamp: DateTime<Utc>) -> Self {
        ManifestGenerator {
            output_base: output_dir.to_path_buf(),
            logger,
            generated_at: Self::normalize_timestamp(&timestamp),
        }
    }

    pub fn normalize_timestamp(dt: &DateTime<Utc>) -> String {
        dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    pub fn generate_manifest(
        &self,
        config: &PipelineConfig,
        report: &RunReport,
        inputs: &[&Path],
        outputs: &[&Path],
    ) -> Result<RunManifest> {
        let input_checksums = Self::compute_checksums(inputs)
            .context("Failed to compute input checksums")?;
        let output_checksums = Self::compute_checksums(outputs)
            .context("Failed to compute output checksums")?;

        Ok(RunManifest {
            run_id: self.logger.run_id().to_string(),
            generated_at: self.generated_at.clone(),
            config: config.clone(),
            documents: report.accepted,
            skipped: report.skipped.len(),
            stems: report.stems,
            base_stopwords: report.base_stopwords,
            adaptive_stopwords: report.adaptive_stopwords.len(),
            input_checksums,
            output_checksums,
        })
    }

    pub fn save_manifest(&self, manifest: &RunManifest, minify: bool) -> Result<PathBuf> {
        let output_path = self.save_json(MANIFEST_FILE, manifest, minify)?;

        let hash = Self::hash_manifest(&fs::read_to_string(&output_path)?);
        self.logger.info(format!("Generated {} (SHA-256: {})", MANIFEST_FILE, hash));

        Ok(output_path)
    }

    pub fn save_report(&self, report: &RunReport, minify: bool) -> Result<PathBuf> {
        self.save_json(REPORT_FILE, report, minify)
    }

    fn save_json<T: Serialize>(&self, file_name: &str, value: &T, minify: bool) -> Result<PathBuf> {
        let output_path = self.output_base.join(file_name);

        let json_str = if minify {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };

        fs::write(&output_path, &json_str)
            .with_context(|| format!("Failed to write {}", file_name))?;

        Ok(output_path)
    }

    pub fn hash_manifest(json: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn compute_file_checksum(file_path: &Path) -> Result<String> {
        let mut file = fs::File::open(file_path)
            .context(format!("Failed to open file for checksum: {:?}", file_path))?;

        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)
            .context("Failed to read file for checksum")?;

        let mut hasher = Sha256::new();
        hasher.update(&buffer);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Checksums keyed by file name; files that do not exist are skipped.
    pub fn compute_checksums(files: &[&Path]) -> Result<BTreeMap<String, String>> {
        let mut checksums = BTreeMap::new();

        for file_path in files {
            if file_path.exists() {
                let checksum = Self::compute_file_checksum(file_path)?;
                let file_name = file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("unknown")
                    .to_string();
                checksums.insert(file_name, checksum);
            }
        }

        Ok(checksums)
    }
}
