use crate::config::PipelineConfig;
use crate::corpus::CorpusRun;
use crate::errors::{CorpusError, CorpusResult};
use crate::logger::*;
use crate::models::*;
use crate::stemmer::{SnowballStemmer, Stem};
use crate::text_normalizer::TextNormalizer;
use crate::vocabulary::StemVocabulary;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

pub struct ProcessingPipeline {
    config: PipelineConfig,
    normalizer: TextNormalizer,
    stemmer: Box<dyn Stem>,
    pub logger: DiagnosticLogger,
}

/// Everything produced by one run over a corpus.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub records: Vec<SpeechRecord>,
    pub vocabulary: StemVocabulary,
    pub tables: CorpusTables,
    pub report: RunReport,
}

impl PipelineOutput {
    pub fn stats(&self) -> ProcessingStats {
        ProcessingStats {
            documents: self.report.accepted,
            skipped: self.report.skipped.len(),
            stems: self.report.stems,
            adaptive_stopwords: self.report.adaptive_stopwords.len(),
        }
    }
}

impl ProcessingPipeline {
    pub fn new(config: PipelineConfig, log_dir: &Path) -> Result<Self> {
        let logger = DiagnosticLogger::new(log_dir)
            .context("Failed to create DiagnosticLogger")?;
        Self::with_stemmer(config, Box::new(SnowballStemmer::portuguese()), logger)
    }

    pub fn with_stemmer(
        config: PipelineConfig,
        stemmer: Box<dyn Stem>,
        logger: DiagnosticLogger,
    ) -> Result<Self> {
        config.validate().context("Invalid pipeline configuration")?;
        let normalizer = TextNormalizer::new(config.digits)
            .context("Failed to create TextNormalizer")?;

        Ok(ProcessingPipeline {
            config,
            normalizer,
            stemmer,
            logger,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run_records(&self, rows: Vec<SpeechRow>) -> CorpusResult<PipelineOutput> {
        self.run(rows.into_iter().map(Ok))
    }

    /// Runs both passes over the input rows.
    ///
    /// Rows that fail with a record-level error are left out and listed in
    /// the report; any other error aborts the run. Every run starts from an
    /// empty frequency index, stopword extension and caches.
    pub fn run<I>(&self, rows: I) -> CorpusResult<PipelineOutput>
    where
        I: IntoIterator<Item = CorpusResult<SpeechRow>>,
    {
        self.config.validate()?;

        let mut run = CorpusRun::new(&self.normalizer, self.stemmer.as_ref());
        let mut report = RunReport::default();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut records = Vec::new();

        for (idx, row) in rows.into_iter().enumerate() {
            let row_number = idx + 1;

            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_record_level() => {
                    let id = e.record_id().map(str::to_string);
                    self.skip(&mut report, RecordIssue::new(row_number, id, &e));
                    continue;
                }
                Err(e) => return Err(e),
            };

            let metadata = match row.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    self.skip(&mut report, RecordIssue::new(row_number, row.id.clone(), &e));
                    continue;
                }
            };

            if seen_ids.contains(&metadata.id) {
                let e = CorpusError::malformed(format!("duplicate id '{}'", metadata.id));
                self.skip(&mut report, RecordIssue::new(row_number, Some(metadata.id), &e));
                continue;
            }

            let normalized = match run.ingest(row.speech.as_deref()) {
                Ok(normalized) => normalized,
                Err(e) if e.is_record_level() => {
                    self.skip(&mut report, RecordIssue::new(row_number, Some(metadata.id), &e));
                    continue;
                }
                Err(e) => return Err(e),
            };

            seen_ids.insert(metadata.id.clone());
            records.push(SpeechRecord {
                metadata,
                original: row.speech.unwrap_or_default(),
                normalized,
                tokens: Vec::new(),
                stem_sequence: Vec::new(),
            });
        }

        self.logger.info(format!(
            "Normalized {} documents ({} skipped, {} distinct tokens)",
            records.len(),
            report.skipped.len(),
            run.index().distinct_tokens()
        ));

        let adaptive = run.finalize(self.config.high_threshold, self.config.low_threshold)?;
        self.logger.info(format!(
            "Stopword policy finalized: {} base + {} corpus-derived (high={}, low={})",
            run.policy().base_len(),
            adaptive,
            self.config.high_threshold,
            self.config.low_threshold
        ));

        for record in &mut records {
            let stemmed = run.stem_document(&record.normalized)?;
            record.tokens = stemmed.tokens;
            record.stem_sequence = stemmed.stems;
        }

        let vocabulary =
            StemVocabulary::from_sequences(records.iter().map(|r| r.stem_sequence.as_slice()));
        let tables = self.build_tables(&records, &vocabulary);

        report.accepted = records.len();
        report.distinct_tokens = run.index().distinct_tokens();
        report.base_stopwords = run.policy().base_len();
        report.adaptive_stopwords = run.policy().adaptive().map(str::to_string).collect();
        report.stems = vocabulary.len();
        report.tokenizer_cache_hits = run.tokenizer().cache_hits();
        report.tokenizer_cached_texts = run.tokenizer().cached_texts();
        report.stemmer_calls = run.stemmer().misses();
        report.stemmer_cached_tokens = run.stemmer().cached_tokens();

        if vocabulary.is_empty() && !records.is_empty() {
            self.logger.warning(
                "No stems survived stopword pruning".to_string(),
                Some(serde_json::json!({
                    "documents": records.len(),
                    "adaptive_stopwords": report.adaptive_stopwords.len(),
                })),
            );
        }

        self.logger.info(format!(
            "Built stem vocabulary: {} stems from {} documents ({} stemmer calls)",
            report.stems, report.accepted, report.stemmer_calls
        ));

        Ok(PipelineOutput {
            records,
            vocabulary,
            tables,
            report,
        })
    }

    fn skip(&self, report: &mut RunReport, issue: RecordIssue) {
        self.logger
            .record_skipped(issue.row, issue.id.as_deref(), issue.kind, &issue.message);
        report.skipped.push(issue);
    }

    fn build_tables(&self, records: &[SpeechRecord], vocabulary: &StemVocabulary) -> CorpusTables {
        let documents = records
            .iter()
            .map(|record| DocumentRow {
                id: record.id().to_string(),
                original: record.original.clone(),
                tokens: self
                    .config
                    .include_tokens
                    .then(|| record.stem_sequence.join(",")),
            })
            .collect();

        CorpusTables {
            documents,
            metadata: records.iter().map(|r| r.metadata.clone()).collect(),
            stems: vocabulary.rows(),
        }
    }

    pub fn finalize(&self, stats: ProcessingStats) -> Result<DiagnosticReport> {
        self.logger
            .generate_report(stats)
            .context("Failed to generate diagnostic report")
    }

    pub fn rotate_logs(&self, max_runs: usize) -> Result<()> {
        self.logger.rotate_logs(max_runs)
    }
}
