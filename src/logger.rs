use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use walkdir::WalkDir;

const RUN_LOG_PREFIX: &str = "run-";
const RUN_LOG_SUFFIX: &str = ".jsonl";
const MAX_RUN_ID_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub run_id: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub processed: ProcessingStats,
}

/// Corpus counts attached to the diagnostic report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessingStats {
    pub documents: usize,
    pub skipped: usize,
    pub stems: usize,
    pub adaptive_stopwords: usize,
}

#[derive(Default)]
struct LogState {
    writer: Option<BufWriter<File>>,
    entries: Vec<LogEntry>,
    errors: usize,
    warnings: usize,
}

/// Structured run log: one JSON object per line in `<log_dir>/run-<run_id>.jsonl`.
///
/// Clones share the same file and counters, so the pipeline and the
/// manifest generator can log into one run.
#[derive(Clone)]
pub struct DiagnosticLogger {
    log_dir: PathBuf,
    run_id: String,
    state: Arc<Mutex<LogState>>,
}

impl DiagnosticLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let base_id = format!(
            "{}-{}",
            Utc::now().format("%Y%m%d-%H%M%S%3f"),
            std::process::id()
        );
        let (run_id, file) = Self::create_run_log(log_dir, &base_id)?;

        Ok(DiagnosticLogger {
            log_dir: log_dir.to_path_buf(),
            run_id,
            state: Arc::new(Mutex::new(LogState {
                writer: Some(BufWriter::new(file)),
                ..LogState::default()
            })),
        })
    }

    /// Opens a log file no other logger owns, suffixing the run id on collision.
    fn create_run_log(log_dir: &Path, base_id: &str) -> Result<(String, File)> {
        for attempt in 0..MAX_RUN_ID_ATTEMPTS {
            let run_id = if attempt == 0 {
                base_id.to_string()
            } else {
                format!("{}-{}", base_id, attempt)
            };
            let log_file_path = Self::log_path(log_dir, &run_id);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&log_file_path)
            {
                Ok(file) => return Ok((run_id, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to create log file: {:?}", log_file_path))
                }
            }
        }

        anyhow::bail!(
            "No free run log name for {} in {:?} after {} attempts",
            base_id,
            log_dir,
            MAX_RUN_ID_ATTEMPTS
        )
    }

    fn log_path(log_dir: &Path, run_id: &str) -> PathBuf {
        log_dir.join(format!("{}{}{}", RUN_LOG_PREFIX, run_id, RUN_LOG_SUFFIX))
    }

    fn state(&self) -> MutexGuard<'_, LogState> {
        self.state.lock().unwrap()
    }

    pub fn log(&self, level: LogLevel, message: String, context: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            level,
            message,
            context,
        };

        let mut state = self.state();
        match level {
            LogLevel::Error => state.errors += 1,
            LogLevel::Warning => state.warnings += 1,
            LogLevel::Info => {}
        }

        if let Some(writer) = state.writer.as_mut() {
            if let Ok(json) = serde_json::to_string(&entry) {
                let _ = writeln!(writer, "{}", json);
            }
        }
        state.entries.push(entry);
    }

    pub fn info(&self, message: String) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, context);
    }

    /// Warning for a record left out of the corpus.
    pub fn record_skipped<K: Serialize>(&self, row: usize, id: Option<&str>, kind: K, reason: &str) {
        self.warning(
            format!("Skipping record: {}", reason),
            Some(serde_json::json!({
                "row": row,
                "id": id,
                "kind": kind,
            })),
        );
    }

    pub fn flush(&self) -> Result<()> {
        if let Some(writer) = self.state().writer.as_mut() {
            writer.flush().context("Failed to flush run log")?;
        }
        Ok(())
    }

    pub fn generate_report(&self, stats: ProcessingStats) -> Result<DiagnosticReport> {
        self.flush()
            .context("Failed to flush log file before generating report")?;

        let state = self.state();
        Ok(DiagnosticReport {
            run_id: self.run_id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            summary: ReportSummary {
                errors: state.errors,
                warnings: state.warnings,
                processed: stats,
            },
            entries: state.entries.clone(),
        })
    }

    /// Keeps the `max_runs` most recent run logs, never removing this run's own.
    pub fn rotate_logs(&self, max_runs: usize) -> Result<()> {
        let own_log = Self::log_path(&self.log_dir, &self.run_id);
        let mut run_files: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();

        for entry in WalkDir::new(&self.log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let is_run_log = entry
                .file_name()
                .to_str()
                .map_or(false, |name| {
                    name.starts_with(RUN_LOG_PREFIX) && name.ends_with(RUN_LOG_SUFFIX)
                });
            if !is_run_log || entry.path() == own_log {
                continue;
            }
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            if let Some(modified) = modified {
                run_files.push((entry.path().to_path_buf(), modified.into()));
            }
        }

        let keep_others = max_runs.saturating_sub(1);
        if run_files.len() > keep_others {
            run_files.sort_by(|a, b| a.1.cmp(&b.1));

            let to_delete = run_files.len() - keep_others;
            for (path, _) in run_files.iter().take(to_delete) {
                fs::remove_file(path)
                    .with_context(|| format!("Failed to delete old log file: {:?}", path))?;
            }
        }

        Ok(())
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl Drop for DiagnosticLogger {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(writer) = state.writer.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}
