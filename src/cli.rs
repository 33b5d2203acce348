use crate::config::{DigitHandling, PipelineConfig};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "speech-corpus")]
#[command(about = "Normalize, prune and stem a corpus of transcribed speeches", long_about = None)]
pub struct Cli {
    #[arg(long, help = "Speech table (CSV) to process")]
    pub input: PathBuf,

    #[arg(long, default_value = "out", help = "Output directory")]
    pub out: PathBuf,

    #[arg(long, help = "JSON file with pipeline settings")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Document share at or above which a token becomes a stopword [default: 0.9]")]
    pub high_threshold: Option<f64>,

    #[arg(long, help = "Document share at or below which a token becomes a stopword [default: 0.01]")]
    pub low_threshold: Option<f64>,

    #[arg(long, value_enum, help = "Replace digits with a space or remove them [default: space]")]
    pub digits: Option<DigitHandling>,

    #[arg(long, help = "Leave the stem sequence out of full-speeches.csv")]
    pub omit_tokens: bool,

    #[arg(long, help = "Minify JSON output")]
    pub minify_json: bool,

    #[arg(long, help = "Log directory")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, default_value_t = 10, help = "Number of run logs to keep")]
    pub max_log_files: usize,
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Defaults, then the config file, then explicit flags.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(high) = self.high_threshold {
            config.high_threshold = high;
        }
        if let Some(low) = self.low_threshold {
            config.low_threshold = low;
        }
        if let Some(digits) = self.digits {
            config.digits = digits;
        }
        if self.omit_tokens {
            config.include_tokens = false;
        }

        Ok(config)
    }
}
