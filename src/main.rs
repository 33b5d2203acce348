mod cli;
mod config;
mod corpus;
mod errors;
mod frequency_index;
mod logger;
mod manifest_generator;
mod models;
mod pipeline;
mod stemmer;
mod stopwords;
mod table_io;
mod text_normalizer;
mod tokenizer;
mod vocabulary;

use crate::cli::Cli;
use crate::manifest_generator::ManifestGenerator;
use crate::pipeline::ProcessingPipeline;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("Speech corpus builder starting...");

    let config = cli.pipeline_config()?;
    let output_dir = &cli.out;
    fs::create_dir_all(output_dir)
        .context("Failed to create output directory")?;

    let log_dir = cli.log_dir.as_deref().unwrap_or_else(|| Path::new("logs"));
    fs::create_dir_all(log_dir)
        .context("Failed to create log directory")?;

    println!("Input: {:?}", cli.input);
    println!("Output directory: {:?}", output_dir);
    println!("Log directory: {:?}", log_dir);
    println!(
        "Stopword thresholds: high={}, low={}",
        config.high_threshold, config.low_threshold
    );

    let pipeline = ProcessingPipeline::new(config, log_dir)
        .context("Failed to create processing pipeline")?;

    println!("Reading speeches...");
    let rows = table_io::read_speeches(&cli.input)
        .with_context(|| format!("Failed to read speech table: {:?}", cli.input))?;
    pipeline
        .logger
        .info(format!("Read {} rows from {:?}", rows.len(), cli.input));

    println!("Cleaning speeches...");
    let output = match pipeline.run(rows) {
        Ok(output) => output,
        Err(e) => {
            pipeline
                .logger
                .error(format!("Corpus run failed: {}", e), None);
            pipeline.logger.flush()?;
            return Err(e).context("Corpus run failed");
        }
    };

    println!("Writing tables...");
    let files = table_io::write_tables(
        output_dir,
        &output.tables,
        pipeline.config().include_tokens,
    )
    .context("Failed to write output tables")?;

    let manifest_generator = ManifestGenerator::new(output_dir, pipeline.logger.clone())
        .context("Failed to create manifest generator")?;
    manifest_generator
        .save_report(&output.report, cli.minify_json)
        .context("Failed to save run report")?;
    let manifest = manifest_generator
        .generate_manifest(
            pipeline.config(),
            &output.report,
            &[cli.input.as_path()],
            &files.all(),
        )
        .context("Failed to generate manifest")?;
    manifest_generator
        .save_manifest(&manifest, cli.minify_json)
        .context("Failed to save manifest")?;

    let report = pipeline.finalize(output.stats())?;
    pipeline
        .rotate_logs(cli.max_log_files)
        .context("Failed to rotate run logs")?;

    println!("Run complete!");
    println!(
        "Documents: {}, Skipped: {}, Stems: {}, Corpus stopwords: {}",
        report.summary.processed.documents,
        report.summary.processed.skipped,
        report.summary.processed.stems,
        report.summary.processed.adaptive_stopwords
    );
    println!("Errors: {}, Warnings: {}", report.summary.errors, report.summary.warnings);

    for issue in &output.report.skipped {
        eprintln!(
            "Skipped row {} (id: {}): {}",
            issue.row,
            issue.id.as_deref().unwrap_or("-"),
            issue.message
        );
    }

    Ok(())
}
