//! Batch command - compress multiple PDF files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use pdfpress_core::{
    BatchCompressor, BatchMode, BatchObserver, BatchOutcome, GhostscriptBackend,
};

use super::{PresetArg, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: PathBuf,

    /// Quality preset
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,

    /// Target output size in KB per file
    #[arg(
        short,
        long,
        conflicts_with = "preset",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    target_size: Option<u64>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,
}

/// Adapts the progress bar to the core observer interface.
struct ProgressReporter {
    bar: ProgressBar,
}

impl BatchObserver for ProgressReporter {
    fn on_progress(&self, done: usize, _total: usize) {
        self.bar.set_position(done as u64);
    }

    fn on_status(&self, message: &str) {
        self.bar.set_message(message.to_string());
        debug!("{message}");
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching PDF files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to compress",
        style("ℹ").blue(),
        files.len()
    );

    let backend = GhostscriptBackend::resolve(&config.ghostscript)?;
    debug!(binary = %backend.binary().display(), "resolved Ghostscript");

    let mode = match args.target_size {
        Some(kb) => BatchMode::TargetSize(kb),
        None => BatchMode::Preset(
            args.preset
                .map(Into::into)
                .unwrap_or(config.compression.default_preset),
        ),
    };

    fs::create_dir_all(&args.output_dir)?;

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    let reporter = ProgressReporter { bar };

    let outcome = BatchCompressor::new(&backend)
        .with_output_suffix(config.compression.output_suffix.clone())
        .run(&files, &args.output_dir, mode, &reporter);

    reporter.bar.finish_with_message("Complete");

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        files.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(outcome.successes.len()).green(),
        style(outcome.failures.len()).red()
    );

    for message in &outcome.successes {
        println!("  - {message}");
    }
    if !outcome.failures.is_empty() {
        println!();
        println!("{}", style("Failures:").red());
        for message in &outcome.failures {
            println!("  - {message}");
        }
    }

    if args.summary {
        let summary_path = args.output_dir.join("summary.csv");
        write_summary(&summary_path, &outcome)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    Ok(())
}

fn write_summary(path: &Path, outcome: &BatchOutcome) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["status", "message"])?;
    for message in &outcome.successes {
        wtr.write_record(["success", message])?;
    }
    for message in &outcome.failures {
        wtr.write_record(["failure", message])?;
    }

    wtr.flush()?;
    Ok(())
}
