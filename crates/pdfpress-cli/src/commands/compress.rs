//! Compress command - compress a single PDF file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info};

use pdfpress_core::{
    CompressionBackend, CompressionJob, GhostscriptBackend, TargetSizeCompressor,
};

use super::{PresetArg, load_config};

/// Arguments for the compress command.
#[derive(Args)]
pub struct CompressArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: next to the input with the configured suffix)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Quality preset
    #[arg(short, long, value_enum)]
    preset: Option<PresetArg>,

    /// Target output size in KB
    #[arg(
        short,
        long,
        conflicts_with = "preset",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    target_size: Option<u64>,
}

pub async fn run(args: CompressArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let backend = GhostscriptBackend::resolve(&config.ghostscript)?;
    debug!(binary = %backend.binary().display(), "resolved Ghostscript");

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input, &config.compression.output_suffix));
    let original_kb = fs::metadata(&args.input)?.len() as f64 / 1024.0;
    info!(input = %args.input.display(), original_kb, "compressing file");

    if let Some(target_kb) = args.target_size {
        let outcome =
            TargetSizeCompressor::new(&backend).compress_to_target(&args.input, &output, target_kb)?;

        if outcome.is_total_failure() {
            anyhow::bail!(outcome.message());
        }

        let mark = if outcome.achieved() {
            style("✓").green()
        } else {
            style("!").yellow()
        };
        println!("{mark} {}", outcome.message());
        println!("  {} -> {}", args.input.display(), output.display());
    } else {
        let preset = args
            .preset
            .map(Into::into)
            .unwrap_or(config.compression.default_preset);
        backend.compress(&CompressionJob {
            input: &args.input,
            output: &output,
            preset,
            image_quality: None,
            dpi: None,
        })?;

        let final_kb = fs::metadata(&output)?.len() as f64 / 1024.0;
        println!(
            "{} Compressed: {} ({original_kb:.2} KB -> {final_kb:.2} KB)",
            style("✓").green(),
            output.display()
        );
    }

    Ok(())
}

fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = input.extension().and_then(|e| e.to_str()).unwrap_or("pdf");
    input.with_file_name(format!("{stem}{suffix}.{ext}"))
}
