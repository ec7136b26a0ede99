//! Doctor command - check the Ghostscript installation.

use clap::Args;
use console::style;

use pdfpress_core::GhostscriptBackend;

use super::load_config;

/// Arguments for the doctor command.
#[derive(Args)]
pub struct DoctorArgs {}

pub async fn run(_args: DoctorArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    match GhostscriptBackend::resolve(&config.ghostscript) {
        Ok(backend) => {
            println!(
                "{} Ghostscript found: {}",
                style("✓").green(),
                backend.binary().display()
            );
            match backend.version() {
                Ok(version) => println!("{} Version: {version}", style("ℹ").blue()),
                Err(err) => println!("{} Could not read version: {err}", style("!").yellow()),
            }
            Ok(())
        }
        Err(err) => {
            println!("{} Ghostscript not available", style("✗").red());
            Err(err.into())
        }
    }
}
