//! CLI subcommands.

pub mod batch;
pub mod compress;
pub mod config;
pub mod doctor;

use clap::ValueEnum;
use pdfpress_core::{PressConfig, QualityPreset};

/// Quality preset argument shared by the compress and batch commands.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PresetArg {
    /// 72 dpi, smallest output
    Low,
    /// 150 dpi, balanced
    Medium,
    /// 300 dpi, print quality
    High,
}

impl From<PresetArg> for QualityPreset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Low => QualityPreset::Low,
            PresetArg::Medium => QualityPreset::Medium,
            PresetArg::High => QualityPreset::High,
        }
    }
}

/// Load configuration from an explicit path, falling back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PressConfig> {
    match config_path {
        Some(path) => Ok(PressConfig::from_file(std::path::Path::new(path))?),
        None => Ok(PressConfig::default()),
    }
}
