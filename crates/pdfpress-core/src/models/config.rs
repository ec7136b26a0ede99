//! Configuration structures for the compression pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::backend::QualityPreset;

/// Main configuration for pdfpress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    /// Ghostscript resolution configuration.
    pub ghostscript: GhostscriptConfig,

    /// Compression defaults.
    pub compression: CompressionConfig,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            ghostscript: GhostscriptConfig::default(),
            compression: CompressionConfig::default(),
        }
    }
}

/// Where to find the Ghostscript executable.
///
/// Both fields are optional overrides; when unset, resolution falls back to
/// the exe-relative bundled directory and then the system PATH.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GhostscriptConfig {
    /// Explicit path to the Ghostscript executable.
    pub binary: Option<PathBuf>,

    /// Directory holding a bundled Ghostscript build.
    pub bundled_dir: Option<PathBuf>,
}

/// Compression defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Preset used when neither a preset nor a target size is requested.
    pub default_preset: QualityPreset,

    /// Suffix inserted before the extension of batch output files.
    pub output_suffix: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            default_preset: QualityPreset::Medium,
            output_suffix: "_compressed".to_string(),
        }
    }
}

impl PressConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
