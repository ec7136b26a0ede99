//! Compression backend abstraction.

mod ghostscript;

pub use ghostscript::GhostscriptBackend;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BackendError;

/// Quality preset for the external compression tool.
///
/// Each preset maps to a Ghostscript `-dPDFSETTINGS` value and a base
/// resolution that applies unless a DPI override is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    /// 72 dpi, `/screen` - smallest output, on-screen viewing only.
    Low,
    /// 150 dpi, `/ebook` - balanced quality and size.
    Medium,
    /// 300 dpi, `/printer` - high quality for printing.
    High,
}

impl QualityPreset {
    /// Ghostscript `-dPDFSETTINGS` argument value for this preset.
    pub fn gs_setting(self) -> &'static str {
        match self {
            Self::Low => "/screen",
            Self::Medium => "/ebook",
            Self::High => "/printer",
        }
    }

    /// Base image resolution used when no DPI override is supplied.
    pub fn base_dpi(self) -> u32 {
        match self {
            Self::Low => 72,
            Self::Medium => 150,
            Self::High => 300,
        }
    }

    /// Lowercase preset name, as used in temporary file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A single invocation of the external compression tool.
#[derive(Debug, Clone)]
pub struct CompressionJob<'a> {
    /// Source PDF.
    pub input: &'a Path,
    /// Destination path the backend writes to.
    pub output: &'a Path,
    /// Quality preset.
    pub preset: QualityPreset,
    /// JPEG re-encoding quality (1-100) for embedded images. When set, the
    /// backend disables automatic image filtering in favor of explicit
    /// bicubic downsampling.
    pub image_quality: Option<u8>,
    /// Resolution override superseding the preset's base DPI.
    pub dpi: Option<u32>,
}

/// Trait for external compression backends.
///
/// The target-size search and the batch driver depend only on this seam,
/// which keeps the search logic testable with a scripted fake.
pub trait CompressionBackend {
    /// Presence check for the external tool.
    ///
    /// Absence is a batch-level precondition failure; callers make no
    /// per-file attempts when this fails.
    fn check_available(&self) -> std::result::Result<(), BackendError>;

    /// Run one compression invocation, producing `job.output` on disk.
    fn compress(&self, job: &CompressionJob<'_>) -> std::result::Result<(), BackendError>;
}
