//! Iterative target-size compression search.
//!
//! Drives the compression backend through progressively more aggressive
//! settings until the output fits a caller-specified size budget, falling
//! back to the smallest achievable result when the budget is unreachable.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::backend::{CompressionBackend, CompressionJob, QualityPreset};
use crate::error::Result;

/// One rung of the quality/DPI ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityStep {
    /// Quality preset for this step.
    pub preset: QualityPreset,
    /// Resolution override passed to the backend.
    pub dpi: u32,
}

const fn step(preset: QualityPreset, dpi: u32) -> QualityStep {
    QualityStep { preset, dpi }
}

/// Ladder for targets above [`LARGE_TARGET_THRESHOLD_KB`]: starts at high
/// quality and descends in more steps.
const LARGE_TARGET_STEPS: [QualityStep; 9] = [
    step(QualityPreset::High, 300),
    step(QualityPreset::High, 250),
    step(QualityPreset::High, 200),
    step(QualityPreset::High, 175),
    step(QualityPreset::Medium, 150),
    step(QualityPreset::Medium, 120),
    step(QualityPreset::Medium, 100),
    step(QualityPreset::Medium, 80),
    step(QualityPreset::Low, 72),
];

/// Shorter ladder for small targets.
const SMALL_TARGET_STEPS: [QualityStep; 5] = [
    step(QualityPreset::Medium, 150),
    step(QualityPreset::Medium, 120),
    step(QualityPreset::Medium, 100),
    step(QualityPreset::Medium, 80),
    step(QualityPreset::Low, 72),
];

/// Targets strictly above this many KB use the large-target ladder.
const LARGE_TARGET_THRESHOLD_KB: u64 = 1000;

/// Bounds of the image-quality ladder.
const IMAGE_QUALITY_START: i32 = 85;
const IMAGE_QUALITY_FLOOR: i32 = 30;

/// Descent steps: coarse while far from the target, fine once close.
const IMAGE_QUALITY_COARSE_STEP: i32 = 15;
const IMAGE_QUALITY_FINE_STEP: i32 = 5;

/// A trial more than this factor above the target counts as far.
const FAR_FROM_TARGET_RATIO: f64 = 1.5;

/// Result of a target-size search.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    /// Output fits the requested budget.
    Achieved {
        /// Final output size in KB.
        size_kb: f64,
    },
    /// Budget unreachable; the smallest trial was kept at the output path.
    BestEffort {
        /// The requested budget in KB.
        target_kb: u64,
        /// Size of the kept output in KB.
        size_kb: f64,
    },
    /// Every best-effort trial failed; no output file was produced.
    Exhausted,
}

impl TargetOutcome {
    /// Whether the output fits the requested budget.
    pub fn achieved(&self) -> bool {
        matches!(self, Self::Achieved { .. })
    }

    /// Whether no output file was produced at all.
    pub fn is_total_failure(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Size of the produced output in KB, if one exists.
    pub fn size_kb(&self) -> Option<f64> {
        match self {
            Self::Achieved { size_kb } | Self::BestEffort { size_kb, .. } => Some(*size_kb),
            Self::Exhausted => None,
        }
    }

    /// Human-readable result message.
    pub fn message(&self) -> String {
        match self {
            Self::Achieved { size_kb } => {
                format!("Target size achieved: {size_kb:.2} KB")
            }
            Self::BestEffort { target_kb, size_kb } => {
                format!("Target size ({target_kb} KB) not achieved. Best size: {size_kb:.2} KB")
            }
            Self::Exhausted => "Failed to compress file".to_string(),
        }
    }
}

/// Searches the backend's parameter space for an output at or under a
/// caller-specified size budget.
pub struct TargetSizeCompressor<'a> {
    backend: &'a dyn CompressionBackend,
}

impl<'a> TargetSizeCompressor<'a> {
    /// Create a searcher over the given backend.
    pub fn new(backend: &'a dyn CompressionBackend) -> Self {
        Self { backend }
    }

    /// Compress `input` to `output`, aiming for at most `target_kb` KB.
    ///
    /// Runs up to three phases in order, each stopping at its first success:
    /// a quality/DPI ladder, an image-quality ladder, and a best-effort
    /// sweep that keeps the smallest producible output. Temporary files are
    /// created next to `output` and removed as the search advances; on
    /// return exactly one file exists at `output`, except for
    /// [`TargetOutcome::Exhausted`] which leaves none.
    ///
    /// Backend failures in the first two phases abort the search; the
    /// best-effort sweep tolerates them per step.
    pub fn compress_to_target(
        &self,
        input: &Path,
        output: &Path,
        target_kb: u64,
    ) -> Result<TargetOutcome> {
        let original_kb = file_size_kb(input)?;
        info!(
            input = %input.display(),
            original_kb,
            target_kb,
            "compressing to target size"
        );

        let steps = steps_for_target(target_kb);

        // Quality/DPI ladder.
        for quality_step in steps {
            let tmp = step_temp_path(output, quality_step);
            if let Err(err) = self.backend.compress(&CompressionJob {
                input,
                output: &tmp,
                preset: quality_step.preset,
                image_quality: None,
                dpi: Some(quality_step.dpi),
            }) {
                let _ = fs::remove_file(&tmp);
                return Err(err.into());
            }
            let size_kb = file_size_kb(&tmp)?;
            debug!(
                preset = quality_step.preset.name(),
                dpi = quality_step.dpi,
                size_kb,
                "quality step result"
            );
            if size_kb <= target_kb as f64 {
                fs::rename(&tmp, output)?;
                return Ok(TargetOutcome::Achieved { size_kb });
            }
            let _ = fs::remove_file(&tmp);
        }

        // Image-quality ladder: low preset, descending JPEG quality.
        let mut quality = IMAGE_QUALITY_START;
        while quality >= IMAGE_QUALITY_FLOOR {
            let tmp = quality_temp_path(output, quality);
            if let Err(err) = self.backend.compress(&CompressionJob {
                input,
                output: &tmp,
                preset: QualityPreset::Low,
                image_quality: Some(quality as u8),
                dpi: None,
            }) {
                let _ = fs::remove_file(&tmp);
                return Err(err.into());
            }
            let size_kb = file_size_kb(&tmp)?;
            debug!(quality, size_kb, "image quality step result");
            if size_kb <= target_kb as f64 {
                fs::rename(&tmp, output)?;
                return Ok(TargetOutcome::Achieved { size_kb });
            }
            let _ = fs::remove_file(&tmp);

            quality -= if size_kb > target_kb as f64 * FAR_FROM_TARGET_RATIO {
                IMAGE_QUALITY_COARSE_STEP
            } else {
                IMAGE_QUALITY_FINE_STEP
            };
        }

        info!(target_kb, "target not reachable, keeping best available");
        self.best_effort_sweep(input, output, target_kb, steps)
    }

    /// Re-run every ladder step plus one floor-quality trial, keeping the
    /// smallest output. Individual backend failures skip the step.
    fn best_effort_sweep(
        &self,
        input: &Path,
        output: &Path,
        target_kb: u64,
        steps: &[QualityStep],
    ) -> Result<TargetOutcome> {
        let mut trials: Vec<(PathBuf, f64)> = Vec::new();

        for quality_step in steps {
            let tmp = step_temp_path(output, quality_step);
            self.record_trial(
                &CompressionJob {
                    input,
                    output: &tmp,
                    preset: quality_step.preset,
                    image_quality: None,
                    dpi: Some(quality_step.dpi),
                },
                &mut trials,
            );
        }

        // Last resort: floor image quality on the low preset.
        let tmp = quality_temp_path(output, IMAGE_QUALITY_FLOOR);
        self.record_trial(
            &CompressionJob {
                input,
                output: &tmp,
                preset: QualityPreset::Low,
                image_quality: Some(IMAGE_QUALITY_FLOOR as u8),
                dpi: None,
            },
            &mut trials,
        );

        if trials.is_empty() {
            return Ok(TargetOutcome::Exhausted);
        }

        // First minimal index keeps the selection deterministic.
        let mut best = 0;
        for (idx, trial) in trials.iter().enumerate() {
            if trial.1 < trials[best].1 {
                best = idx;
            }
        }

        for (idx, (path, _)) in trials.iter().enumerate() {
            if idx != best {
                let _ = fs::remove_file(path);
            }
        }

        let (best_path, size_kb) = &trials[best];
        fs::rename(best_path, output)?;
        debug!(size_kb, "kept smallest best-effort trial");
        Ok(TargetOutcome::BestEffort {
            target_kb,
            size_kb: *size_kb,
        })
    }

    fn record_trial(&self, job: &CompressionJob<'_>, trials: &mut Vec<(PathBuf, f64)>) {
        match self.backend.compress(job) {
            Ok(()) => match file_size_kb(job.output) {
                Ok(size_kb) => trials.push((job.output.to_path_buf(), size_kb)),
                Err(err) => {
                    debug!(%err, "trial output unreadable, skipping step");
                    let _ = fs::remove_file(job.output);
                }
            },
            Err(err) => {
                debug!(%err, "trial failed, skipping step");
                let _ = fs::remove_file(job.output);
            }
        }
    }
}

/// Select the ladder for a target size. The boundary is strict: exactly
/// [`LARGE_TARGET_THRESHOLD_KB`] still uses the small ladder.
fn steps_for_target(target_kb: u64) -> &'static [QualityStep] {
    if target_kb > LARGE_TARGET_THRESHOLD_KB {
        &LARGE_TARGET_STEPS
    } else {
        &SMALL_TARGET_STEPS
    }
}

fn file_size_kb(path: &Path) -> Result<f64> {
    Ok(fs::metadata(path)?.len() as f64 / 1024.0)
}

fn step_temp_path(output: &Path, quality_step: &QualityStep) -> PathBuf {
    temp_path(
        output,
        &format!("{}_{}", quality_step.preset.name(), quality_step.dpi),
    )
}

fn quality_temp_path(output: &Path, quality: i32) -> PathBuf {
    temp_path(output, &format!("q{quality}"))
}

fn temp_path(output: &Path, tag: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("pdf");
    output.with_file_name(format!("{stem}_{tag}.{ext}"))
}
