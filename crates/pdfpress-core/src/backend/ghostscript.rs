//! Ghostscript backend: binary resolution and subprocess invocation.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, trace};

use super::{CompressionBackend, CompressionJob};
use crate::error::BackendError;
use crate::models::config::GhostscriptConfig;

#[cfg(windows)]
const BUNDLED_NAMES: &[&str] = &["gswin64c.exe", "gswin32c.exe"];
#[cfg(not(windows))]
const BUNDLED_NAMES: &[&str] = &["gs"];

/// Executable names probed on the system PATH, in order.
const PATH_CANDIDATES: &[&str] = &["gs", "gswin64c", "gswin32c"];

/// Compression backend driving a Ghostscript subprocess.
///
/// The executable is resolved once at construction and injected wherever a
/// [`CompressionBackend`] is needed, so no filesystem probing happens on the
/// per-invocation path.
pub struct GhostscriptBackend {
    binary: PathBuf,
}

impl GhostscriptBackend {
    /// Resolve the Ghostscript executable.
    ///
    /// Resolution order: explicit `ghostscript.binary` from the config, then
    /// the bundled directory (configured or exe-relative `bin/ghostscript`),
    /// then the system PATH. Returns [`BackendError::Unavailable`] when no
    /// candidate responds to `--version`.
    pub fn resolve(config: &GhostscriptConfig) -> Result<Self, BackendError> {
        if let Some(binary) = &config.binary {
            if probe(binary) {
                debug!(binary = %binary.display(), "using configured Ghostscript binary");
                return Ok(Self {
                    binary: binary.clone(),
                });
            }
            return Err(BackendError::Unavailable);
        }

        let bundled_dir = config.bundled_dir.clone().or_else(default_bundled_dir);
        if let Some(binary) = find_bundled(bundled_dir.as_deref()) {
            debug!(binary = %binary.display(), "using bundled Ghostscript binary");
            return Ok(Self { binary });
        }

        find_in_path()
            .map(|binary| {
                debug!(binary = %binary.display(), "using Ghostscript from PATH");
                Self { binary }
            })
            .ok_or(BackendError::Unavailable)
    }

    /// Path of the resolved executable.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Version string reported by `--version`.
    pub fn version(&self) -> Result<String, BackendError> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.binary.display().to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(BackendError::Failed(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl CompressionBackend for GhostscriptBackend {
    fn check_available(&self) -> Result<(), BackendError> {
        if probe(&self.binary) {
            Ok(())
        } else {
            Err(BackendError::Unavailable)
        }
    }

    fn compress(&self, job: &CompressionJob<'_>) -> Result<(), BackendError> {
        let args = build_args(job);
        trace!(binary = %self.binary.display(), ?args, "invoking Ghostscript");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            debug!(status = %output.status, "Ghostscript invocation failed");
            return Err(BackendError::Failed(stderr));
        }

        Ok(())
    }
}

/// Build the Ghostscript argument list for one job.
///
/// Explicit Color/Gray/Mono resolution flags are always passed; the value is
/// the DPI override when present, the preset's base DPI otherwise. An image
/// quality setting additionally disables automatic image filtering in favor
/// of explicit bicubic downsampling.
fn build_args(job: &CompressionJob<'_>) -> Vec<String> {
    let dpi = job.dpi.unwrap_or_else(|| job.preset.base_dpi());

    let mut args = vec![
        "-sDEVICE=pdfwrite".to_string(),
        format!("-dPDFSETTINGS={}", job.preset.gs_setting()),
        "-dNOPAUSE".to_string(),
        "-dQUIET".to_string(),
        "-dBATCH".to_string(),
        format!("-dColorImageResolution={dpi}"),
        format!("-dGrayImageResolution={dpi}"),
        format!("-dMonoImageResolution={dpi}"),
    ];

    if let Some(quality) = job.image_quality {
        args.push(format!("-dJPEGQ={quality}"));
        args.push("-dAutoFilterColorImages=false".to_string());
        args.push("-dAutoFilterGrayImages=false".to_string());
        args.push("-dColorImageDownsampleType=/Bicubic".to_string());
        args.push("-dGrayImageDownsampleType=/Bicubic".to_string());
    }

    args.push(format!("-sOutputFile={}", job.output.display()));
    args.push(job.input.display().to_string());
    args
}

/// Returns `true` if `binary` responds successfully to `--version`.
fn probe(binary: &Path) -> bool {
    Command::new(binary)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Default bundled location: `bin/ghostscript` next to the executable.
fn default_bundled_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("bin").join("ghostscript"))
}

fn find_bundled(dir: Option<&Path>) -> Option<PathBuf> {
    let dir = dir?;
    BUNDLED_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn find_in_path() -> Option<PathBuf> {
    PATH_CANDIDATES
        .iter()
        .find(|name| probe(Path::new(name)))
        .map(PathBuf::from)
}
