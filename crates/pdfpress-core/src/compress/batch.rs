//! Batch driver applying compression across a list of files.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::target::{TargetOutcome, TargetSizeCompressor};
use crate::backend::{CompressionBackend, CompressionJob, QualityPreset};
use crate::report::BatchObserver;

/// How each file in a batch is compressed.
///
/// The two modes are mutually exclusive by construction.
#[derive(Debug, Clone, Copy)]
pub enum BatchMode {
    /// Single backend invocation at a fixed preset.
    Preset(QualityPreset),
    /// Target-size search with the given budget in KB.
    TargetSize(u64),
}

/// Aggregated per-file outcomes of a batch run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Per-file success messages, in input order. Includes qualified
    /// successes where an output exists but exceeds the requested budget.
    pub successes: Vec<String>,
    /// Per-file failure messages, in input order.
    pub failures: Vec<String>,
}

/// Applies a [`BatchMode`] to every input file, generating non-colliding
/// output names and aggregating outcomes.
///
/// Per-file failures never abort the batch; precondition failures (backend
/// unavailable, output directory uncreatable) abort it before any file is
/// attempted.
pub struct BatchCompressor<'a> {
    backend: &'a dyn CompressionBackend,
    output_suffix: String,
}

impl<'a> BatchCompressor<'a> {
    /// Create a driver over the given backend.
    pub fn new(backend: &'a dyn CompressionBackend) -> Self {
        Self {
            backend,
            output_suffix: "_compressed".to_string(),
        }
    }

    /// Override the suffix inserted before the output file extension.
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    /// Compress every file in `files` into `output_dir`.
    ///
    /// Emits one status message per precondition failure, and per-file
    /// status plus a progress tick after each file.
    pub fn run(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        mode: BatchMode,
        observer: &dyn BatchObserver,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        if let Err(err) = self.backend.check_available() {
            let msg = err.to_string();
            warn!("{msg}");
            observer.on_status(&msg);
            outcome.failures.push(msg);
            return outcome;
        }

        if let Err(err) = fs::create_dir_all(output_dir) {
            let msg = format!(
                "Failed to create output directory {}: {err}",
                output_dir.display()
            );
            warn!("{msg}");
            observer.on_status(&msg);
            outcome.failures.push(msg);
            return outcome;
        }

        let total = files.len();
        let searcher = TargetSizeCompressor::new(self.backend);

        for (idx, input) in files.iter().enumerate() {
            let base = input
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("input.pdf")
                .to_string();
            let out_path = unique_output_path(output_dir, input, &self.output_suffix);

            observer.on_status(&format!("Compressing {base} ({}/{total})...", idx + 1));
            debug!(
                input = %input.display(),
                output = %out_path.display(),
                "compressing file"
            );

            match mode {
                BatchMode::TargetSize(target_kb) => {
                    observer.on_status(&format!("Compressing to target size: {target_kb} KB..."));
                    match searcher.compress_to_target(input, &out_path, target_kb) {
                        Ok(TargetOutcome::Achieved { size_kb }) => outcome
                            .successes
                            .push(format!("Compressed: {base} ({size_kb:.2} KB)")),
                        Ok(TargetOutcome::BestEffort { target_kb, size_kb }) => {
                            outcome.successes.push(format!(
                                "Compressed: {base} (target size {target_kb} KB not met, best size {size_kb:.2} KB)"
                            ))
                        }
                        Ok(TargetOutcome::Exhausted) => outcome
                            .failures
                            .push(format!("Failed to compress file: {base}")),
                        Err(err) => {
                            let msg = format!("Error compressing {base}: {err}");
                            warn!("{msg}");
                            observer.on_status(&msg);
                            outcome.failures.push(msg);
                        }
                    }
                }
                BatchMode::Preset(preset) => {
                    let job = CompressionJob {
                        input,
                        output: &out_path,
                        preset,
                        image_quality: None,
                        dpi: None,
                    };
                    match self.backend.compress(&job) {
                        Ok(()) => outcome.successes.push(format!("Compressed: {base}")),
                        Err(err) => {
                            let msg = format!("Error compressing {base}: {err}");
                            warn!("{msg}");
                            observer.on_status(&msg);
                            outcome.failures.push(msg);
                        }
                    }
                }
            }

            observer.on_progress(idx + 1, total);
        }

        info!(
            successes = outcome.successes.len(),
            failures = outcome.failures.len(),
            "batch complete"
        );
        outcome
    }
}

/// Output path `<stem><suffix>.<ext>` in `dir`, disambiguated with a
/// `(N)` counter when the name is already taken.
fn unique_output_path(dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("pdf");

    let mut candidate = dir.join(format!("{stem}{suffix}.{ext}"));
    let mut counter = 1;
    while candidate.exists() {
        candidate = dir.join(format!("{stem}{suffix}({counter}).{ext}"));
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::testing::{ScriptedBackend, Trial};
    use crate::report::NullObserver;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Observer recording every notification.
    #[derive(Default)]
    struct RecordingObserver {
        statuses: Mutex<Vec<String>>,
        progress: Mutex<Vec<(usize, usize)>>,
    }

    impl BatchObserver for RecordingObserver {
        fn on_progress(&self, done: usize, total: usize) {
            self.progress.lock().unwrap().push((done, total));
        }
        fn on_status(&self, message: &str) {
            self.statuses.lock().unwrap().push(message.to_string());
        }
    }

    fn make_input(dir: &TempDir, rel: &str) -> PathBuf {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, vec![0u8; 64]).unwrap();
        path
    }

    #[test]
    fn test_same_base_names_get_numbered_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![make_input(&dir, "a/report.pdf"), make_input(&dir, "b/report.pdf")];
        let out_dir = dir.path().join("out");
        let backend = ScriptedBackend::always(Trial::Produce(10));

        let outcome = BatchCompressor::new(&backend).run(
            &files,
            &out_dir,
            BatchMode::Preset(QualityPreset::Medium),
            &NullObserver,
        );

        assert_eq!(outcome.successes.len(), 2);
        assert!(outcome.failures.is_empty());
        assert!(out_dir.join("report_compressed.pdf").exists());
        assert!(out_dir.join("report_compressed(1).pdf").exists());
    }

    #[test]
    fn test_unavailable_backend_aborts_before_any_attempt() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![make_input(&dir, "a.pdf"), make_input(&dir, "b.pdf")];
        let out_dir = dir.path().join("out");
        let backend = ScriptedBackend::unavailable();
        let observer = RecordingObserver::default();

        let outcome = BatchCompressor::new(&backend).run(
            &files,
            &out_dir,
            BatchMode::Preset(QualityPreset::Medium),
            &observer,
        );

        assert!(outcome.successes.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].contains("Ghostscript"));
        assert_eq!(observer.statuses.lock().unwrap().len(), 1);
        assert!(observer.progress.lock().unwrap().is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_per_file_failure_does_not_abort_batch() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![make_input(&dir, "bad.pdf"), make_input(&dir, "good.pdf")];
        let out_dir = dir.path().join("out");
        let backend = ScriptedBackend::scripted_then(vec![Trial::Fail], Trial::Produce(10));

        let outcome = BatchCompressor::new(&backend).run(
            &files,
            &out_dir,
            BatchMode::Preset(QualityPreset::Low),
            &NullObserver,
        );

        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].starts_with("Error compressing bad.pdf"));
        assert_eq!(outcome.successes, vec!["Compressed: good.pdf"]);
    }

    #[test]
    fn test_unreachable_target_is_qualified_success() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![make_input(&dir, "big.pdf")];
        let out_dir = dir.path().join("out");
        let backend = ScriptedBackend::always(Trial::Produce(500));

        let outcome = BatchCompressor::new(&backend).run(
            &files,
            &out_dir,
            BatchMode::TargetSize(1),
            &NullObserver,
        );

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.successes.len(), 1);
        assert!(outcome.successes[0].contains("target size 1 KB not met"));
        assert!(out_dir.join("big_compressed.pdf").exists());
    }

    #[test]
    fn test_target_achieved_message_includes_size() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![make_input(&dir, "doc.pdf")];
        let out_dir = dir.path().join("out");
        let backend = ScriptedBackend::scripted(vec![Trial::Produce(900)]);

        let outcome = BatchCompressor::new(&backend).run(
            &files,
            &out_dir,
            BatchMode::TargetSize(1000),
            &NullObserver,
        );

        assert_eq!(outcome.successes, vec!["Compressed: doc.pdf (900.00 KB)"]);
    }

    #[test]
    fn test_progress_and_status_reported_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            make_input(&dir, "x.pdf"),
            make_input(&dir, "y.pdf"),
            make_input(&dir, "z.pdf"),
        ];
        let out_dir = dir.path().join("out");
        let backend = ScriptedBackend::always(Trial::Produce(10));
        let observer = RecordingObserver::default();

        BatchCompressor::new(&backend).run(
            &files,
            &out_dir,
            BatchMode::Preset(QualityPreset::High),
            &observer,
        );

        assert_eq!(
            *observer.progress.lock().unwrap(),
            vec![(1, 3), (2, 3), (3, 3)]
        );
        let statuses = observer.statuses.lock().unwrap();
        assert_eq!(statuses[0], "Compressing x.pdf (1/3)...");
        assert_eq!(statuses[1], "Compressing y.pdf (2/3)...");
        assert_eq!(statuses[2], "Compressing z.pdf (3/3)...");
    }

    #[test]
    fn test_custom_output_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![make_input(&dir, "doc.pdf")];
        let out_dir = dir.path().join("out");
        let backend = ScriptedBackend::always(Trial::Produce(10));

        BatchCompressor::new(&backend)
            .with_output_suffix("_small")
            .run(
                &files,
                &out_dir,
                BatchMode::Preset(QualityPreset::Medium),
                &NullObserver,
            );

        assert!(out_dir.join("doc_small.pdf").exists());
    }

    #[test]
    fn test_unique_output_path_counter() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("doc_compressed.pdf"), b"x").unwrap();
        fs::write(dir.path().join("doc_compressed(1).pdf"), b"x").unwrap();

        let path = unique_output_path(dir.path(), Path::new("in/doc.pdf"), "_compressed");
        assert_eq!(path, dir.path().join("doc_compressed(2).pdf"));
    }
}
