//! Error types for the pdfpress-core library.

use thiserror::Error;

/// Main error type for the pdfpress library.
#[derive(Error, Debug)]
pub enum PressError {
    /// Compression backend error.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors from the external compression backend.
///
/// Unavailability is a distinct variant so callers can treat a missing
/// Ghostscript install as a batch-level precondition failure rather than a
/// per-file invocation failure.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The Ghostscript executable could not be located.
    #[error(
        "Ghostscript is not installed or not in PATH. \
         Install it, or point ghostscript.binary in the config at the executable."
    )]
    Unavailable,

    /// The backend process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backend process exited with a non-zero status.
    #[error("Ghostscript failed: {0}")]
    Failed(String),
}

/// Result type for the pdfpress library.
pub type Result<T> = std::result::Result<T, PressError>;
