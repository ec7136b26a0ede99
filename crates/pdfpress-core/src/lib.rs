//! Core library for batch PDF compression.
//!
//! This crate provides:
//! - A compression backend abstraction with a Ghostscript implementation,
//!   resolved once at startup (bundled directory, then system PATH)
//! - An iterative target-size search that drives the backend through
//!   decreasing quality settings until an output fits a size budget
//! - A batch driver that aggregates per-file outcomes and reports progress
//!   through an observer interface

pub mod backend;
pub mod compress;
pub mod error;
pub mod models;
pub mod report;

pub use backend::{CompressionBackend, CompressionJob, GhostscriptBackend, QualityPreset};
pub use compress::{
    BatchCompressor, BatchMode, BatchOutcome, QualityStep, TargetOutcome, TargetSizeCompressor,
};
pub use error::{BackendError, PressError, Result};
pub use models::config::PressConfig;
pub use report::{BatchObserver, NullObserver};
