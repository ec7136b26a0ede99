//! PDF compression orchestration.

mod batch;
mod target;

pub use batch::{BatchCompressor, BatchMode, BatchOutcome};
pub use target::{QualityStep, TargetOutcome, TargetSizeCompressor};

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend used by the search and driver tests.

    use std::collections::VecDeque;
    use std::fs;
    use std::sync::Mutex;

    use crate::backend::{CompressionBackend, CompressionJob, QualityPreset};
    use crate::error::BackendError;

    /// Outcome of one scripted invocation.
    #[derive(Debug, Clone, Copy)]
    pub enum Trial {
        /// Write an output file of this many KB and succeed.
        Produce(u64),
        /// Fail without producing a file.
        Fail,
    }

    /// Recorded parameters of one invocation.
    pub type CallRecord = (QualityPreset, Option<u8>, Option<u32>);

    /// Backend that replays a scripted sequence of trial outcomes.
    pub struct ScriptedBackend {
        queue: Mutex<VecDeque<Trial>>,
        fallback: Option<Trial>,
        available: bool,
        calls: Mutex<Vec<CallRecord>>,
    }

    impl ScriptedBackend {
        /// Replay `trials` in order, then panic if invoked again.
        pub fn scripted(trials: Vec<Trial>) -> Self {
            Self {
                queue: Mutex::new(trials.into()),
                fallback: None,
                available: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Replay `trials` in order, then repeat `fallback` forever.
        pub fn scripted_then(trials: Vec<Trial>, fallback: Trial) -> Self {
            Self {
                queue: Mutex::new(trials.into()),
                fallback: Some(fallback),
                available: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Repeat one trial forever.
        pub fn always(trial: Trial) -> Self {
            Self::scripted_then(Vec::new(), trial)
        }

        /// Backend whose presence check fails.
        pub fn unavailable() -> Self {
            Self {
                queue: Mutex::new(VecDeque::new()),
                fallback: None,
                available: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<CallRecord> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn next(&self) -> Trial {
            self.queue
                .lock()
                .unwrap()
                .pop_front()
                .or(self.fallback)
                .expect("scripted backend ran out of trials")
        }
    }

    impl CompressionBackend for ScriptedBackend {
        fn check_available(&self) -> Result<(), BackendError> {
            if self.available {
                Ok(())
            } else {
                Err(BackendError::Unavailable)
            }
        }

        fn compress(&self, job: &CompressionJob<'_>) -> Result<(), BackendError> {
            self.calls
                .lock()
                .unwrap()
                .push((job.preset, job.image_quality, job.dpi));
            match self.next() {
                Trial::Produce(kb) => {
                    fs::write(job.output, vec![0u8; (kb * 1024) as usize])
                        .expect("scripted backend failed to write output");
                    Ok(())
                }
                Trial::Fail => Err(BackendError::Failed("scripted failure".to_string())),
            }
        }
    }
}
