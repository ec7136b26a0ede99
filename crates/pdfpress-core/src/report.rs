//! Progress and status reporting for batch runs.

/// Observer for batch compression progress.
///
/// Notifications are fire-and-forget with no backpressure; implementations
/// must not block. The CLI adapts a progress bar to this trait, and a UI
/// layer can forward the calls into whatever threading model it uses.
pub trait BatchObserver {
    /// Called after each file completes, with done and total counts.
    fn on_progress(&self, done: usize, total: usize);

    /// Called with a human-readable status message.
    fn on_status(&self, message: &str);
}

/// Observer that discards all notifications.
pub struct NullObserver;

impl BatchObserver for NullObserver {
    fn on_progress(&self, _done: usize, _total: usize) {}
    fn on_status(&self, _message: &str) {}
}
