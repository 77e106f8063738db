//! Batch progress hooks.
//!
//! The calculator only counts loans. Rendering lives in `pcaf_cli_utils`.

/// Receives loan counts while a batch runs.
pub trait ProgressCallback: Send + Sync {
    /// Number of loans in the batch.
    fn set_total(&self, total: u64);

    /// Called after each loan, with `delta` loans done.
    fn inc(&self, delta: u64);

    /// Short status text shown next to the count.
    fn set_message(&self, msg: String);

    /// Batch finished; `msg` summarizes successes and failures.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
