// src/progress.rs
use crate::error::ScrapeError;

/// Lightweight progress reporting for a category sweep.
/// Frontends (CLI, tests) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of categories to sweep.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One category finished with `rows` records.
    fn item_done(&mut self, _category: &str, _rows: usize) {}

    /// One category was skipped.
    fn item_failed(&mut self, _category: &str, _err: &ScrapeError) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
