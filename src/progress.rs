use std::path::Path;

/// Trait for reporting scan progress.
///
/// The binary implements it with an indicatif spinner. All methods have
/// default no-op implementations.
pub trait ProgressReporter {
    fn on_scan_start(&self) {}
    fn on_dir_entered(&self, _dirs_visited: usize, _files_checked: usize, _current_dir: &Path) {}
    fn on_scan_complete(&self, _files_checked: usize, _unterminated: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
