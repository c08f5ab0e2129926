use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use terminator::ProgressReporter;

/// Spinner on stderr while the tree is walked. indicatif hides it when
/// stderr is not a terminal.
pub struct CliReporter {
    bar: ProgressBar,
}

impl CliReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        self.bar.set_message("Scanning files...");
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_dir_entered(&self, dirs_visited: usize, files_checked: usize, current_dir: &Path) {
        self.bar.set_message(format!(
            "Scanning... {} dirs, {} files checked ({})",
            dirs_visited,
            files_checked,
            current_dir.display()
        ));
    }

    fn on_scan_complete(&self, files_checked: usize, unterminated: usize, duration_secs: f64) {
        self.bar.finish_and_clear();
        if !self.bar.is_hidden() {
            eprintln!(
                "  \x1b[32m✓\x1b[0m Scan complete: {} files checked, {} unterminated in {:.2}s",
                files_checked, unterminated, duration_secs
            );
        }
    }
}
