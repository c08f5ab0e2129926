use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::ScanConfiguration;
use crate::error::Error;
use crate::ignore::IgnoreSet;
use crate::paths;
use crate::progress::ProgressReporter;
use crate::scanner::{CheckFailure, TreeWalker, WalkStats};

pub struct ScanEngine {
    config: ScanConfiguration,
}

#[derive(Debug)]
pub struct ScanResult {
    /// Unterminated files, sorted by path string.
    pub unterminated: Vec<PathBuf>,
    /// Files that could not be checked. Each is also in `unterminated`.
    pub failures: Vec<CheckFailure>,
    pub stats: WalkStats,
    pub ignored_paths: usize,
    pub scan_duration: Duration,
}

impl ScanResult {
    pub fn is_clean(&self) -> bool {
        self.unterminated.is_empty()
    }
}

impl ScanEngine {
    pub fn new(config: ScanConfiguration) -> Self {
        Self { config }
    }

    /// Expand the configured patterns against the scan root. An invalid
    /// pattern is an error rather than being skipped.
    pub fn resolve_ignored(&self) -> Result<IgnoreSet, Error> {
        let mut ignored = IgnoreSet::new();
        for pattern in &self.config.ignore {
            let added = ignored.extend_with_glob(&self.config.dir, pattern)?;
            debug!("Ignore pattern '{}' matched {} paths", pattern, added);
        }
        Ok(ignored)
    }

    /// Walk the tree from the configured root:
    /// 1. Expand the configured ignore patterns
    /// 2. Depth-first walk, merging each directory's `.gitignore`
    /// 3. Sort the unterminated paths once
    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ScanResult, Error> {
        let ignored = self.resolve_ignored()?;
        debug!("{} paths ignored before walking", ignored.len());

        info!("Scanning {}", self.config.dir.display());
        reporter.on_scan_start();
        let scan_start = Instant::now();

        let mut walker = TreeWalker::new(&self.config, ignored, reporter);
        let mut unterminated = walker.scan_dir(&self.config.dir);
        paths::sort_by_path_string(&mut unterminated);

        let scan_duration = scan_start.elapsed();
        let stats = walker.stats();
        let ignored_paths = walker.ignored().len();
        let failures = walker.into_failures();

        reporter.on_scan_complete(
            stats.files_checked,
            unterminated.len(),
            scan_duration.as_secs_f64(),
        );
        debug!(
            "Scan completed in {:.2}s: {} dirs, {} files, {} ignored entries, {} unreadable dirs",
            scan_duration.as_secs_f64(),
            stats.dirs_visited,
            stats.files_checked,
            stats.ignored_entries,
            stats.unreadable_dirs,
        );

        Ok(ScanResult {
            unterminated,
            failures,
            stats,
            ignored_paths,
            scan_duration,
        })
    }
}
