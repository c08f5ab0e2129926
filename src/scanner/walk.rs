use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{GitignoreAnchor, ScanConfiguration};
use crate::error::Error;
use crate::ignore::{IgnoreSet, GIT_DIR};
use crate::paths;
use crate::progress::ProgressReporter;

use super::termination::is_terminated;

/// A file whose termination could not be determined. It is reported as
/// unterminated as well.
#[derive(Debug)]
pub struct CheckFailure {
    pub path: PathBuf,
    pub error: Error,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WalkStats {
    pub dirs_visited: usize,
    pub unreadable_dirs: usize,
    pub files_checked: usize,
    pub ignored_entries: usize,
}

/// Sequential depth-first walker. Owns the ignore set and grows it with
/// each directory's `.gitignore` on the way down.
pub struct TreeWalker<'a> {
    config: &'a ScanConfiguration,
    ignored: IgnoreSet,
    reporter: &'a dyn ProgressReporter,
    failures: Vec<CheckFailure>,
    stats: WalkStats,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        config: &'a ScanConfiguration,
        ignored: IgnoreSet,
        reporter: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            config,
            ignored,
            reporter,
            failures: Vec::new(),
            stats: WalkStats::default(),
        }
    }

    /// Collect unterminated files under `dir`, unsorted. A directory that
    /// can't be listed contributes nothing.
    pub fn scan_dir(&mut self, dir: &Path) -> Vec<PathBuf> {
        if !self.config.no_gitignore {
            let base = match self.config.gitignore_anchor {
                GitignoreAnchor::Directory => dir,
                GitignoreAnchor::Root => self.config.dir.as_path(),
            };
            self.ignored.extend_from_gitignore(dir, base);
        }

        let mut entries: Vec<fs::DirEntry> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(err) => {
                        debug!("Error reading entry in directory {}: {}", dir.display(), err);
                        None
                    }
                })
                .collect(),
            Err(err) => {
                debug!("Error reading directory {}: {}", dir.display(), err);
                self.stats.unreadable_dirs += 1;
                return Vec::new();
            }
        };
        entries.sort_by_key(|entry| entry.file_name());

        self.stats.dirs_visited += 1;
        self.reporter
            .on_dir_entered(self.stats.dirs_visited, self.stats.files_checked, dir);

        let mut unterminated = Vec::new();
        for entry in entries {
            let name = entry.file_name();
            let path = paths::clean(&dir.join(&name));

            if self.is_ignored(&path, &name) {
                self.stats.ignored_entries += 1;
                continue;
            }

            unterminated.extend(self.scan_entry(&entry, path));
        }

        unterminated
    }

    /// `.git` always, then the accumulated set, then dotfiles when hidden
    /// entries are filtered.
    pub fn is_ignored(&self, path: &Path, name: &OsStr) -> bool {
        if name == OsStr::new(GIT_DIR) {
            return true;
        }
        if self.ignored.contains(path) {
            return true;
        }
        self.config.ignore_hidden && name.to_string_lossy().starts_with('.')
    }

    fn scan_entry(&mut self, entry: &fs::DirEntry, path: PathBuf) -> Vec<PathBuf> {
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                debug!("Error getting file type for {}: {}", path.display(), err);
                return Vec::new();
            }
        };

        if file_type.is_dir() {
            return self.scan_dir(&path);
        }

        if file_type.is_symlink() {
            // Directory targets are not followed; dangling links fall
            // through to the check and surface as failures.
            if let Ok(metadata) = fs::metadata(&path) {
                if metadata.is_dir() {
                    debug!("Not following directory symlink {}", path.display());
                    return Vec::new();
                }
                if !metadata.is_file() {
                    return Vec::new();
                }
            }
        } else if !file_type.is_file() {
            debug!("Skipping special file {}", path.display());
            return Vec::new();
        }

        self.check_file(path).into_iter().collect()
    }

    fn check_file(&mut self, path: PathBuf) -> Option<PathBuf> {
        self.stats.files_checked += 1;
        match is_terminated(&path) {
            Ok(true) => None,
            Ok(false) => Some(path),
            Err(error) => {
                debug!("{}", error);
                self.failures.push(CheckFailure {
                    path: path.clone(),
                    error,
                });
                Some(path)
            }
        }
    }

    pub fn ignored(&self) -> &IgnoreSet {
        &self.ignored
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    pub fn into_failures(self) -> Vec<CheckFailure> {
        self.failures
    }
}
