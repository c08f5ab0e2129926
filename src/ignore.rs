//! Ignore-set accumulation.
//!
//! Patterns are expanded against the filesystem one path component at a
//! time with `glob::Pattern`, and every match is stored as a cleaned path. Membership is then a plain set
//! lookup on the cleaned `dir/name` of each visited entry.

use ahash::AHashSet;
use glob::{MatchOptions, Pattern};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Error;
use crate::paths;

/// Name that is skipped at every level no matter what else is configured.
pub const GIT_DIR: &str = ".git";

pub const GITIGNORE: &str = ".gitignore";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One usable line of a `.gitignore` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitignorePattern {
    pub glob: String,
    /// Declared with a trailing `/`; only directories match.
    pub dir_only: bool,
}

/// Parse `.gitignore` contents into glob patterns.
///
/// Blank lines and `#` comments are dropped. Negated (`!`) lines are not
/// supported and are dropped as well. A leading `/` is removed since every
/// pattern is already anchored at the directory it is resolved against.
pub fn parse_gitignore(contents: &str) -> Vec<GitignorePattern> {
    contents
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            if line.starts_with('!') {
                debug!("Skipping unsupported negated pattern '{}'", line);
                return None;
            }

            let line = line.strip_prefix('/').unwrap_or(line);
            let (glob, dir_only) = match line.strip_suffix('/') {
                Some(stripped) => (stripped.trim_end_matches('/'), true),
                None => (line, false),
            };
            if glob.is_empty() {
                return None;
            }

            Some(GitignorePattern {
                glob: glob.to_string(),
                dir_only,
            })
        })
        .collect()
}

/// One `/`-separated piece of a relative pattern.
#[derive(Debug)]
enum Segment {
    Literal(String),
    Wildcard(Pattern),
    /// `**`: zero or more directory levels.
    AnyDepth,
}

fn parse_segments(pattern: &str) -> Result<Vec<Segment>, Error> {
    pattern
        .split(['/', std::path::MAIN_SEPARATOR])
        .filter(|part| !part.is_empty() && *part != ".")
        .map(|part| {
            if part == "**" {
                return Ok(Segment::AnyDepth);
            }
            let compiled = Pattern::new(part).map_err(|source| Error::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            if Pattern::escape(part) == part {
                Ok(Segment::Literal(part.to_string()))
            } else {
                Ok(Segment::Wildcard(compiled))
            }
        })
        .collect()
}

/// Match `segments` below `dir`, pushing every existing path they name.
///
/// The walk starts from the real `dir` path and only entry names are
/// compared against the patterns, so directory names that are not valid
/// UTF-8 still resolve.
fn expand_segments(dir: &Path, segments: &[Segment], found: &mut Vec<PathBuf>) {
    let Some((segment, rest)) = segments.split_first() else {
        found.push(dir.to_path_buf());
        return;
    };

    match segment {
        Segment::Literal(name) => {
            let candidate = dir.join(name);
            if rest.is_empty() {
                if fs::symlink_metadata(&candidate).is_ok() {
                    found.push(candidate);
                }
            } else if candidate.is_dir() {
                expand_segments(&candidate, rest, found);
            }
        }
        Segment::Wildcard(pattern) => {
            for name in entry_names(dir) {
                if !pattern.matches_with(&name.to_string_lossy(), MATCH_OPTIONS) {
                    continue;
                }
                let candidate = dir.join(&name);
                if rest.is_empty() {
                    found.push(candidate);
                } else if candidate.is_dir() {
                    expand_segments(&candidate, rest, found);
                }
            }
        }
        Segment::AnyDepth => {
            expand_segments(dir, rest, found);
            for name in entry_names(dir) {
                let candidate = dir.join(&name);
                // Not followed through symlinks, so a link cycle cannot recurse forever.
                let is_dir = fs::symlink_metadata(&candidate)
                    .map(|meta| meta.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    expand_segments(&candidate, segments, found);
                }
            }
        }
    }
}

fn entry_names(dir: &Path) -> Vec<OsString> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|entry| entry.file_name()))
            .collect(),
        Err(err) => {
            debug!("Skipping unreadable directory {} during glob: {}", dir.display(), err);
            Vec::new()
        }
    }
}

/// Expand an absolute pattern with the `glob` crate. The pattern text is
/// already a string, so nothing is lost converting it.
fn expand_absolute(pattern: &str) -> Result<Vec<PathBuf>, Error> {
    let matches = glob::glob_with(pattern, MATCH_OPTIONS).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut found = Vec::new();
    for entry in matches {
        match entry {
            Ok(path) => found.push(path),
            Err(err) => debug!("Skipping unreadable glob match: {}", err),
        }
    }
    Ok(found)
}

/// Accumulated set of paths to skip. Grows as the walk descends and is
/// never pruned, so a child directory always sees its ancestors' entries.
#[derive(Debug, Default, Clone)]
pub struct IgnoreSet {
    paths: AHashSet<PathBuf>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &Path) -> bool {
        self.paths.insert(paths::clean(path))
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(&paths::clean(path))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Expand `pattern` relative to `base` and add every match.
    /// Returns the number of matches added.
    pub fn extend_with_glob(&mut self, base: &Path, pattern: &str) -> Result<usize, Error> {
        self.extend_matching(base, pattern, false)
    }

    fn extend_matching(&mut self, base: &Path, pattern: &str, dir_only: bool) -> Result<usize, Error> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Ok(0);
        }

        let found = if Path::new(pattern).is_absolute() {
            expand_absolute(pattern)?
        } else {
            let segments = parse_segments(pattern)?;
            let mut found = Vec::new();
            expand_segments(base, &segments, &mut found);
            found
        };

        let mut added = 0;
        for path in found {
            if dir_only && !path.is_dir() {
                continue;
            }
            if self.insert(&path) {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Merge the `.gitignore` found in `dir`, resolving its patterns
    /// against `base`. A missing file contributes nothing.
    pub fn extend_from_gitignore(&mut self, dir: &Path, base: &Path) -> usize {
        let gitignore_path = dir.join(GITIGNORE);
        let contents = match fs::read(&gitignore_path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return 0,
            Err(err) => {
                debug!("Error reading {}: {}", gitignore_path.display(), err);
                return 0;
            }
        };

        let mut added = 0;
        for pattern in parse_gitignore(&String::from_utf8_lossy(&contents)) {
            match self.extend_matching(base, &pattern.glob, pattern.dir_only) {
                Ok(count) => added += count,
                Err(err) => warn!("{} in {}", err, gitignore_path.display()),
            }
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_gitignore_skips_comments_and_blanks() {
        let patterns = parse_gitignore("# build output\n\n   \n*.log\n  target/  \n/dist\n!keep.log\r\n");
        assert_eq!(
            patterns,
            vec![
                GitignorePattern {
                    glob: "*.log".to_string(),
                    dir_only: false
                },
                GitignorePattern {
                    glob: "target".to_string(),
                    dir_only: true
                },
                GitignorePattern {
                    glob: "dist".to_string(),
                    dir_only: false
                },
            ]
        );
    }

    #[test]
    fn test_parse_gitignore_drops_bare_slash() {
        assert!(parse_gitignore("/\n//\n").is_empty());
    }

    #[test]
    fn test_extend_with_glob_base_with_glob_metacharacters() {
        let tmp = tempdir().unwrap();
        let base = tmp.path().join("a[1]*");
        fs::create_dir(&base).unwrap();
        fs::write(base.join("x.txt"), "x").unwrap();

        let mut set = IgnoreSet::new();
        assert_eq!(set.extend_with_glob(&base, "*.txt").unwrap(), 1);
        assert!(set.contains(&base.join("x.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn test_extend_with_glob_non_utf8_base() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = tempdir().unwrap();
        let base = tmp.path().join(OsStr::from_bytes(b"d\xFF"));
        fs::create_dir(&base).unwrap();
        fs::write(base.join("x.txt"), "x").unwrap();
        fs::write(base.join("y.log"), "x").unwrap();

        let mut set = IgnoreSet::new();
        assert_eq!(set.extend_with_glob(&base, "x.txt").unwrap(), 1);
        assert_eq!(set.extend_with_glob(&base, "*.log").unwrap(), 1);
        assert!(set.contains(&base.join("x.txt")));
        assert!(set.contains(&base.join("y.log")));
    }

    #[cfg(unix)]
    #[test]
    fn test_extend_with_glob_absolute_pattern() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("abs.txt"), "x").unwrap();
        let pattern = format!("{}/*.txt", tmp.path().display());

        let mut set = IgnoreSet::new();
        assert_eq!(set.extend_with_glob(Path::new("elsewhere"), &pattern).unwrap(), 1);
        assert!(set.contains(&tmp.path().join("abs.txt")));
    }

    #[test]
    fn test_extend_with_glob_nested_and_any_depth() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("sub/deep")).unwrap();
        fs::write(root.join("sub/a.log"), "x").unwrap();
        fs::write(root.join("sub/deep/b.log"), "x").unwrap();
        fs::write(root.join("top.log"), "x").unwrap();

        let mut set = IgnoreSet::new();
        assert_eq!(set.extend_with_glob(root, "sub/*.log").unwrap(), 1);
        assert!(set.contains(&root.join("sub/a.log")));

        let mut set = IgnoreSet::new();
        set.extend_with_glob(root, "**/*.log").unwrap();
        assert!(set.contains(&root.join("top.log")));
        assert!(set.contains(&root.join("sub/a.log")));
        assert!(set.contains(&root.join("sub/deep/b.log")));
    }

    #[test]
    fn test_extend_with_glob_missing_literal() {
        let tmp = tempdir().unwrap();
        let mut set = IgnoreSet::new();
        assert_eq!(set.extend_with_glob(tmp.path(), "nothing/here").unwrap(), 0);
    }

    #[test]
    fn test_extend_with_glob_relative_to_base() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::write(root.join("a.log"), "x").unwrap();
        fs::write(root.join("b.log"), "x").unwrap();
        fs::write(root.join("c.txt"), "x").unwrap();

        let mut set = IgnoreSet::new();
        let added = set.extend_with_glob(root, "*.log").unwrap();
        assert_eq!(added, 2);
        assert!(set.contains(&root.join("a.log")));
        assert!(set.contains(&root.join("./b.log")));
        assert!(!set.contains(&root.join("c.txt")));
    }

    #[test]
    fn test_extend_with_glob_matches_hidden_names() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join(".env"), "x").unwrap();

        let mut set = IgnoreSet::new();
        set.extend_with_glob(tmp.path(), "*").unwrap();
        assert!(set.contains(&tmp.path().join(".env")));
    }

    #[test]
    fn test_extend_with_glob_invalid_pattern() {
        let tmp = tempdir().unwrap();
        let mut set = IgnoreSet::new();
        let err = set.extend_with_glob(tmp.path(), "[unclosed").unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
        assert!(set.is_empty());
    }

    #[test]
    fn test_extend_with_glob_empty_pattern() {
        let tmp = tempdir().unwrap();
        let mut set = IgnoreSet::new();
        assert_eq!(set.extend_with_glob(tmp.path(), "  ").unwrap(), 0);
    }

    #[test]
    fn test_extend_from_gitignore_missing_file() {
        let tmp = tempdir().unwrap();
        let mut set = IgnoreSet::new();
        assert_eq!(set.extend_from_gitignore(tmp.path(), tmp.path()), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_extend_from_gitignore_dir_only() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir(root.join("build")).unwrap();
        fs::create_dir(root.join("out")).unwrap();
        fs::write(root.join("out.txt"), "x").unwrap();
        fs::write(root.join("build.txt"), "x").unwrap();
        fs::write(root.join(GITIGNORE), "build/\nout*/\n[bad\n").unwrap();

        let mut set = IgnoreSet::new();
        set.extend_from_gitignore(root, root);
        assert!(set.contains(&root.join("build")));
        assert!(set.contains(&root.join("out")));
        assert!(!set.contains(&root.join("out.txt")));
        assert!(!set.contains(&root.join("build.txt")));
    }
}
