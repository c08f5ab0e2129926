use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use terminator::config::Overrides;
use terminator::GitignoreAnchor;
use tracing::warn;

#[derive(Debug, Parser)]
#[command(name = "terminator", version)]
#[command(about = "Report files that do not end in a newline", long_about = None)]
pub struct Cli {
    /// Directory to scan when --dir is not given; falls back to `.` if it does not exist
    #[arg(value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Directory to scan
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Comma-separated globs to ignore, relative to the scanned directory
    #[arg(long, value_name = "GLOBS", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Skip every entry whose name starts with `.`
    #[arg(long = "ignoreHidden", visible_alias = "ignore-hidden")]
    pub ignore_hidden: bool,

    /// Never read .gitignore files
    #[arg(long = "no-ignore", visible_alias = "no-gitignore")]
    pub no_gitignore: bool,

    /// Don't list unterminated files; only set the exit code
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory that .gitignore patterns are resolved against
    #[arg(long, value_enum, value_name = "ANCHOR")]
    pub gitignore_anchor: Option<GitignoreAnchor>,

    /// Show a spinner on stderr while scanning
    #[arg(long)]
    pub progress: bool,

    /// Config file to load instead of ./terminator.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            dir: self.scan_dir(),
            ignore: self.ignore.clone(),
            ignore_hidden: self.ignore_hidden,
            quiet: self.quiet,
            no_gitignore: self.no_gitignore,
            gitignore_anchor: self.gitignore_anchor,
            progress: self.progress,
        }
    }

    /// `--dir` wins. A positional directory is only used if it exists.
    fn scan_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.dir {
            return Some(dir.clone());
        }
        let path = self.path.as_ref()?;
        if path.is_dir() {
            Some(path.clone())
        } else {
            warn!("'{}' is not a directory, scanning '.' instead", path.display());
            Some(PathBuf::from("."))
        }
    }
}

/// Single-dash long flags accepted for compatibility with existing hooks.
const LEGACY_VALUE_FLAGS: &[&str] = &["dir", "ignore"];
const LEGACY_BOOL_FLAGS: &[&str] = &["ignoreHidden", "no-ignore", "q", "quiet"];

/// Rewrite `-dir x`, `-ignore=a,b`, `-ignoreHidden` and friends into the
/// double-dash form clap expects. `-flag=false` on a boolean drops the
/// flag. Everything after `--` is left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut passthrough = false;

    for arg in args {
        if passthrough {
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        let body = match text.strip_prefix('-') {
            Some(body) if !body.starts_with('-') => body,
            _ => {
                normalized.push(arg);
                continue;
            }
        };
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        if LEGACY_VALUE_FLAGS.contains(&name) {
            normalized.push(OsString::from(format!("-{}", text)));
        } else if LEGACY_BOOL_FLAGS.contains(&name) {
            let dashes = if name.len() == 1 { "-" } else { "--" };
            match value {
                None | Some("true") | Some("1") => {
                    normalized.push(OsString::from(format!("{}{}", dashes, name)))
                }
                Some("false") | Some("0") => {}
                Some(_) => normalized.push(OsString::from(format!("-{}", text))),
            }
        } else {
            normalized.push(arg);
        }
    }

    normalized
}
