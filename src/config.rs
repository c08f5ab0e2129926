use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;

pub const DEFAULT_CONFIG_NAME: &str = "terminator";
pub const ENV_PREFIX: &str = "TERMINATOR";

/// Directory that relative `.gitignore` patterns are resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GitignoreAnchor {
    /// The directory that contains the `.gitignore`.
    #[default]
    Directory,
    /// The directory the scan started from.
    Root,
}

/// Settings for one scan. Built once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfiguration {
    pub dir: PathBuf,
    pub ignore_hidden: bool,
    pub quiet: bool,
    pub no_gitignore: bool,
    pub ignore: Vec<String>,
    pub gitignore_anchor: GitignoreAnchor,
    pub progress: bool,
}

impl Default for ScanConfiguration {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            ignore_hidden: false,
            quiet: false,
            no_gitignore: false,
            ignore: Vec::new(),
            gitignore_anchor: GitignoreAnchor::Directory,
            progress: false,
        }
    }
}

/// Values supplied on the command line. `None`/`false` leave the file and
/// environment layers untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dir: Option<PathBuf>,
    pub ignore: Vec<String>,
    pub ignore_hidden: bool,
    pub quiet: bool,
    pub no_gitignore: bool,
    pub gitignore_anchor: Option<GitignoreAnchor>,
    pub progress: bool,
}

/// Load the file and environment layers.
///
/// With no explicit path an optional `terminator.{toml,json,yaml}` in the
/// working directory is used; an explicit path must exist.
pub fn load_configuration(config_path: Option<&Path>) -> Result<ScanConfiguration, Error> {
    let file_source = match config_path {
        Some(path) => ConfigFile::from(path).required(true),
        None => ConfigFile::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let builder = Config::builder()
        .add_source(file_source)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("ignore"),
        )
        .build()?;

    Ok(builder.try_deserialize::<ScanConfiguration>()?)
}

impl ScanConfiguration {
    /// Apply command-line values on top of the loaded layers. Flags only
    /// switch behaviour on and patterns only accumulate, so the result
    /// never ignores less than the layers underneath asked for.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.dir {
            self.dir = dir;
        }
        self.ignore.extend(overrides.ignore);
        self.ignore = split_patterns(&self.ignore);
        self.ignore_hidden |= overrides.ignore_hidden;
        self.quiet |= overrides.quiet;
        self.no_gitignore |= overrides.no_gitignore;
        self.progress |= overrides.progress;
        if let Some(anchor) = overrides.gitignore_anchor {
            self.gitignore_anchor = anchor;
        }
        self
    }

    /// Check that the scan root is an existing directory.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.dir.is_dir() {
            return Err(Error::NotADirectory(self.dir.clone()));
        }
        Ok(())
    }
}

/// Flatten comma-separated entries, trimming each and dropping empties.
pub fn split_patterns<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split(','))
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}
