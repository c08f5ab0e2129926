use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("couldn't open file '{}': {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("couldn't get file info for '{}': {source}", .path.display())]
    Metadata { path: PathBuf, source: io::Error },

    #[error("unable to read from file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
}
