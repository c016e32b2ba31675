//! CLI error type.

use std::path::PathBuf;

use thiserror::Error;

use fairway::course::CourseError;
use fairway::progress::SessionError;

/// Errors surfaced to the CLI user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid course: {0}")]
    Course(#[from] CourseError),

    #[error("could not start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("session failed: {0}")]
    Session(#[from] SessionError),
}
