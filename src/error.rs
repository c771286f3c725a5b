use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure taxonomy shared by both utilities. Every member reaches the
/// top-level handler in `main`, which maps it to exit code 1 and a single
/// `ERROR:` line; nothing is retried.
#[derive(Debug, Error)]
pub enum PrepError {
    #[error("required input not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{0}")]
    MalformedInput(String),
    #[error("cannot parse timestamp '{value}' (expected MM/DD/YYYY HH:MM:SS AM/PM)")]
    Parse { value: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<csv::Error> for PrepError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io_err) => PrepError::Io(io_err),
            _ => PrepError::MalformedInput(message),
        }
    }
}
