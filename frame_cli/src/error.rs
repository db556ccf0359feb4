//! CLI error type

use std::path::PathBuf;

use frame_core::FrameError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Cannot read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No wall '{0}' in project")]
    UnknownWall(String),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl CliError {
    /// The engine error behind this failure, if any
    pub fn frame_error(&self) -> Option<&FrameError> {
        match self {
            CliError::Frame(e) => Some(e),
            _ => None,
        }
    }
}
