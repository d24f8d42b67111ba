//! Run log error types

use std::path::PathBuf;
use thiserror::Error;

/// Failure to persist the run's error entries
#[derive(Debug, Error)]
pub enum RunLogError {
    /// Log directory could not be created
    #[error("failed to create log directory '{}': {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Log file could not be opened or appended to
    #[error("failed to append to log '{}': {source}", .path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunLogError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::CreateDir { path, .. } | Self::Append { path, .. } => path,
        }
    }
}

impl From<RunLogError> for contracts::ContractError {
    fn from(e: RunLogError) -> Self {
        contracts::ContractError::log_write(e.path().display().to_string(), e.to_string())
    }
}
