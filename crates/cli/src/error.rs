//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// A command-line override produced an invalid configuration
    #[error("Invalid override: {0}")]
    InvalidOverride(#[source] contracts::ContractError),

    /// Ctrl+C or SIGTERM arrived before the run finished
    #[error("Snapshot run interrupted by shutdown signal")]
    Interrupted,

    /// End-of-run log append failed
    #[error("Run log could not be written: {0}")]
    RunLog(#[from] run_log::RunLogError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}
