//! Layered error definitions
//!
//! Categorized by source: config / directory / capture / run log

use std::time::Duration;
use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Directory Errors =====
    /// Camera list could not be obtained
    #[error("camera directory unavailable: {message}")]
    DirectoryUnavailable { message: String },

    /// Camera record that cannot be mapped into the output tree
    #[error("invalid camera record: {message}")]
    InvalidCamera { message: String },

    // ===== Capture Errors =====
    /// Single capture attempt failed
    #[error(transparent)]
    Capture(#[from] CaptureError),

    // ===== Run Log Errors =====
    /// End-of-run log append failed
    #[error("failed to write run log '{path}': {message}")]
    LogWrite { path: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create directory unavailable error
    pub fn directory_unavailable(message: impl Into<String>) -> Self {
        Self::DirectoryUnavailable {
            message: message.into(),
        }
    }

    /// Create invalid camera record error
    pub fn invalid_camera(message: impl Into<String>) -> Self {
        Self::InvalidCamera {
            message: message.into(),
        }
    }

    /// Create run log write error
    pub fn log_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LogWrite {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failure of one frame-capture invocation
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The capture program could not be started
    #[error("failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    /// The capture program exited unsuccessfully
    #[error("'{program}' exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    /// The capture program did not finish in time and was killed
    #[error("'{program}' timed out after {}s", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    /// Filesystem error around the capture
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CaptureError {
    pub fn spawn(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Spawn {
            program: program.into(),
            message: message.into(),
        }
    }

    pub fn exit_status(
        program: impl Into<String>,
        status: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ExitStatus {
            program: program.into(),
            status: status.into(),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ContractError::config_validation("snapshot.workers", "must be >= 1");
        assert_eq!(
            err.to_string(),
            "config validation error at 'snapshot.workers': must be >= 1"
        );

        let err = CaptureError::exit_status("ffmpeg", "exit status: 1", "Connection refused");
        assert_eq!(
            err.to_string(),
            "'ffmpeg' exited with exit status: 1: Connection refused"
        );

        let err = CaptureError::Timeout {
            program: "ffmpeg".into(),
            timeout: Duration::from_secs(15),
        };
        assert_eq!(err.to_string(), "'ffmpeg' timed out after 15s");
    }

    #[test]
    fn test_capture_error_is_transparent() {
        let err: ContractError = CaptureError::spawn("ffmpeg", "No such file").into();
        assert_eq!(err.to_string(), "failed to start 'ffmpeg': No such file");
    }
}
