//! Configuration validation
//!
//! Rules:
//! - storage.root is set
//! - workers / max_attempts / frame_rate > 0
//! - capture program is set and the RTSP transport is known
//! - database name and user are set

use contracts::{ContractError, SnapshotBlueprint, RTSP_TRANSPORTS};

/// Validate a SnapshotBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SnapshotBlueprint) -> Result<(), ContractError> {
    validate_storage(blueprint)?;
    validate_snapshot(blueprint)?;
    validate_capture(blueprint)?;
    validate_database(blueprint)?;
    Ok(())
}

fn validate_storage(blueprint: &SnapshotBlueprint) -> Result<(), ContractError> {
    if blueprint.storage.root.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "storage.root",
            "root path cannot be empty",
        ));
    }
    Ok(())
}

fn validate_snapshot(blueprint: &SnapshotBlueprint) -> Result<(), ContractError> {
    let snapshot = &blueprint.snapshot;

    if snapshot.workers == 0 {
        return Err(ContractError::config_validation(
            "snapshot.workers",
            "workers must be >= 1, got 0",
        ));
    }

    if snapshot.max_attempts == 0 {
        return Err(ContractError::config_validation(
            "snapshot.max_attempts",
            "max_attempts must be >= 1, got 0",
        ));
    }

    Ok(())
}

fn validate_capture(blueprint: &SnapshotBlueprint) -> Result<(), ContractError> {
    let capture = &blueprint.capture;

    if capture.program.trim().is_empty() {
        return Err(ContractError::config_validation(
            "capture.program",
            "capture program cannot be empty",
        ));
    }

    if !RTSP_TRANSPORTS.contains(&capture.rtsp_transport.as_str()) {
        return Err(ContractError::config_validation(
            "capture.rtsp_transport",
            format!(
                "unknown transport '{}', expected one of {:?}",
                capture.rtsp_transport, RTSP_TRANSPORTS
            ),
        ));
    }

    if capture.frame_rate == 0 {
        return Err(ContractError::config_validation(
            "capture.frame_rate",
            "frame_rate must be >= 1, got 0",
        ));
    }

    Ok(())
}

fn validate_database(blueprint: &SnapshotBlueprint) -> Result<(), ContractError> {
    let db = &blueprint.database;

    if db.name.is_empty() {
        return Err(ContractError::config_validation(
            "database.name",
            "database name cannot be empty",
        ));
    }

    if db.user.is_empty() {
        return Err(ContractError::config_validation(
            "database.user",
            "database user cannot be empty",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        CaptureConfig, ConfigVersion, DatabaseConfig, SnapshotConfig, StorageConfig,
    };
    use std::path::PathBuf;

    fn minimal_blueprint() -> SnapshotBlueprint {
        SnapshotBlueprint {
            version: ConfigVersion::V1,
            storage: StorageConfig {
                root: PathBuf::from("/srv/site"),
            },
            snapshot: SnapshotConfig::default(),
            capture: CaptureConfig::default(),
            database: DatabaseConfig {
                host: "localhost".into(),
                port: 3306,
                user: "snap".into(),
                password: String::new(),
                name: "cams".into(),
                charset: "utf8mb4".into(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&minimal_blueprint()).is_ok());
    }

    #[test]
    fn test_empty_root() {
        let mut bp = minimal_blueprint();
        bp.storage.root = PathBuf::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("storage.root"), "got: {err}");
    }

    #[test]
    fn test_zero_workers() {
        let mut bp = minimal_blueprint();
        bp.snapshot.workers = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("workers must be >= 1"), "got: {err}");
    }

    #[test]
    fn test_zero_attempts() {
        let mut bp = minimal_blueprint();
        bp.snapshot.max_attempts = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("max_attempts"), "got: {err}");
    }

    #[test]
    fn test_unknown_transport() {
        let mut bp = minimal_blueprint();
        bp.capture.rtsp_transport = "quic".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("unknown transport 'quic'"), "got: {err}");
    }

    #[test]
    fn test_blank_program() {
        let mut bp = minimal_blueprint();
        bp.capture.program = "  ".into();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("capture.program"), "got: {err}");
    }

    #[test]
    fn test_zero_frame_rate() {
        let mut bp = minimal_blueprint();
        bp.capture.frame_rate = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("frame_rate"), "got: {err}");
    }

    #[test]
    fn test_missing_database_fields() {
        let mut bp = minimal_blueprint();
        bp.database.name = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("database.name"), "got: {err}");

        let mut bp = minimal_blueprint();
        bp.database.user = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("database.user"), "got: {err}");
    }
}
