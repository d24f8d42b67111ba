//! In-memory directories
//!
//! Fixed camera lists and a directory that always fails, for tests and
//! dry runs.

use contracts::{CameraDirectory, CameraRecord, ContractError};

/// Directory returning a fixed list of cameras.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    cameras: Vec<CameraRecord>,
}

impl StaticDirectory {
    pub fn new(cameras: Vec<CameraRecord>) -> Self {
        Self { cameras }
    }
}

impl CameraDirectory for StaticDirectory {
    fn name(&self) -> &str {
        "static"
    }

    async fn list_active_cameras(&self) -> Result<Vec<CameraRecord>, ContractError> {
        Ok(self.cameras.clone())
    }
}

/// Directory that is never reachable.
#[derive(Debug, Clone)]
pub struct UnavailableDirectory {
    message: String,
}

impl UnavailableDirectory {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl CameraDirectory for UnavailableDirectory {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn list_active_cameras(&self) -> Result<Vec<CameraRecord>, ContractError> {
        Err(ContractError::directory_unavailable(&self.message))
    }
}
