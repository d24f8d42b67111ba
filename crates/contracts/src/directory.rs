//! CameraDirectory trait - read-only source of active cameras

use crate::{CameraRecord, ContractError};

/// Read-only camera directory.
///
/// Implementations hold no connection between calls.
#[trait_variant::make(CameraDirectory: Send)]
pub trait LocalCameraDirectory {
    /// Directory name (used for logging)
    fn name(&self) -> &str;

    /// List every camera currently flagged active.
    ///
    /// # Errors
    /// Returns [`ContractError::DirectoryUnavailable`] on connectivity or
    /// query failure.
    async fn list_active_cameras(&self) -> Result<Vec<CameraRecord>, ContractError>;
}
