//! Camera records read from the directory and the per-run tasks derived from them.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{is_path_segment, sanitize, ContractError, OutputLayout, SanitizedName};

/// One active camera as stored in the directory.
///
/// Immutable for the duration of a run. Duplicates are legal and are
/// processed independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Owning tenant (database / organisation scope)
    pub tenant_id: String,

    /// Free-text name shown to users
    pub display_name: String,

    /// RTSP stream URI
    pub stream_uri: String,
}

impl CameraRecord {
    pub fn new(
        tenant_id: impl Into<String>,
        display_name: impl Into<String>,
        stream_uri: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            display_name: display_name.into(),
            stream_uri: stream_uri.into(),
        }
    }
}

/// Work item for a single acquisition, derived 1:1 from a [`CameraRecord`].
#[derive(Debug, Clone)]
pub struct SnapshotTask {
    pub camera: CameraRecord,
    pub name: SanitizedName,
    /// `<root>/img/cameras_preview/<tenant>/`
    pub target_dir: PathBuf,
    /// `<target_dir>/<name>.webp`
    pub target_path: PathBuf,
}

impl SnapshotTask {
    /// Resolve the output location of `camera` under `layout`.
    ///
    /// # Errors
    /// Returns [`ContractError::InvalidCamera`] when the tenant or the
    /// sanitized name is not a single plain path component, so the preview
    /// could not live at `<root>/img/cameras_preview/<tenant>/<name>.webp`.
    pub fn new(camera: CameraRecord, layout: &OutputLayout) -> Result<Self, ContractError> {
        if !is_path_segment(&camera.tenant_id) {
            return Err(ContractError::invalid_camera(format!(
                "tenant id {:?} is not a directory name",
                camera.tenant_id
            )));
        }
        let name = sanitize(&camera.display_name);
        if !is_path_segment(name.as_str()) {
            return Err(ContractError::invalid_camera(format!(
                "camera name {:?} is not a file name",
                camera.display_name
            )));
        }

        let target_dir = layout.tenant_dir(&camera.tenant_id);
        let target_path = target_dir.join(name.file_name());
        Ok(Self {
            camera,
            name,
            target_dir,
            target_path,
        })
    }

    #[inline]
    pub fn tenant_id(&self) -> &str {
        &self.camera.tenant_id
    }

    #[inline]
    pub fn stream_uri(&self) -> &str {
        &self.camera.stream_uri
    }
}
