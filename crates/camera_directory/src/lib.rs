//! # Camera Directory
//!
//! Camera Directory Reader.
//!
//! Responsibilities:
//! - Read the list of active cameras from the external store
//! - Hold no connection between runs
//! - Turn an unavailable directory into a logged, empty run
//!
//! Implementations:
//! - [`MySqlDirectory`]: the production `cameras` table
//! - [`StaticDirectory`] / [`UnavailableDirectory`]: fixed doubles

pub mod memory;
pub mod mysql;

pub use contracts::{CameraDirectory, CameraRecord, ErrorLog};
pub use memory::{StaticDirectory, UnavailableDirectory};
pub use mysql::{MySqlDirectory, ACTIVE_CAMERAS_QUERY};

use tracing::{info, instrument, warn};

/// List active cameras, recording a `DB ERROR` entry instead of failing.
///
/// An unavailable directory yields an empty list so the run completes as a
/// no-op.
#[instrument(name = "directory_list_active", skip_all, fields(directory = %directory.name()))]
pub async fn list_or_record<D: CameraDirectory + Sync>(
    directory: &D,
    errors: &ErrorLog,
) -> Vec<CameraRecord> {
    match directory.list_active_cameras().await {
        Ok(cameras) if cameras.is_empty() => {
            info!("No active cameras found in directory");
            cameras
        }
        Ok(cameras) => {
            info!(count = cameras.len(), "Active cameras loaded");
            cameras
        }
        Err(e) => {
            warn!(error = %e, "Camera directory unavailable, nothing to capture");
            errors.record(format!("DB ERROR: {e}"));
            Vec::new()
        }
    }
}
