//! # Contracts
//!
//! Shared interface contracts for the snapshot run: the camera data model,
//! the capture/directory traits, the run-scoped error log and the on-disk
//! layout. Every other crate depends on this one, never the reverse.
//!
//! ## Layout
//! - Images: `<root>/img/cameras_preview/<tenant>/<sanitized>.webp`
//! - Logs: `<root>/logs/scripts/takeRtspSnapshots/<DD-MM-YYYY>.txt`

mod blueprint;
mod camera;
mod capturer;
mod directory;
mod error;
mod error_log;
mod layout;
mod sanitize;

pub use blueprint::*;
pub use camera::*;
pub use capturer::{FrameCapturer, LocalFrameCapturer};
pub use directory::{CameraDirectory, LocalCameraDirectory};
pub use error::*;
pub use error_log::ErrorLog;
pub use layout::{is_path_segment, OutputLayout};
pub use sanitize::{sanitize, SanitizedName};
