//! FrameCapturer trait - external frame-grab capability
//!
//! Abstracts the process that pulls one still frame out of a stream so the
//! acquirer can be driven by a test double.

use std::path::Path;

use crate::CaptureError;

/// Single-frame capture capability.
#[trait_variant::make(FrameCapturer: Send)]
pub trait LocalFrameCapturer {
    /// Short name of the capture backend (used for logging)
    fn name(&self) -> &str;

    /// Grab one frame from `stream_uri` and write it to `destination`.
    ///
    /// Returns the size in bytes of the file at `destination` once the
    /// capture has finished, or 0 when no file was produced.
    ///
    /// # Errors
    /// Returns a [`CaptureError`] when the capture could not be run or
    /// reported failure.
    async fn capture(&self, stream_uri: &str, destination: &Path) -> Result<u64, CaptureError>;
}
