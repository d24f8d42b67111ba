//! FfmpegCapturer - grabs one frame from an RTSP stream with the ffmpeg CLI

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use contracts::{CaptureConfig, CaptureError, FrameCapturer};
use tokio::process::Command;
use tracing::{debug, warn};

/// Frame capturer running an external ffmpeg process per attempt.
///
/// The child is spawned with `kill_on_drop`, so an elapsed timeout (or an
/// aborted run) never leaves an orphaned ffmpeg behind.
#[derive(Debug, Clone)]
pub struct FfmpegCapturer {
    program: String,
    rtsp_transport: String,
    frame_rate: u32,
    timeout: Option<Duration>,
}

impl FfmpegCapturer {
    pub fn new(config: &CaptureConfig, timeout: Option<Duration>) -> Self {
        Self {
            program: config.program.clone(),
            rtsp_transport: config.rtsp_transport.clone(),
            frame_rate: config.frame_rate,
            timeout,
        }
    }

    /// Command-line profile: forced transport, one frame at a low rate
    /// written straight to `destination`, errors-only diagnostics.
    pub fn args(&self, stream_uri: &str, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-y",
            "-rtsp_transport",
            self.rtsp_transport.as_str(),
            "-i",
            stream_uri,
            "-vframes",
            "1",
            "-r",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(self.frame_rate.to_string().into());
        args.push(destination.as_os_str().to_owned());
        args.extend(
            ["-nostats", "-hide_banner", "-loglevel", "error"]
                .into_iter()
                .map(OsString::from),
        );
        args
    }

    async fn run(&self, stream_uri: &str, destination: &Path) -> Result<(), CaptureError> {
        let child = Command::new(&self.program)
            .args(self.args(stream_uri, destination))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CaptureError::spawn(&self.program, e.to_string()))?;

        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result?,
                Err(_) => {
                    warn!(
                        timeout_secs = limit.as_secs(),
                        destination = %destination.display(),
                        "Capture timed out, process killed"
                    );
                    return Err(CaptureError::Timeout {
                        program: self.program.clone(),
                        timeout: limit,
                    });
                }
            },
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::exit_status(
                &self.program,
                output.status.to_string(),
                stderr.trim(),
            ));
        }

        Ok(())
    }
}

impl FrameCapturer for FfmpegCapturer {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn capture(&self, stream_uri: &str, destination: &Path) -> Result<u64, CaptureError> {
        self.run(stream_uri, destination).await?;
        let size = file_size(destination).await?;
        debug!(destination = %destination.display(), bytes = size, "ffmpeg finished");
        Ok(size)
    }
}

/// Size of the file at `path`, 0 when it does not exist.
pub(crate) async fn file_size(path: &Path) -> std::io::Result<u64> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.len()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e),
    }
}
