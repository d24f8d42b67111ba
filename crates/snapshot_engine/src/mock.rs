//! ScriptedCapturer - FrameCapturer test double
//!
//! Each stream URI follows its own script of outcomes. The last step of a
//! script repeats once the script runs out; unscripted streams produce an
//! empty file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use contracts::{CaptureError, FrameCapturer};

/// One scripted capture outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Write a file of this many bytes
    Write(u64),
    /// Write a zero-byte file
    Empty,
    /// Produce nothing and report this stderr
    Fail(String),
    /// Panic inside the capture call
    Panic,
}

#[derive(Debug, Default)]
struct StreamState {
    script: Vec<ScriptStep>,
    calls: usize,
    stale_seen: usize,
}

/// Capturer driven by per-stream scripts.
#[derive(Debug, Default)]
pub struct ScriptedCapturer {
    streams: Mutex<HashMap<String, StreamState>>,
    delay: Option<Duration>,
}

impl ScriptedCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every capture call
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Set the script for `stream_uri`
    pub fn script(&self, stream_uri: &str, steps: Vec<ScriptStep>) {
        self.lock().entry(stream_uri.to_string()).or_default().script = steps;
    }

    /// Number of capture calls made for `stream_uri`
    pub fn calls(&self, stream_uri: &str) -> usize {
        self.lock().get(stream_uri).map_or(0, |s| s.calls)
    }

    /// Total capture calls across all streams
    pub fn total_calls(&self) -> usize {
        self.lock().values().map(|s| s.calls).sum()
    }

    /// Calls for `stream_uri` that found a file already at the destination
    pub fn stale_seen(&self, stream_uri: &str) -> usize {
        self.lock().get(stream_uri).map_or(0, |s| s.stale_seen)
    }

    fn next_step(&self, stream_uri: &str, stale: bool) -> ScriptStep {
        let mut streams = self.lock();
        let state = streams.entry(stream_uri.to_string()).or_default();
        let step = state
            .script
            .get(state.calls)
            .or_else(|| state.script.last())
            .cloned()
            .unwrap_or(ScriptStep::Empty);
        state.calls += 1;
        if stale {
            state.stale_seen += 1;
        }
        step
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StreamState>> {
        self.streams.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FrameCapturer for ScriptedCapturer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn capture(&self, stream_uri: &str, destination: &Path) -> Result<u64, CaptureError> {
        let stale = tokio::fs::try_exists(destination).await.unwrap_or(false);
        let step = self.next_step(stream_uri, stale);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match step {
            ScriptStep::Write(bytes) => {
                let len = usize::try_from(bytes).unwrap_or(usize::MAX);
                tokio::fs::write(destination, vec![0xAB; len]).await?;
                Ok(bytes)
            }
            ScriptStep::Empty => {
                tokio::fs::write(destination, b"").await?;
                Ok(0)
            }
            ScriptStep::Fail(stderr) => {
                Err(CaptureError::exit_status("scripted", "exit status: 1", stderr))
            }
            ScriptStep::Panic => panic!("scripted capture panic for {stream_uri}"),
        }
    }
}
