//! SnapshotAcquirer - one camera, bounded retries, never fails the caller

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use contracts::{ErrorLog, FrameCapturer, SnapshotTask};
use tracing::{debug, info, instrument, warn};

/// Terminal result of acquiring one camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A non-empty preview was written on attempt `attempts`
    Captured { attempts: u32, bytes: u64 },
    /// Every attempt failed or produced an empty file
    Exhausted { attempts: u32 },
}

impl AcquireOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Captured { attempts, .. } | Self::Exhausted { attempts } => *attempts,
        }
    }

    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Captured { .. })
    }
}

/// Acquires a preview for one camera at a time.
///
/// Every attempt prepares the tenant directory, removes any previous
/// preview, runs the capturer and checks the resulting size. Failures are
/// appended to the run's [`ErrorLog`] and the loop moves on to the next
/// attempt; only a non-empty file ends it early.
pub struct SnapshotAcquirer<C> {
    capturer: Arc<C>,
    max_attempts: u32,
    errors: ErrorLog,
}

impl<C: FrameCapturer + Sync> SnapshotAcquirer<C> {
    pub fn new(capturer: Arc<C>, max_attempts: u32, errors: ErrorLog) -> Self {
        Self {
            capturer,
            max_attempts: max_attempts.max(1),
            errors,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// Run the retry loop for `task`.
    #[instrument(
        name = "acquire_snapshot",
        skip(self, task),
        fields(tenant = %task.tenant_id(), camera = %task.name)
    )]
    pub async fn acquire(&self, task: &SnapshotTask) -> AcquireOutcome {
        let started = Instant::now();

        for attempt in 1..=self.max_attempts {
            info!(attempt, max_attempts = self.max_attempts, "Capturing preview");
            observability::record_attempt(task.tenant_id());

            match self.attempt(task).await {
                Ok(bytes) if bytes > 0 => {
                    info!(
                        attempt,
                        bytes,
                        path = %task.target_path.display(),
                        "Preview saved"
                    );
                    observability::record_captured(task.tenant_id(), bytes);
                    return AcquireOutcome::Captured {
                        attempts: attempt,
                        bytes,
                    };
                }
                Ok(_) => {
                    warn!(attempt, "Capture produced an empty file");
                    observability::record_failed_attempt(task.tenant_id(), "empty");
                    self.record_failure(task, attempt, "empty output (0 bytes)");
                }
                Err(cause) => {
                    warn!(attempt, error = %cause, "Capture attempt failed");
                    observability::record_failed_attempt(task.tenant_id(), "error");
                    self.record_failure(task, attempt, &cause);
                }
            }
        }

        discard_empty(&task.target_path).await;

        warn!(
            attempts = self.max_attempts,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Giving up on camera"
        );
        observability::record_exhausted(task.tenant_id());
        self.errors.record(format!(
            "GAVE UP on {} ({}) after {} attempts",
            task.name,
            task.tenant_id(),
            self.max_attempts
        ));

        AcquireOutcome::Exhausted {
            attempts: self.max_attempts,
        }
    }

    /// One attempt; any failure is returned as its display text.
    async fn attempt(&self, task: &SnapshotTask) -> Result<u64, String> {
        ensure_dir(&task.target_dir)
            .await
            .map_err(|e| format!("create {}: {e}", task.target_dir.display()))?;

        if remove_if_present(&task.target_path)
            .await
            .map_err(|e| format!("remove old {}: {e}", task.target_path.display()))?
        {
            debug!(path = %task.target_path.display(), "Removed old preview");
        }

        self.capturer
            .capture(task.stream_uri(), &task.target_path)
            .await
            .map_err(|e| e.to_string())
    }

    fn record_failure(&self, task: &SnapshotTask, attempt: u32, cause: &str) {
        self.errors.record(format!(
            "ERROR processing {} ({}) attempt {}/{}: {}",
            task.name,
            task.tenant_id(),
            attempt,
            self.max_attempts,
            cause
        ));
    }
}

/// Create the directory tree, world-writable on unix.
async fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o777);
    builder.create(dir).await
}

/// Remove `path`, returning whether something was there.
async fn remove_if_present(path: &Path) -> std::io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Drop a zero-byte leftover so a failed camera has no preview at all.
async fn discard_empty(path: &Path) {
    if let Ok(meta) = tokio::fs::metadata(path).await {
        if meta.len() == 0 {
            if let Err(e) = tokio::fs::remove_file(path).await {
                debug!(path = %path.display(), error = %e, "Could not remove empty preview");
            }
        }
    }
}
