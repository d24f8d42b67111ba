//! SnapshotJob - one complete run: directory, acquisition, log flush

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use camera_directory::list_or_record;
use contracts::{CameraDirectory, ErrorLog, FrameCapturer, OutputLayout};
use observability::{MetricsSummary, RunMetricsAggregator};
use run_log::{RunLogError, RunLogger};
use tracing::{error, info, warn};

use crate::acquirer::{AcquireOutcome, SnapshotAcquirer};
use crate::coordinator::{CoordinatorConfig, SnapshotCoordinator};
use crate::report::RunReport;

/// What a finished run leaves behind
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub report: RunReport,
    pub metrics: MetricsSummary,
    /// Error-log entries produced by the run
    pub log_entries: usize,
    /// Log file appended to, `None` when the run was clean
    pub log_path: Option<PathBuf>,
    pub elapsed: Duration,
    /// The run was cut short by a shutdown request
    pub interrupted: bool,
}

/// A full snapshot run over one directory and one capturer.
///
/// The run owns a fresh [`ErrorLog`]: the directory read, every worker and
/// the coordinator append to it, and it is flushed once at the end. Camera
/// failures never fail the job; only the final log append can.
pub struct SnapshotJob<D, C> {
    directory: D,
    capturer: Arc<C>,
    layout: OutputLayout,
    max_attempts: u32,
    coordinator: CoordinatorConfig,
}

impl<D, C> SnapshotJob<D, C>
where
    D: CameraDirectory + Sync,
    C: FrameCapturer + Send + Sync + 'static,
{
    pub fn new(directory: D, capturer: Arc<C>, layout: OutputLayout) -> Self {
        Self {
            directory,
            capturer,
            layout,
            max_attempts: 3,
            coordinator: CoordinatorConfig::default(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_coordinator(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator = config;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub async fn run(&self) -> Result<JobSummary, RunLogError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run until done or until `shutdown` resolves.
    ///
    /// On shutdown the outstanding workers are dropped, an `INTERRUPTED`
    /// entry is recorded and the entries gathered so far are still flushed.
    pub async fn run_until<S>(&self, shutdown: S) -> Result<JobSummary, RunLogError>
    where
        S: Future<Output = ()>,
    {
        let started = Instant::now();
        info!(root = %self.layout.root().display(), "[START] snapshot run");

        let errors = ErrorLog::new();
        let cameras = list_or_record(&self.directory, &errors).await;
        observability::record_active_cameras(cameras.len());

        let acquirer = SnapshotAcquirer::new(Arc::clone(&self.capturer), self.max_attempts, errors.clone());
        let coordinator =
            SnapshotCoordinator::new(acquirer, self.layout.clone(), self.coordinator.clone());
        let submitted = cameras.len();
        let mut interrupted = false;
        let report = tokio::select! {
            report = coordinator.run(cameras) => report,
            _ = shutdown => {
                warn!("Shutdown requested, abandoning outstanding cameras");
                errors.record(format!(
                    "RUN INTERRUPTED by shutdown after {}s, {} camera(s) submitted",
                    started.elapsed().as_secs(),
                    submitted
                ));
                interrupted = true;
                RunReport::new(Vec::new(), submitted, self.coordinator.workers, started.elapsed())
            }
        };

        let mut aggregator = RunMetricsAggregator::new();
        for camera in &report.cameras {
            let elapsed_ms = camera.elapsed.as_secs_f64() * 1000.0;
            match camera.outcome {
                AcquireOutcome::Captured { attempts, bytes } => {
                    aggregator.record_captured(attempts, bytes, elapsed_ms)
                }
                AcquireOutcome::Exhausted { attempts } => {
                    aggregator.record_exhausted(attempts, elapsed_ms)
                }
            }
        }

        let entries = errors.drain();
        observability::record_log_entries(entries.len());
        let log_path = RunLogger::new(self.layout.clone())
            .flush(&entries)
            .inspect_err(|e| error!(error = %e, "Run log could not be written"))?;

        let elapsed = started.elapsed();
        info!(
            captured = report.captured(),
            exhausted = report.exhausted(),
            log_entries = entries.len(),
            duration_ms = elapsed.as_millis() as u64,
            "[END] snapshot run"
        );

        Ok(JobSummary {
            report,
            metrics: aggregator.summary(),
            log_entries: entries.len(),
            log_path,
            elapsed,
            interrupted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ScriptStep, ScriptedCapturer};
    use camera_directory::{StaticDirectory, UnavailableDirectory};
    use contracts::CameraRecord;

    #[tokio::test]
    async fn test_clean_run_leaves_no_log() {
        let dir = tempfile::tempdir().unwrap();
        let capturer = Arc::new(ScriptedCapturer::new());
        capturer.script("rtsp://a", vec![ScriptStep::Write(32)]);
        let directory = StaticDirectory::new(vec![CameraRecord::new("t1", "A", "rtsp://a")]);

        let summary = SnapshotJob::new(directory, capturer, OutputLayout::new(dir.path()))
            .run()
            .await
            .unwrap();

        assert_eq!(summary.metrics.captured, 1);
        assert_eq!(summary.log_entries, 0);
        assert!(summary.log_path.is_none());
        assert!(!dir.path().join("logs").exists());
    }

    #[tokio::test]
    async fn test_unavailable_directory_is_a_logged_noop() {
        let dir = tempfile::tempdir().unwrap();
        let capturer = Arc::new(ScriptedCapturer::new());

        let summary = SnapshotJob::new(
            UnavailableDirectory::new("connection refused"),
            Arc::clone(&capturer),
            OutputLayout::new(dir.path()),
        )
        .run()
        .await
        .unwrap();

        assert_eq!(summary.report.total, 0);
        assert_eq!(capturer.total_calls(), 0);
        assert_eq!(summary.log_entries, 1);
        let content = std::fs::read_to_string(summary.log_path.unwrap()).unwrap();
        assert!(content.contains("DB ERROR:"));
        assert!(content.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_shutdown_flushes_collected_entries() {
        let dir = tempfile::tempdir().unwrap();
        let capturer = Arc::new(ScriptedCapturer::with_delay(Duration::from_secs(30)));
        let directory = StaticDirectory::new(vec![
            CameraRecord::new("t1", "A", "rtsp://a"),
            CameraRecord::new("", "Broken", "rtsp://b"),
        ]);

        let summary = SnapshotJob::new(directory, capturer, OutputLayout::new(dir.path()))
            .run_until(tokio::time::sleep(Duration::from_millis(50)))
            .await
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.log_entries, 2);
        let content = std::fs::read_to_string(summary.log_path.unwrap()).unwrap();
        assert!(content.contains("ERROR processing broken ()"), "{content}");
        assert!(content.contains("RUN INTERRUPTED by shutdown"), "{content}");
    }

    #[tokio::test]
    async fn test_blocked_log_dir_fails_the_job() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("logs"), b"blocker").unwrap();
        let directory = StaticDirectory::new(vec![CameraRecord::new("t1", "A", "rtsp://a")]);

        let result = SnapshotJob::new(
            directory,
            Arc::new(ScriptedCapturer::new()),
            OutputLayout::new(dir.path()),
        )
        .with_max_attempts(1)
        .run()
        .await;

        assert!(result.is_err());
    }
}
