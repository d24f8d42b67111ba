//! Run orchestrator - wires the production directory and capturer into a job.

use std::future::Future;
use std::sync::Arc;

use camera_directory::MySqlDirectory;
use contracts::SnapshotBlueprint;
use snapshot_engine::{CoordinatorConfig, FfmpegCapturer, SnapshotJob};
use tracing::info;

use super::RunStats;
use crate::error::CliError;

/// Run configuration
#[derive(Debug, Clone)]
pub struct SnapshotRunConfig {
    /// Validated configuration with overrides applied
    pub blueprint: SnapshotBlueprint,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// One production run: MySQL directory, ffmpeg capturer, shared root.
pub struct SnapshotRun {
    config: SnapshotRunConfig,
}

impl SnapshotRun {
    pub fn new(config: SnapshotRunConfig) -> Self {
        Self { config }
    }

    /// Run to completion or until `shutdown` resolves.
    ///
    /// Camera failures end up in the run log; only a failed log append is
    /// returned as an error.
    pub async fn run<S>(self, shutdown: S) -> anyhow::Result<RunStats>
    where
        S: Future<Output = ()>,
    {
        let blueprint = &self.config.blueprint;

        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let directory = MySqlDirectory::new(&blueprint.database);
        let capturer = Arc::new(FfmpegCapturer::new(
            &blueprint.capture,
            blueprint.snapshot.capture_timeout(),
        ));

        let job = SnapshotJob::new(directory, capturer, blueprint.layout())
            .with_max_attempts(blueprint.snapshot.max_attempts)
            .with_coordinator(CoordinatorConfig {
                workers: blueprint.snapshot.workers,
                run_timeout: blueprint.snapshot.run_timeout(),
            });

        let summary = job.run_until(shutdown).await.map_err(CliError::from)?;
        Ok(RunStats::from(summary))
    }
}
