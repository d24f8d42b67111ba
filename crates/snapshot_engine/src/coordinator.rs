//! SnapshotCoordinator - fans cameras out over a fixed pool of workers

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_channel::{Receiver, Sender};
use contracts::{sanitize, CameraRecord, ErrorLog, FrameCapturer, OutputLayout, SnapshotTask};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, instrument, warn};

use crate::acquirer::{AcquireOutcome, SnapshotAcquirer};
use crate::report::{CameraReport, RunReport};

/// Coordinator configuration
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Concurrent workers
    pub workers: usize,
    /// Overall deadline (None = wait for every camera)
    pub run_timeout: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            run_timeout: None,
        }
    }
}

/// Runs one acquisition per camera on a bounded worker pool.
///
/// Cameras are queued on a channel and `workers` tasks pull from it, each
/// finishing one camera before taking the next. Workers live in a
/// [`JoinSet`]: a panicking worker is recorded and replaced, and never
/// cancels its siblings. `run` returns only once the queue is drained and
/// every worker has been joined.
pub struct SnapshotCoordinator<C> {
    acquirer: Arc<SnapshotAcquirer<C>>,
    layout: OutputLayout,
    config: CoordinatorConfig,
}

impl<C> SnapshotCoordinator<C>
where
    C: FrameCapturer + Send + Sync + 'static,
{
    pub fn new(acquirer: SnapshotAcquirer<C>, layout: OutputLayout, config: CoordinatorConfig) -> Self {
        Self {
            acquirer: Arc::new(acquirer),
            layout,
            config,
        }
    }

    fn errors(&self) -> &ErrorLog {
        self.acquirer.errors()
    }

    /// Acquire every camera and wait for all of them.
    #[instrument(
        name = "coordinator_run",
        skip(self, cameras),
        fields(cameras = cameras.len(), workers = self.config.workers)
    )]
    pub async fn run(&self, cameras: Vec<CameraRecord>) -> RunReport {
        let started = Instant::now();
        let (tasks, rejected) = self.resolve(cameras);
        let total = tasks.len();
        let worker_count = self.config.workers.max(1).min(total.max(1));

        let (task_tx, task_rx) = async_channel::bounded(total.max(1));
        for task in tasks {
            // Capacity covers every camera and the receiver is alive.
            if task_tx.try_send(task).is_err() {
                error!("Snapshot queue rejected a camera");
            }
        }
        task_tx.close();

        let (done_tx, done_rx) = async_channel::unbounded();
        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            self.spawn_worker(&mut workers, id, task_rx.clone(), done_tx.clone());
        }

        info!(cameras = total, workers = worker_count, "Snapshot run started");

        let joined = match self.config.run_timeout {
            Some(limit) => {
                tokio::time::timeout(limit, self.join_all(&mut workers, &task_rx, &done_tx))
                    .await
                    .map_err(|_| limit)
            }
            None => {
                self.join_all(&mut workers, &task_rx, &done_tx).await;
                Ok(())
            }
        };
        drop(done_tx);

        if let Err(limit) = joined {
            workers.abort_all();
            while workers.join_next().await.is_some() {}
            warn!(timeout_secs = limit.as_secs(), "Run deadline exceeded, workers aborted");
            let finished = done_rx.len();
            self.errors().record(format!(
                "RUN DEADLINE exceeded after {}s, {} camera(s) not completed",
                limit.as_secs(),
                total.saturating_sub(finished)
            ));
        }

        let mut cameras = Vec::with_capacity(total);
        while let Ok(report) = done_rx.try_recv() {
            cameras.push(report);
        }

        let report =
            RunReport::new(cameras, total, worker_count, started.elapsed()).with_rejected(rejected);
        info!(
            captured = report.captured(),
            exhausted = report.exhausted(),
            incomplete = report.incomplete(),
            rejected = report.rejected,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Snapshot run finished"
        );
        report
    }

    /// Resolve target paths, recording every camera that has none.
    fn resolve(&self, cameras: Vec<CameraRecord>) -> (Vec<SnapshotTask>, usize) {
        let mut tasks = Vec::with_capacity(cameras.len());
        let mut rejected = 0;
        for camera in cameras {
            let label = format!("{} ({})", sanitize(&camera.display_name), camera.tenant_id);
            match SnapshotTask::new(camera, &self.layout) {
                Ok(task) => tasks.push(task),
                Err(e) => {
                    warn!(camera = %label, error = %e, "Skipping camera");
                    self.errors().record(format!("ERROR processing {label}: {e}"));
                    rejected += 1;
                }
            }
        }
        (tasks, rejected)
    }

    fn spawn_worker(
        &self,
        workers: &mut JoinSet<usize>,
        id: usize,
        tasks: Receiver<SnapshotTask>,
        done: Sender<CameraReport>,
    ) {
        let acquirer = Arc::clone(&self.acquirer);
        workers.spawn(async move {
            worker_loop(id, acquirer, tasks, done).await;
            id
        });
    }

    /// Join workers until none remain, replacing any that panic while the
    /// queue still holds cameras.
    async fn join_all(
        &self,
        workers: &mut JoinSet<usize>,
        tasks: &Receiver<SnapshotTask>,
        done: &Sender<CameraReport>,
    ) {
        let mut next_id = workers.len();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(id) => debug!(worker = id, "Worker finished"),
                Err(e) => {
                    self.record_join_error(&e);
                    if !tasks.is_empty() {
                        self.spawn_worker(workers, next_id, tasks.clone(), done.clone());
                        next_id += 1;
                    }
                }
            }
        }
    }

    fn record_join_error(&self, e: &JoinError) {
        error!(error = %e, "Snapshot worker failed");
        let detail = if e.is_panic() {
            "panicked".to_string()
        } else {
            e.to_string()
        };
        self.errors().record(format!("WORKER PANIC: snapshot worker {detail}"));
    }
}

async fn worker_loop<C: FrameCapturer + Sync>(
    id: usize,
    acquirer: Arc<SnapshotAcquirer<C>>,
    tasks: Receiver<SnapshotTask>,
    done: Sender<CameraReport>,
) {
    while let Ok(task) = tasks.recv().await {
        let started = Instant::now();
        let outcome: AcquireOutcome = acquirer.acquire(&task).await;
        let report = CameraReport {
            tenant_id: task.camera.tenant_id,
            name: task.name,
            target_path: task.target_path,
            outcome,
            elapsed: started.elapsed(),
        };
        if done.send(report).await.is_err() {
            debug!(worker = id, "Result channel closed");
            break;
        }
    }
}
