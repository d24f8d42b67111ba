//! # Snapshot Engine
//!
//! Concurrent preview acquisition.
//!
//! Responsibilities:
//! - Run the external frame grabber per camera with bounded retries
//! - Fan a camera list out over a fixed-size worker pool
//! - Record every failure in the run's `ErrorLog`, never abort the batch
//! - Tie a directory read, a coordinator run and the log flush into one job
//!
//! # Example
//!
//! ```ignore
//! let errors = ErrorLog::new();
//! let capturer = Arc::new(FfmpegCapturer::new(&blueprint.capture, None));
//! let acquirer = SnapshotAcquirer::new(capturer, 3, errors.clone());
//! let coordinator = SnapshotCoordinator::new(acquirer, blueprint.layout(), CoordinatorConfig::default());
//! let report = coordinator.run(cameras).await;
//! ```

pub mod acquirer;
pub mod coordinator;
pub mod ffmpeg;
pub mod job;
pub mod mock;
pub mod report;

pub use acquirer::{AcquireOutcome, SnapshotAcquirer};
pub use contracts::{CameraRecord, ErrorLog, FrameCapturer, SnapshotTask};
pub use coordinator::{CoordinatorConfig, SnapshotCoordinator};
pub use ffmpeg::FfmpegCapturer;
pub use job::{JobSummary, SnapshotJob};
pub use mock::{ScriptStep, ScriptedCapturer};
pub use report::{CameraReport, RunReport};
