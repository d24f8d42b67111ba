//! Run orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{SnapshotRun, SnapshotRunConfig};
pub use stats::RunStats;
