//! Run statistics.

use std::path::PathBuf;
use std::time::Duration;

use observability::MetricsSummary;
use snapshot_engine::JobSummary;

/// Statistics from one snapshot run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Cameras returned by the directory
    pub cameras: usize,

    /// Cameras with a fresh preview
    pub captured: usize,

    /// Cameras that exhausted their attempts
    pub exhausted: usize,

    /// Cameras cut off by the run deadline or a worker panic
    pub incomplete: usize,

    /// Records with no valid preview path
    pub rejected: usize,

    /// Capture attempts across all cameras
    pub attempts: u64,

    /// Entries appended to the run log
    pub log_entries: usize,

    /// Log file written, if any
    pub log_path: Option<PathBuf>,

    /// Workers used
    pub workers: usize,

    /// Total duration of the run
    pub duration: Duration,

    /// Stopped by Ctrl+C / SIGTERM before every camera finished
    pub interrupted: bool,

    /// Per-camera aggregates
    pub metrics: MetricsSummary,
}

impl From<JobSummary> for RunStats {
    fn from(summary: JobSummary) -> Self {
        let report = &summary.report;
        Self {
            cameras: report.total + report.rejected,
            captured: report.captured(),
            exhausted: report.exhausted(),
            incomplete: report.incomplete(),
            rejected: report.rejected,
            attempts: report.attempts(),
            log_entries: summary.log_entries,
            log_path: summary.log_path.clone(),
            workers: report.workers,
            duration: summary.elapsed,
            interrupted: summary.interrupted,
            metrics: summary.metrics.clone(),
        }
    }
}

impl RunStats {
    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Snapshot Run Statistics ===\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        if self.interrupted {
            println!("   ├─ Interrupted by shutdown signal");
        }
        println!("   ├─ Cameras: {}", self.cameras);
        println!("   ├─ Workers: {}", self.workers);
        println!("   ├─ Captured: {}", self.captured);
        println!("   ├─ Exhausted: {}", self.exhausted);
        if self.incomplete > 0 {
            println!("   ├─ Not completed: {}", self.incomplete);
        }
        if self.rejected > 0 {
            println!("   ├─ Skipped (invalid record): {}", self.rejected);
        }
        println!("   └─ Attempts: {}", self.attempts);

        println!("\nRun log");
        match &self.log_path {
            Some(path) => {
                println!("   ├─ Entries: {}", self.log_entries);
                println!("   └─ File: {}", path.display());
            }
            None => println!("   └─ No errors recorded"),
        }

        println!("\n{}", self.metrics);
    }
}
