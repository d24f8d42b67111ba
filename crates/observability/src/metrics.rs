//! Snapshot run metrics
//!
//! Thin wrappers over the `metrics` facade plus an in-memory aggregator for
//! the end-of-run summary.

use metrics::{counter, gauge, histogram};

/// Record one capture attempt starting
pub fn record_attempt(tenant_id: &str) {
    counter!(
        "rtsp_snapshots_attempts_total",
        "tenant" => tenant_id.to_string()
    )
    .increment(1);
}

/// Record a failed attempt (error or empty output)
pub fn record_failed_attempt(tenant_id: &str, reason: &'static str) {
    counter!(
        "rtsp_snapshots_failed_attempts_total",
        "tenant" => tenant_id.to_string(),
        "reason" => reason
    )
    .increment(1);
}

/// Record a camera whose preview was written
pub fn record_captured(tenant_id: &str, bytes: u64) {
    counter!(
        "rtsp_snapshots_captured_total",
        "tenant" => tenant_id.to_string()
    )
    .increment(1);
    histogram!("rtsp_snapshots_capture_bytes").record(bytes as f64);
}

/// Record a camera that exhausted its attempts
pub fn record_exhausted(tenant_id: &str) {
    counter!(
        "rtsp_snapshots_cameras_exhausted_total",
        "tenant" => tenant_id.to_string()
    )
    .increment(1);
}

/// Record the number of active cameras at the start of a run
pub fn record_active_cameras(count: usize) {
    gauge!("rtsp_snapshots_cameras_active").set(count as f64);
}

/// Record how many error-log entries a run produced
pub fn record_log_entries(count: usize) {
    counter!("rtsp_snapshots_log_entries_total").increment(count as u64);
}

/// Run metrics aggregator
///
/// Aggregates per-camera outcomes in memory for the run summary.
#[derive(Debug, Clone, Default)]
pub struct RunMetricsAggregator {
    /// Cameras with a fresh preview
    pub captured: u64,

    /// Cameras that exhausted their attempts
    pub exhausted: u64,

    /// Capture attempts across all cameras
    pub total_attempts: u64,

    /// Preview size statistics (bytes)
    pub bytes_stats: RunningStats,

    /// Attempts needed by successful cameras
    pub attempts_stats: RunningStats,

    /// Wall time per camera (ms)
    pub camera_ms_stats: RunningStats,
}

impl RunMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_captured(&mut self, attempts: u32, bytes: u64, elapsed_ms: f64) {
        self.captured += 1;
        self.total_attempts += u64::from(attempts);
        self.bytes_stats.push(bytes as f64);
        self.attempts_stats.push(f64::from(attempts));
        self.camera_ms_stats.push(elapsed_ms);
    }

    pub fn record_exhausted(&mut self, attempts: u32, elapsed_ms: f64) {
        self.exhausted += 1;
        self.total_attempts += u64::from(attempts);
        self.camera_ms_stats.push(elapsed_ms);
    }

    /// Build the summary report
    pub fn summary(&self) -> MetricsSummary {
        let cameras = self.captured + self.exhausted;
        MetricsSummary {
            cameras,
            captured: self.captured,
            exhausted: self.exhausted,
            total_attempts: self.total_attempts,
            success_rate: if cameras > 0 {
                self.captured as f64 / cameras as f64 * 100.0
            } else {
                0.0
            },
            preview_bytes: StatsSummary::from(&self.bytes_stats),
            attempts_to_success: StatsSummary::from(&self.attempts_stats),
            camera_ms: StatsSummary::from(&self.camera_ms_stats),
        }
    }
}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub cameras: u64,
    pub captured: u64,
    pub exhausted: u64,
    pub total_attempts: u64,
    pub success_rate: f64,
    pub preview_bytes: StatsSummary,
    pub attempts_to_success: StatsSummary,
    pub camera_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Snapshot Run Summary ===")?;
        writeln!(f, "Cameras: {}", self.cameras)?;
        writeln!(
            f,
            "Captured: {} ({:.2}%)",
            self.captured, self.success_rate
        )?;
        writeln!(f, "Exhausted: {}", self.exhausted)?;
        writeln!(f, "Attempts: {}", self.total_attempts)?;
        writeln!(f, "Preview size (bytes): {}", self.preview_bytes)?;
        writeln!(f, "Attempts to success: {}", self.attempts_to_success)?;
        writeln!(f, "Time per camera (ms): {}", self.camera_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online mean / variance / range (Welford's algorithm)
///
/// Constant memory regardless of how many cameras a run covers. Before the
/// first sample every accessor reports 0.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Fold one sample in.
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
            return;
        }

        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Samples seen so far
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n - 1), 0 below two samples
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest sample
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample
    pub fn max(&self) -> f64 {
        self.max
    }
}
