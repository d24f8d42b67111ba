//! Per-camera and per-run results

use std::path::PathBuf;
use std::time::Duration;

use contracts::SanitizedName;

use crate::acquirer::AcquireOutcome;

/// Result of one camera's acquisition
#[derive(Debug, Clone)]
pub struct CameraReport {
    pub tenant_id: String,
    pub name: SanitizedName,
    pub target_path: PathBuf,
    pub outcome: AcquireOutcome,
    pub elapsed: Duration,
}

/// Result of a whole coordinator run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One entry per camera that reached a terminal outcome
    pub cameras: Vec<CameraReport>,
    /// Cameras submitted
    pub total: usize,
    /// Workers used
    pub workers: usize,
    pub elapsed: Duration,
    /// Records skipped because they map to no preview path
    pub rejected: usize,
}

impl RunReport {
    pub fn new(cameras: Vec<CameraReport>, total: usize, workers: usize, elapsed: Duration) -> Self {
        Self {
            cameras,
            total,
            workers,
            elapsed,
            rejected: 0,
        }
    }

    pub fn with_rejected(mut self, rejected: usize) -> Self {
        self.rejected = rejected;
        self
    }

    pub fn captured(&self) -> usize {
        self.cameras.iter().filter(|c| c.outcome.is_captured()).count()
    }

    pub fn exhausted(&self) -> usize {
        self.cameras.len() - self.captured()
    }

    /// Cameras that never reached a terminal outcome (aborted or lost to a panic)
    pub fn incomplete(&self) -> usize {
        self.total.saturating_sub(self.cameras.len())
    }

    pub fn attempts(&self) -> u64 {
        self.cameras
            .iter()
            .map(|c| u64::from(c.outcome.attempts()))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::sanitize;

    fn camera(outcome: AcquireOutcome) -> CameraReport {
        CameraReport {
            tenant_id: "t".into(),
            name: sanitize("Cam"),
            target_path: PathBuf::from("/x/cam.webp"),
            outcome,
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn test_counts() {
        let report = RunReport::new(
            vec![
                camera(AcquireOutcome::Captured { attempts: 1, bytes: 9 }),
                camera(AcquireOutcome::Captured { attempts: 2, bytes: 9 }),
                camera(AcquireOutcome::Exhausted { attempts: 3 }),
            ],
            4,
            5,
            Duration::from_secs(1),
        );
        assert_eq!(report.captured(), 2);
        assert_eq!(report.exhausted(), 1);
        assert_eq!(report.incomplete(), 1);
        assert_eq!(report.attempts(), 6);
    }
}
