//! SnapshotBlueprint - Config Loader output
//!
//! Everything a run needs: shared root, worker pool, capture profile and
//! directory connection parameters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::OutputLayout;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Shared filesystem root
    pub storage: StorageConfig,

    /// Worker pool and retry policy
    #[serde(default)]
    pub snapshot: SnapshotConfig,

    /// Frame-capture tool profile
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Camera directory connection
    pub database: DatabaseConfig,
}

impl SnapshotBlueprint {
    /// Output layout rooted at `storage.root`
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.storage.root)
    }
}

/// Shared filesystem root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root under which `img/` and `logs/` live
    pub root: PathBuf,
}

/// Worker pool and retry policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Number of concurrent acquisition workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Attempts per camera before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Per-attempt limit on the capture process, 0 = none
    #[serde(default)]
    pub capture_timeout_secs: u64,

    /// Overall run deadline, 0 = none
    #[serde(default)]
    pub run_timeout_secs: u64,
}

impl SnapshotConfig {
    pub fn capture_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.capture_timeout_secs)
    }

    pub fn run_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.run_timeout_secs)
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_attempts: default_max_attempts(),
            capture_timeout_secs: 0,
            run_timeout_secs: 0,
        }
    }
}

fn default_workers() -> usize {
    5
}

fn default_max_attempts() -> u32 {
    3
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Frame-capture tool profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Capture program (looked up on PATH unless absolute)
    #[serde(default = "default_program")]
    pub program: String,

    /// RTSP transport forced on the input
    #[serde(default = "default_rtsp_transport")]
    pub rtsp_transport: String,

    /// Frame rate hint for the single output frame
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            rtsp_transport: default_rtsp_transport(),
            frame_rate: default_frame_rate(),
        }
    }
}

fn default_program() -> String {
    "ffmpeg".to_string()
}

fn default_rtsp_transport() -> String {
    "tcp".to_string()
}

fn default_frame_rate() -> u32 {
    3
}

/// RTSP transports accepted by the capture profile
pub const RTSP_TRANSPORTS: &[&str] = &["tcp", "udp", "udp_multicast", "http", "https"];

/// Camera directory connection
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Database (schema) name
    pub name: String,

    #[serde(default = "default_db_charset")]
    pub charset: String,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_charset() -> String {
    "utf8mb4".to_string()
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("charset", &self.charset)
            .finish()
    }
}
