//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// RTSP Snapshots - refresh camera preview images from their live streams
#[derive(Parser, Debug)]
#[command(
    name = "rtsp-snapshots",
    author,
    version,
    about = "Refresh camera preview images from RTSP streams",
    long_about = "Reads the active cameras from the camera directory, grabs one frame \n\
                  per camera with ffmpeg and stores it as the tenant's preview image.\n\n\
                  Without a subcommand, performs exactly one run.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "RTSP_SNAPSHOTS_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "RTSP_SNAPSHOTS_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Arguments for the implicit `run`
    #[command(flatten)]
    pub run: RunArgs,
}

impl Cli {
    /// Default level for the log filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture one preview per active camera (default)
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the effective configuration and output layout
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "rtsp-snapshots.toml",
        env = "RTSP_SNAPSHOTS_CONFIG"
    )]
    pub config: PathBuf,

    /// Override the shared storage root
    #[arg(long, env = "RTSP_SNAPSHOTS_ROOT")]
    pub root: Option<PathBuf>,

    /// Override the number of concurrent workers
    #[arg(long, env = "RTSP_SNAPSHOTS_WORKERS")]
    pub workers: Option<usize>,

    /// Override the camera directory host
    #[arg(long, env = "RTSP_SNAPSHOTS_DB_HOST")]
    pub db_host: Option<String>,

    /// Override the camera directory password
    #[arg(long, env = "RTSP_SNAPSHOTS_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "RTSP_SNAPSHOTS_METRICS_PORT")]
    pub metrics_port: u16,

    /// List the cameras and target paths without capturing or logging
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(
        short,
        long,
        default_value = "rtsp-snapshots.toml",
        env = "RTSP_SNAPSHOTS_CONFIG"
    )]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "rtsp-snapshots.toml",
        env = "RTSP_SNAPSHOTS_CONFIG"
    )]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
