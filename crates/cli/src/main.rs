//! # RTSP Snapshots CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - One snapshot run per invocation
//! - Effective configuration display

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_snapshots, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: None,
        default_log_level: cli.log_level().to_string(),
    })?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "RTSP Snapshots starting"
    );

    let result = match &cli.command {
        Some(Commands::Run(args)) => run_snapshots(args).await,
        None => run_snapshots(&cli.run).await,
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Info(args)) => run_info(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}
