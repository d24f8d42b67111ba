//! `run` command implementation.

use anyhow::{Context, Result};
use camera_directory::MySqlDirectory;
use contracts::{CameraDirectory, SnapshotBlueprint, SnapshotTask};
use tracing::{info, warn};

use super::load_blueprint;
use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{SnapshotRun, SnapshotRunConfig};

/// Execute the `run` command
pub async fn run_snapshots(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    let mut blueprint = load_blueprint(&args.config)?;
    apply_overrides(&mut blueprint, args)?;

    info!(
        root = %blueprint.storage.root.display(),
        workers = blueprint.snapshot.workers,
        max_attempts = blueprint.snapshot.max_attempts,
        db_host = %blueprint.database.host,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - listing cameras, nothing will be captured");
        return dry_run(&blueprint).await;
    }

    let run = SnapshotRun::new(SnapshotRunConfig {
        blueprint,
        metrics_port: (args.metrics_port != 0).then_some(args.metrics_port),
    });

    let stats = run
        .run(shutdown_signal())
        .await
        .context("Snapshot run failed")?;
    info!(
        cameras = stats.cameras,
        captured = stats.captured,
        exhausted = stats.exhausted,
        log_entries = stats.log_entries,
        duration_secs = stats.duration.as_secs_f64(),
        "Snapshot run completed"
    );
    stats.print_summary();

    if stats.interrupted {
        warn!("Received shutdown signal, run interrupted");
        return Err(CliError::Interrupted.into());
    }

    Ok(())
}

/// Apply command-line overrides and re-validate
fn apply_overrides(blueprint: &mut SnapshotBlueprint, args: &RunArgs) -> Result<()> {
    if let Some(ref root) = args.root {
        info!(root = %root.display(), "Overriding storage root from CLI");
        blueprint.storage.root = root.clone();
    }
    if let Some(workers) = args.workers {
        info!(workers, "Overriding worker count from CLI");
        blueprint.snapshot.workers = workers;
    }
    if let Some(ref host) = args.db_host {
        info!(host = %host, "Overriding database host from CLI");
        blueprint.database.host = host.clone();
    }
    if let Some(ref password) = args.db_password {
        blueprint.database.password = password.clone();
    }

    config_loader::ConfigLoader::validate(blueprint).map_err(CliError::InvalidOverride)?;
    Ok(())
}

/// List what a run would capture
async fn dry_run(blueprint: &SnapshotBlueprint) -> Result<()> {
    let directory = MySqlDirectory::new(&blueprint.database);
    let cameras = directory
        .list_active_cameras()
        .await
        .context("Camera directory unavailable")?;

    let layout = blueprint.layout();
    println!("\n=== Dry Run ===\n");
    println!("Root: {}", layout.root().display());
    println!("Log:  {}", layout.log_dir().display());
    println!("\nActive cameras ({}):", cameras.len());
    for camera in cameras {
        let label = format!("[{}] {}", camera.tenant_id, camera.display_name);
        match SnapshotTask::new(camera, &layout) {
            Ok(task) => println!("  - {} -> {}", label, task.target_path.display()),
            Err(e) => println!("  - {} -> skipped: {}", label, e),
        }
    }
    println!();

    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn blueprint() -> SnapshotBlueprint {
        config_loader::ConfigLoader::load_from_str(
            r#"
            [storage]
            root = "/srv/www"

            [database]
            user = "snap"
            name = "cams"
            "#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap()
    }

    fn args() -> RunArgs {
        RunArgs {
            config: PathBuf::from("unused.toml"),
            root: None,
            workers: None,
            db_host: None,
            db_password: None,
            metrics_port: 0,
            dry_run: false,
        }
    }

    #[test]
    fn test_overrides_applied() {
        let mut bp = blueprint();
        let args = RunArgs {
            root: Some(PathBuf::from("/mnt/share")),
            workers: Some(9),
            db_host: Some("db.internal".into()),
            db_password: Some("s3cret".into()),
            ..args()
        };

        apply_overrides(&mut bp, &args).unwrap();

        assert_eq!(bp.storage.root, PathBuf::from("/mnt/share"));
        assert_eq!(bp.snapshot.workers, 9);
        assert_eq!(bp.database.host, "db.internal");
        assert_eq!(bp.database.password, "s3cret");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut bp = blueprint();
        let args = RunArgs {
            workers: Some(0),
            ..args()
        };

        let err = apply_overrides(&mut bp, &args).unwrap_err();
        assert!(err.to_string().contains("Invalid override"), "got: {err}");
    }
}
