//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::SnapshotBlueprint;
use serde::Serialize;
use tracing::info;

use super::load_blueprint;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    layout: LayoutInfo,
    snapshot: SnapshotInfo,
    capture: CaptureInfo,
    database: DatabaseInfo,
}

#[derive(Serialize)]
struct LayoutInfo {
    root: String,
    previews: String,
    logs: String,
}

#[derive(Serialize)]
struct SnapshotInfo {
    workers: usize,
    max_attempts: u32,
    capture_timeout_secs: u64,
    run_timeout_secs: u64,
}

#[derive(Serialize)]
struct CaptureInfo {
    program: String,
    rtsp_transport: String,
    frame_rate: u32,
}

#[derive(Serialize)]
struct DatabaseInfo {
    host: String,
    port: u16,
    user: String,
    password: String,
    name: String,
    charset: String,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_blueprint(&args.config)?;
    let info = build_config_info(&blueprint);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(empty)".to_string()
    } else {
        "********".to_string()
    }
}

fn build_config_info(blueprint: &SnapshotBlueprint) -> ConfigInfo {
    let layout = blueprint.layout();
    let db = &blueprint.database;

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        layout: LayoutInfo {
            root: layout.root().display().to_string(),
            previews: layout.preview_root().display().to_string(),
            logs: layout.log_dir().display().to_string(),
        },
        snapshot: SnapshotInfo {
            workers: blueprint.snapshot.workers,
            max_attempts: blueprint.snapshot.max_attempts,
            capture_timeout_secs: blueprint.snapshot.capture_timeout_secs,
            run_timeout_secs: blueprint.snapshot.run_timeout_secs,
        },
        capture: CaptureInfo {
            program: blueprint.capture.program.clone(),
            rtsp_transport: blueprint.capture.rtsp_transport.clone(),
            frame_rate: blueprint.capture.frame_rate,
        },
        database: DatabaseInfo {
            host: db.host.clone(),
            port: db.port,
            user: db.user.clone(),
            password: mask(&db.password),
            name: db.name.clone(),
            charset: db.charset.clone(),
        },
    }
}

fn seconds_or_off(secs: u64) -> String {
    if secs == 0 {
        "off".to_string()
    } else {
        format!("{secs}s")
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("=== RTSP Snapshots Configuration ({}) ===\n", info.version);

    println!("Layout");
    println!("   ├─ Root: {}", info.layout.root);
    println!("   ├─ Previews: {}/<tenant>/<name>.webp", info.layout.previews);
    println!("   └─ Logs: {}/<DD-MM-YYYY>.txt", info.layout.logs);

    println!("\nSnapshot");
    println!("   ├─ Workers: {}", info.snapshot.workers);
    println!("   ├─ Max attempts: {}", info.snapshot.max_attempts);
    println!(
        "   ├─ Capture timeout: {}",
        seconds_or_off(info.snapshot.capture_timeout_secs)
    );
    println!(
        "   └─ Run timeout: {}",
        seconds_or_off(info.snapshot.run_timeout_secs)
    );

    println!("\nCapture");
    println!("   ├─ Program: {}", info.capture.program);
    println!("   ├─ RTSP transport: {}", info.capture.rtsp_transport);
    println!("   └─ Frame rate: {}", info.capture.frame_rate);

    let db = &info.database;
    println!("\nDatabase");
    println!("   ├─ Server: {}:{}", db.host, db.port);
    println!("   ├─ User: {}", db.user);
    println!("   ├─ Password: {}", db.password);
    println!("   ├─ Name: {}", db.name);
    println!("   └─ Charset: {}", db.charset);

    println!();
}
