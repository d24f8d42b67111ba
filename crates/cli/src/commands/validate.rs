//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    root: String,
    workers: usize,
    max_attempts: u32,
    database: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    root: blueprint.storage.root.display().to_string(),
                    workers: blueprint.snapshot.workers,
                    max_attempts: blueprint.snapshot.max_attempts,
                    database: format!(
                        "{}@{}:{}/{}",
                        blueprint.database.user,
                        blueprint.database.host,
                        blueprint.database.port,
                        blueprint.database.name
                    ),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &contracts::SnapshotBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.storage.root.is_relative() {
        warnings.push(format!(
            "storage.root '{}' is relative - resolved against the working directory",
            blueprint.storage.root.display()
        ));
    }

    if blueprint.database.password.is_empty() {
        warnings.push(
            "database.password is empty - set RTSP_SNAPSHOTS_DB_PASSWORD if the directory needs one"
                .to_string(),
        );
    }

    if blueprint.snapshot.capture_timeout_secs == 0 {
        warnings.push(
            "snapshot.capture_timeout_secs is 0 - a stalled stream holds its worker until the tool gives up"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Root: {}", summary.root);
            println!("  Workers: {}", summary.workers);
            println!("  Max attempts: {}", summary.max_attempts);
            println!("  Database: {}", summary.database);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_config(dir: &std::path::Path, body: &str) -> PathBuf {
        let path = dir.join("snap.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let result = validate_config(&ValidateArgs {
            config: PathBuf::from("/nonexistent/snap.toml"),
            json: false,
        });
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_valid_config_with_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[storage]\nroot = \"/srv/www\"\n[database]\nuser = \"u\"\nname = \"n\"\n",
        );

        let result = validate_config(&ValidateArgs { config, json: true });

        assert!(result.valid);
        let summary = result.summary.unwrap();
        assert_eq!(summary.workers, 5);
        assert_eq!(summary.database, "u@localhost:3306/n");
        let warnings = result.warnings.unwrap();
        assert!(warnings.iter().any(|w| w.contains("database.password")));
    }

    #[test]
    fn test_invalid_config_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            "[storage]\nroot = \"/srv\"\n[snapshot]\nworkers = 0\n[database]\nuser = \"u\"\nname = \"n\"\n",
        );

        let result = validate_config(&ValidateArgs { config, json: false });

        assert!(!result.valid);
        assert!(result.error.unwrap().contains("workers"));
    }
}
