//! # Integration Tests
//!
//! End-to-end scenarios without a database or ffmpeg.
//!
//! Covers:
//! - Contract smoke tests
//! - Full runs over in-memory directories and a scripted capturer
//! - Failure isolation between concurrent cameras

#[cfg(test)]
mod contract_tests {
    use contracts::{sanitize, OutputLayout};

    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }

    #[test]
    fn test_layout_and_sanitizer_agree() {
        let layout = OutputLayout::new("/srv/www");
        let path = layout.image_path("42", &sanitize("Main Gate (v2.1)"));
        assert_eq!(
            path.to_str().unwrap(),
            "/srv/www/img/cameras_preview/42/main_gate_-v2+1-.webp"
        );
    }

    #[test]
    fn test_example_config_loads() {
        let blueprint = config_loader::ConfigLoader::load_from_str(
            r#"
            [storage]
            root = "/srv/www/site"

            [snapshot]
            workers = 5
            max_attempts = 3

            [capture]
            program = "ffmpeg"
            rtsp_transport = "tcp"
            frame_rate = 3

            [database]
            host = "localhost"
            port = 3306
            user = "snapshots"
            password = ""
            name = "cameras"
            "#,
            config_loader::ConfigFormat::Toml,
        )
        .unwrap();
        assert_eq!(blueprint.layout().root().to_str(), Some("/srv/www/site"));
        assert!(blueprint.snapshot.run_timeout().is_none());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    use camera_directory::{StaticDirectory, UnavailableDirectory};
    use contracts::{CameraRecord, OutputLayout};
    use snapshot_engine::{CoordinatorConfig, JobSummary, ScriptStep, ScriptedCapturer, SnapshotJob};

    fn read_log(summary: &JobSummary) -> String {
        summary
            .log_path
            .as_ref()
            .map(|path| std::fs::read_to_string(path).unwrap())
            .unwrap_or_default()
    }

    /// Three cameras across two tenants, one of them never produces output.
    #[tokio::test]
    async fn test_e2e_mixed_run() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let directory = StaticDirectory::new(vec![
            CameraRecord::new("tenant_a", "Front Door", "rtsp://a/front"),
            CameraRecord::new("tenant_a", "Parking Lot (East)", "rtsp://a/parking"),
            CameraRecord::new("tenant_b", "Lobby v1.2", "rtsp://b/lobby"),
        ]);

        let capturer = Arc::new(ScriptedCapturer::new());
        capturer.script("rtsp://a/front", vec![ScriptStep::Write(4096)]);
        capturer.script("rtsp://a/parking", vec![ScriptStep::Empty]);
        capturer.script(
            "rtsp://b/lobby",
            vec![ScriptStep::Fail("Connection timed out".into()), ScriptStep::Write(2048)],
        );

        let summary = SnapshotJob::new(directory, Arc::clone(&capturer), OutputLayout::new(root))
            .run()
            .await
            .unwrap();

        // Previews at their sanitized paths
        let front = root.join("img/cameras_preview/tenant_a/front_door.webp");
        let lobby = root.join("img/cameras_preview/tenant_b/lobby_v1+2.webp");
        let parking = root.join("img/cameras_preview/tenant_a/parking_lot_-east-.webp");
        assert_eq!(std::fs::metadata(&front).unwrap().len(), 4096);
        assert_eq!(std::fs::metadata(&lobby).unwrap().len(), 2048);
        assert!(!parking.exists());

        // Retry budget per camera
        assert_eq!(capturer.calls("rtsp://a/front"), 1);
        assert_eq!(capturer.calls("rtsp://a/parking"), 3);
        assert_eq!(capturer.calls("rtsp://b/lobby"), 2);

        assert_eq!(summary.report.captured(), 2);
        assert_eq!(summary.report.exhausted(), 1);
        assert_eq!(summary.metrics.total_attempts, 6);

        // Log: three empty attempts plus the give-up line, one lobby error
        let log = read_log(&summary);
        let parking_lines = log.lines().filter(|l| l.contains("parking_lot_-east-")).count();
        assert_eq!(parking_lines, 4, "log:\n{log}");
        assert!(log.contains("GAVE UP on parking_lot_-east- (tenant_a) after 3 attempts"));
        assert!(log.contains("lobby_v1+2 (tenant_b) attempt 1/3: "));
        assert!(log.contains("Connection timed out"));
        assert_eq!(summary.log_entries, 5);
    }

    #[tokio::test]
    async fn test_e2e_directory_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let capturer = Arc::new(ScriptedCapturer::new());

        let summary = SnapshotJob::new(
            UnavailableDirectory::new("Can't connect to MySQL server on 'db' (111)"),
            Arc::clone(&capturer),
            OutputLayout::new(dir.path()),
        )
        .run()
        .await
        .unwrap();

        assert_eq!(capturer.total_calls(), 0);
        assert_eq!(summary.report.total, 0);
        assert!(!dir.path().join("img").exists());

        let log = read_log(&summary);
        assert_eq!(log.lines().count(), 1);
        assert!(log.contains("DB ERROR: "));
        assert!(log.contains("(111)"));
    }

    /// Records whose tenant would resolve outside the preview tree.
    #[tokio::test]
    async fn test_e2e_unmappable_records_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let capturer = Arc::new(ScriptedCapturer::new());
        capturer.script("rtsp://ok", vec![ScriptStep::Write(16)]);

        let summary = SnapshotJob::new(
            StaticDirectory::new(vec![
                CameraRecord::new("t1", "Gate", "rtsp://ok"),
                CameraRecord::new(outside.path().to_str().unwrap(), "Gate", "rtsp://abs"),
                CameraRecord::new("", "Gate", "rtsp://null"),
            ]),
            Arc::clone(&capturer),
            OutputLayout::new(dir.path()),
        )
        .run()
        .await
        .unwrap();

        assert_eq!(summary.report.captured(), 1);
        assert_eq!(summary.report.rejected, 2);
        assert_eq!(capturer.calls("rtsp://abs") + capturer.calls("rtsp://null"), 0);
        assert_eq!(std::fs::read_dir(outside.path()).unwrap().count(), 0);
        assert!(!dir.path().join("img/cameras_preview/gate.webp").exists());

        let log = read_log(&summary);
        assert_eq!(log.lines().filter(|l| l.contains("ERROR processing gate")).count(), 2);
    }

    #[tokio::test]
    async fn test_e2e_empty_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();

        let summary = SnapshotJob::new(
            StaticDirectory::default(),
            Arc::new(ScriptedCapturer::new()),
            OutputLayout::new(dir.path()),
        )
        .run()
        .await
        .unwrap();

        assert_eq!(summary.report.total, 0);
        assert!(summary.log_path.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    /// Concurrent failures each land in the log exactly once.
    #[tokio::test]
    async fn test_e2e_concurrent_failures_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let n = 12;

        let cameras: Vec<_> = (0..n)
            .map(|i| CameraRecord::new(format!("t{}", i % 4), format!("Cam {i}"), format!("rtsp://cam/{i}")))
            .collect();
        let capturer = Arc::new(ScriptedCapturer::with_delay(Duration::from_millis(5)));
        for i in 0..n {
            capturer.script(&format!("rtsp://cam/{i}"), vec![ScriptStep::Fail(format!("boom {i}"))]);
        }

        let summary = SnapshotJob::new(
            StaticDirectory::new(cameras),
            Arc::clone(&capturer),
            OutputLayout::new(dir.path()),
        )
        .with_max_attempts(1)
        .with_coordinator(CoordinatorConfig {
            workers: 5,
            run_timeout: None,
        })
        .run()
        .await
        .unwrap();

        assert_eq!(summary.report.exhausted(), n);
        // One attempt failure plus one give-up line per camera
        assert_eq!(summary.log_entries, 2 * n);

        let log = read_log(&summary);
        for i in 0..n {
            let needle = format!("boom {i}");
            assert_eq!(
                log.lines().filter(|l| l.ends_with(&needle)).count(),
                1,
                "camera {i} in log:\n{log}"
            );
        }
    }

    #[tokio::test]
    async fn test_e2e_stale_previews_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let tenant_dir = layout.tenant_dir("t1");
        std::fs::create_dir_all(&tenant_dir).unwrap();
        std::fs::write(tenant_dir.join("gate.webp"), b"old").unwrap();
        std::fs::write(tenant_dir.join("yard.webp"), b"old").unwrap();

        let capturer = Arc::new(ScriptedCapturer::new());
        capturer.script("rtsp://gate", vec![ScriptStep::Write(64)]);
        capturer.script("rtsp://yard", vec![ScriptStep::Fail("404 Not Found".into())]);

        SnapshotJob::new(
            StaticDirectory::new(vec![
                CameraRecord::new("t1", "Gate", "rtsp://gate"),
                CameraRecord::new("t1", "Yard", "rtsp://yard"),
            ]),
            capturer,
            layout,
        )
        .run()
        .await
        .unwrap();

        assert_eq!(std::fs::metadata(tenant_dir.join("gate.webp")).unwrap().len(), 64);
        assert!(!tenant_dir.join("yard.webp").exists());
    }

    #[tokio::test]
    async fn test_e2e_runs_on_same_day_share_log() {
        let dir = tempfile::tempdir().unwrap();
        let directory = StaticDirectory::new(vec![CameraRecord::new("t", "Dead", "rtsp://dead")]);

        let mut paths = BTreeSet::new();
        for _ in 0..2 {
            let summary = SnapshotJob::new(
                directory.clone(),
                Arc::new(ScriptedCapturer::new()),
                OutputLayout::new(dir.path()),
            )
            .with_max_attempts(1)
            .run()
            .await
            .unwrap();
            paths.insert(summary.log_path.unwrap());
        }

        // Two files only if the runs straddled midnight
        let log: String = paths
            .iter()
            .map(|p| std::fs::read_to_string(p).unwrap())
            .collect();
        assert_eq!(log.lines().filter(|l| l.contains("GAVE UP on dead")).count(), 2);
    }
}
