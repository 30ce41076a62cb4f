//! End-to-end tests: generate, export, re-import, analyze.

use approx::assert_relative_eq;
use sensorsynth::*;
use std::fs;

fn seeded_config(samples: usize, seed: u64) -> PipelineConfig {
    PipelineConfig {
        generator: GeneratorConfig::new()
            .with_sample_count(samples)
            .with_seed(seed),
        ..PipelineConfig::default()
    }
}

#[test]
fn test_default_run_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let output = Pipeline::new(seeded_config(250, 42))
        .unwrap()
        .run(dir.path())
        .unwrap();

    let csv = fs::read_to_string(dir.path().join(CSV_FILE_NAME)).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next().unwrap(), CSV_HEADER.join(","));
    assert_eq!(lines.count(), 250);

    for name in CHART_NAMES {
        assert!(dir.path().join(format!("{}.json", name)).exists());
    }

    let report = AnalysisReport::from_json_file(dir.path().join(REPORT_FILE_NAME)).unwrap();
    assert_eq!(report.summary.sample_count, 250);
    assert_eq!(report.anomalies.total, 25);
    assert_eq!(report.seed, Some(42));
    assert_eq!(report.alerts, output.report.alerts);
}

#[test]
fn test_csv_reimport_preserves_readings() {
    let dir = tempfile::tempdir().unwrap();
    let output = Pipeline::new(seeded_config(400, 9))
        .unwrap()
        .with_charts(false)
        .run(dir.path())
        .unwrap();

    let reloaded = SensorDataset::from_csv(dir.path().join(CSV_FILE_NAME)).unwrap();
    assert_eq!(reloaded.len(), 400);
    assert_eq!(reloaded.interval_seconds(), 2);
    assert_eq!(reloaded.readings(), output.dataset.readings());

    // Ground truth does not survive a CSV round trip
    assert!(reloaded.anomalies().is_empty());

    let original = output.dataset.vibration_magnitudes();
    for (a, b) in reloaded.vibration_magnitudes().iter().zip(&original) {
        assert_relative_eq!(*a, *b);
    }
}

#[test]
fn test_anomaly_rows_show_their_effects() {
    let dataset = SyntheticSensorGenerator::new(GeneratorConfig::new().with_seed(5))
        .unwrap()
        .generate()
        .unwrap();

    for event in dataset.anomalies() {
        let r = &dataset.readings()[event.row];
        match event.effect {
            AnomalyEffect::TemperatureSpike { offset_c } => {
                assert!((8.0..=15.0).contains(&offset_c));
            }
            AnomalyEffect::VibrationShock {
                offset_x_mg,
                offset_y_mg,
            } => {
                assert!((300.0..=800.0).contains(&offset_x_mg));
                assert!((300.0..=800.0).contains(&offset_y_mg));
            }
            AnomalyEffect::LightOcclusion { level_pct } => {
                assert!((0.0..=15.0).contains(&level_pct));
                assert!(r.light <= 15.0);
            }
        }
    }
}

#[test]
fn test_config_file_drives_run() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("pipeline.json");
    let mut config = seeded_config(90, 11);
    config.generator.interval_seconds = 5;
    config.analysis.thresholds.high_temperature = 20.0;
    config.to_json_file(&config_path).unwrap();

    let loaded = PipelineConfig::from_json_file(&config_path).unwrap();
    assert_eq!(loaded, config);

    let out_dir = dir.path().join("out");
    let output = Pipeline::new(loaded)
        .unwrap()
        .with_charts(false)
        .run(&out_dir)
        .unwrap();

    assert_eq!(output.dataset.duration_secs(), 89 * 5);
    // Nearly every reading sits above 20 °C
    assert!(output.report.alert_count(AlertKind::HighTemperature) > 45);
}

#[test]
fn test_same_seed_same_csv() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(seeded_config(300, 123))
        .unwrap()
        .with_charts(false);
    pipeline.run(a.path()).unwrap();
    pipeline.run(b.path()).unwrap();

    let csv_a = fs::read(a.path().join(CSV_FILE_NAME)).unwrap();
    let csv_b = fs::read(b.path().join(CSV_FILE_NAME)).unwrap();
    assert_eq!(csv_a, csv_b);
}

#[test]
fn test_unwritable_output_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"x").unwrap();

    let err = Pipeline::new(seeded_config(10, 1))
        .unwrap()
        .run(blocker.join("sub"))
        .unwrap_err();
    assert!(matches!(err, SynthError::Io(_)));
}
