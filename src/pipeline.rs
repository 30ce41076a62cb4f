// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! One-shot pipeline: generate, export, analyze, chart.

use crate::charts::ChartBuilder;
use crate::config::PipelineConfig;
use crate::dataset::SensorDataset;
use crate::error::Result;
use crate::generator::SyntheticSensorGenerator;
use crate::report::AnalysisReport;
use std::path::{Path, PathBuf};

/// CSV export file name.
pub const CSV_FILE_NAME: &str = "dados_sensores_iot.csv";

/// Analysis report file name.
pub const REPORT_FILE_NAME: &str = "relatorio_analise.json";

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: SensorDataset,
    pub report: AnalysisReport,
    /// `None` when the dataset was read rather than exported.
    pub csv_path: Option<PathBuf>,
    pub report_path: PathBuf,
    /// Empty when charts are disabled.
    pub chart_paths: Vec<PathBuf>,
}

impl RunOutput {
    /// All written files, in write order.
    pub fn files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = Vec::new();
        if let Some(csv) = &self.csv_path {
            files.push(csv);
        }
        files.push(&self.report_path);
        files.extend(self.chart_paths.iter().map(PathBuf::as_path));
        files
    }
}

/// Runs the full generate → export → analyze → chart sequence.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    charts: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            charts: true,
        })
    }

    /// Enable or disable chart documents.
    pub fn with_charts(mut self, enabled: bool) -> Self {
        self.charts = enabled;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate a dataset and write every output into `output_dir`.
    pub fn run(&self, output_dir: impl AsRef<Path>) -> Result<RunOutput> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let dataset = SyntheticSensorGenerator::new(self.config.generator.clone())?.generate()?;
        let csv_path = dir.join(CSV_FILE_NAME);
        dataset.to_csv(&csv_path)?;

        let mut output = self.analyze_into(dataset, dir)?;
        output.csv_path = Some(csv_path);
        Ok(output)
    }

    /// Analyze a previously exported CSV file.
    pub fn analyze_csv(
        &self,
        csv_path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<RunOutput> {
        let dir = output_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let dataset = SensorDataset::from_csv(csv_path)?;
        self.analyze_into(dataset, dir)
    }

    fn analyze_into(&self, dataset: SensorDataset, dir: &Path) -> Result<RunOutput> {
        let report = AnalysisReport::analyze(&dataset, &self.config.analysis)?;
        let report_path = dir.join(REPORT_FILE_NAME);
        report.to_json_file(&report_path)?;
        log::info!("Report written to {}", report_path.display());

        let chart_paths = if self.charts {
            let builder =
                ChartBuilder::new(&dataset, &report, &self.config.analysis, &self.config.style)?;
            let paths = builder.write_all(dir)?;
            log::info!("{} charts written to {}", paths.len(), dir.display());
            paths
        } else {
            Vec::new()
        };

        Ok(RunOutput {
            dataset,
            report,
            csv_path: None,
            report_path,
            chart_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::error::SynthError;

    fn seeded(samples: usize) -> PipelineConfig {
        PipelineConfig {
            generator: GeneratorConfig::new()
                .with_sample_count(samples)
                .with_seed(7),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_run_writes_everything() {
        let dir = tempfile::tempdir().unwrap();
        let output = Pipeline::new(seeded(100)).unwrap().run(dir.path()).unwrap();

        assert_eq!(output.dataset.len(), 100);
        assert_eq!(output.chart_paths.len(), 7);
        assert_eq!(output.files().len(), 9);
        for file in output.files() {
            assert!(file.exists(), "missing {}", file.display());
        }
        assert_eq!(
            output.csv_path.as_deref(),
            Some(dir.path().join(CSV_FILE_NAME).as_path())
        );
    }

    #[test]
    fn test_run_without_charts() {
        let dir = tempfile::tempdir().unwrap();
        let output = Pipeline::new(seeded(50))
            .unwrap()
            .with_charts(false)
            .run(dir.path())
            .unwrap();
        assert!(output.chart_paths.is_empty());
        assert!(!dir.path().join("dashboard_completo.json").exists());
    }

    #[test]
    fn test_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("run1");
        Pipeline::new(seeded(10))
            .unwrap()
            .with_charts(false)
            .run(&nested)
            .unwrap();
        assert!(nested.join(REPORT_FILE_NAME).exists());
    }

    #[test]
    fn test_analyze_csv_matches_run() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(seeded(120)).unwrap().with_charts(false);
        let first = pipeline.run(dir.path()).unwrap();

        let again_dir = dir.path().join("again");
        let csv = first.csv_path.clone().unwrap();
        let second = pipeline.analyze_csv(&csv, &again_dir).unwrap();

        assert!(second.csv_path.is_none());
        assert_eq!(second.dataset.readings(), first.dataset.readings());
        assert_eq!(second.report.alerts, first.report.alerts);
        assert_eq!(second.report.summary, first.report.summary);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Pipeline::new(seeded(0)).unwrap_err();
        assert!(matches!(err, SynthError::InvalidArgument { .. }));
    }
}
