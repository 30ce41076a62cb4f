// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Analysis report.
//!
//! Summary statistics, threshold alerts, the temperature/humidity relation and
//! the anomaly ground truth for one dataset. Serializes to JSON and renders
//! as a console summary through `Display`.

use crate::alerts::{AlertKind, Alerts};
use crate::anomalies::{AnomalyEvent, AnomalyKind};
use crate::config::{AlertThresholds, AnalysisConfig};
use crate::dataset::{Column, SensorDataset};
use crate::error::{Result, SynthError};
use crate::stats::{ColumnStats, CorrelationMatrix, LinearFit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Headline statistics of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub sample_count: usize,
    pub interval_seconds: u64,
    /// Last timestamp, in minutes.
    pub period_minutes: f64,
    pub temperature: ColumnStats,
    pub humidity: ColumnStats,
    pub light: ColumnStats,
    pub vibration: ColumnStats,
}

impl DatasetSummary {
    /// `None` for an empty dataset.
    pub fn compute(dataset: &SensorDataset) -> Option<Self> {
        Some(Self {
            sample_count: dataset.len(),
            interval_seconds: dataset.interval_seconds(),
            period_minutes: dataset.duration_secs() as f64 / 60.0,
            temperature: ColumnStats::of(dataset, Column::Temperature)?,
            humidity: ColumnStats::of(dataset, Column::Humidity)?,
            light: ColumnStats::of(dataset, Column::Light)?,
            vibration: ColumnStats::of(dataset, Column::VibrationMagnitude)?,
        })
    }
}

/// Injected anomalies, counted per kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalySummary {
    pub total: usize,
    pub temperature_spikes: usize,
    pub vibration_shocks: usize,
    pub light_occlusions: usize,
    pub events: Vec<AnomalyEvent>,
}

impl AnomalySummary {
    pub fn from_dataset(dataset: &SensorDataset) -> Self {
        Self {
            total: dataset.plan().len(),
            temperature_spikes: dataset.anomaly_count(AnomalyKind::TemperatureSpike),
            vibration_shocks: dataset.anomaly_count(AnomalyKind::VibrationShock),
            light_occlusions: dataset.anomaly_count(AnomalyKind::LightOcclusion),
            events: dataset.anomalies().to_vec(),
        }
    }
}

/// Full analysis of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub summary: DatasetSummary,
    pub thresholds: AlertThresholds,
    pub alerts: Alerts,
    /// Pearson r between temperature and humidity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_humidity_correlation: Option<f64>,
    /// Humidity as a linear function of temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_humidity_trend: Option<LinearFit>,
    pub correlations: CorrelationMatrix,
    pub anomalies: AnomalySummary,
}

impl AnalysisReport {
    /// Analyze `dataset`.
    pub fn analyze(dataset: &SensorDataset, config: &AnalysisConfig) -> Result<Self> {
        let summary = DatasetSummary::compute(dataset)
            .ok_or_else(|| SynthError::invalid("dataset", "dataset has no readings"))?;

        let temperature = dataset.column(Column::Temperature);
        let humidity = dataset.column(Column::Humidity);
        let correlations = CorrelationMatrix::standard(dataset);

        let report = Self {
            generated_at: Utc::now(),
            seed: dataset.metadata().seed,
            summary,
            thresholds: config.thresholds.clone(),
            alerts: Alerts::detect(dataset, &config.thresholds),
            temperature_humidity_correlation: correlations
                .get(Column::Temperature, Column::Humidity),
            temperature_humidity_trend: LinearFit::fit(&temperature, &humidity),
            correlations,
            anomalies: AnomalySummary::from_dataset(dataset),
        };

        log::debug!(
            "Analysis done: {} samples, temp/humidity r = {:?}",
            report.summary.sample_count,
            report.temperature_humidity_correlation
        );
        Ok(report)
    }

    pub fn alert_count(&self, kind: AlertKind) -> usize {
        self.alerts.count(kind)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save to JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// The statistics block shown on the dashboard.
    pub fn stats_block(&self) -> String {
        let s = &self.summary;
        let t = &self.thresholds;
        let mut out = String::new();
        out.push_str("GENERAL STATISTICS\n");
        out.push_str("──────────────────\n");
        out.push_str(&format!(
            "• Temperature: {:.1}°C (±{:.1})\n",
            s.temperature.mean, s.temperature.std_dev
        ));
        out.push_str(&format!(
            "• Humidity: {:.1}% (±{:.1})\n",
            s.humidity.mean, s.humidity.std_dev
        ));
        out.push_str(&format!(
            "• Light: {:.1}% (±{:.1})\n",
            s.light.mean, s.light.std_dev
        ));
        out.push_str(&format!(
            "• Vibration: {:.0}mg (±{:.0})\n",
            s.vibration.mean, s.vibration.std_dev
        ));
        out.push('\n');
        out.push_str("DETECTED ALERTS\n");
        out.push_str("───────────────\n");
        out.push_str(&format!(
            "• High temperature (>{}°C): {}\n",
            t.high_temperature,
            self.alert_count(AlertKind::HighTemperature)
        ));
        out.push_str(&format!(
            "• High vibration (>{}mg): {}\n",
            t.high_vibration,
            self.alert_count(AlertKind::HighVibration)
        ));
        out.push_str(&format!(
            "• Low light (<{}%): {}\n",
            t.low_light,
            self.alert_count(AlertKind::LowLight)
        ));
        out.push('\n');
        out.push_str("CORRELATIONS\n");
        out.push_str("────────────\n");
        out.push_str(&format!(
            "• Temp ↔ Humidity: {}\n",
            fmt_correlation(self.temperature_humidity_correlation)
        ));
        out
    }
}

fn fmt_correlation(r: Option<f64>) -> String {
    match r {
        Some(r) => format!("{:.3}", r),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "ANALYSIS SUMMARY - INDUSTRIAL IoT MONITORING")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total samples: {}", s.sample_count)?;
        writeln!(f, "Collection period: {:.1} minutes", s.period_minutes)?;
        writeln!(f, "Mean temperature: {:.2}°C", s.temperature.mean)?;
        writeln!(f, "Mean humidity: {:.2}%", s.humidity.mean)?;
        writeln!(f, "Mean light: {:.2}%", s.light.mean)?;
        writeln!(f, "Mean vibration: {:.0}mg", s.vibration.mean)?;
        writeln!(f)?;
        writeln!(f, "ALERTS:")?;
        writeln!(
            f,
            "  • {} readings with high temperature",
            self.alert_count(AlertKind::HighTemperature)
        )?;
        writeln!(
            f,
            "  • {} readings with high vibration",
            self.alert_count(AlertKind::HighVibration)
        )?;
        writeln!(
            f,
            "  • {} readings with low light",
            self.alert_count(AlertKind::LowLight)
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "Injected anomalies: {} (temperature {}, vibration {}, light {})",
            self.anomalies.total,
            self.anomalies.temperature_spikes,
            self.anomalies.vibration_shocks,
            self.anomalies.light_occlusions
        )?;
        write!(
            f,
            "Temp ↔ Humidity correlation: {}",
            fmt_correlation(self.temperature_humidity_correlation)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generator::SyntheticSensorGenerator;

    fn default_report() -> (SensorDataset, AnalysisReport) {
        let config = GeneratorConfig::new().with_seed(42);
        let dataset = SyntheticSensorGenerator::new(config)
            .unwrap()
            .generate()
            .unwrap();
        let report = AnalysisReport::analyze(&dataset, &AnalysisConfig::default()).unwrap();
        (dataset, report)
    }

    #[test]
    fn test_summary() {
        let (dataset, report) = default_report();
        let s = &report.summary;
        assert_eq!(s.sample_count, 250);
        assert_eq!(s.interval_seconds, 2);
        assert!((s.period_minutes - 8.3).abs() < 1e-9);
        assert!(s.humidity.min >= 30.0 && s.humidity.max <= 85.0);
        assert!(s.vibration.mean > 900.0 && s.vibration.mean < 1100.0);
        assert_eq!(report.seed, Some(42));
        assert_eq!(report.anomalies.events.len(), dataset.anomalies().len());
    }

    #[test]
    fn test_anomaly_summary_split() {
        let (_, report) = default_report();
        assert_eq!(report.anomalies.total, 25);
        assert_eq!(report.anomalies.temperature_spikes, 8);
        assert_eq!(report.anomalies.vibration_shocks, 8);
        assert_eq!(report.anomalies.light_occlusions, 9);
    }

    #[test]
    fn test_trend_matches_correlation() {
        let (_, report) = default_report();
        let r = report.temperature_humidity_correlation.unwrap();
        let fit = report.temperature_humidity_trend.unwrap();
        assert!(r < 0.0);
        assert!(fit.slope < 0.0);
        assert!((fit.r_squared - r * r).abs() < 1e-9);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let (_, report) = default_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.to_json_file(&path).unwrap();

        let loaded = AnalysisReport::from_json_file(&path).unwrap();
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.alerts, report.alerts);
        assert_eq!(loaded.anomalies.total, 25);
    }

    #[test]
    fn test_display() {
        let (_, report) = default_report();
        let text = report.to_string();
        assert!(text.contains("Total samples: 250"));
        assert!(text.contains("Collection period: 8.3 minutes"));
        assert!(text.contains("Injected anomalies: 25 (temperature 8, vibration 8, light 9)"));

        let block = report.stats_block();
        assert!(block.starts_with("GENERAL STATISTICS"));
        assert!(block.contains("High vibration (>1200mg)"));
    }
}
