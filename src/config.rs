// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Configuration for generation, analysis and chart output.
//!
//! The [`SignalProfile`] defaults are the calibrated shape of the simulated
//! bench (DHT22 + LDR + MPU6050 on an ESP32). Changing any of them produces a
//! different dataset for the same seed.

use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default number of samples per run.
pub const DEFAULT_SAMPLE_COUNT: usize = 250;

/// Default sampling interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 2;

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of readings to generate.
    pub sample_count: usize,
    /// Seconds between two consecutive readings.
    pub interval_seconds: u64,
    /// Random seed for reproducibility (None = entropy).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Signal shape constants.
    pub profile: SignalProfile,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            interval_seconds: DEFAULT_INTERVAL_SECS,
            seed: None,
            profile: SignalProfile::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of samples.
    pub fn with_sample_count(mut self, n: usize) -> Self {
        self.sample_count = n;
        self
    }

    /// Set sample interval in seconds.
    pub fn with_interval_secs(mut self, secs: u64) -> Self {
        self.interval_seconds = secs;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the signal profile.
    pub fn with_profile(mut self, profile: SignalProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Timestamp of the last reading, in seconds.
    pub fn duration_secs(&self) -> u64 {
        self.interval_seconds
            .saturating_mul(self.sample_count.saturating_sub(1) as u64)
    }

    /// Number of rows that will receive an injected anomaly.
    pub fn anomaly_count(&self) -> usize {
        self.profile.anomalies.count_for(self.sample_count)
    }

    /// Check the preconditions of a generation run.
    pub fn validate(&self) -> Result<()> {
        if self.sample_count == 0 {
            return Err(SynthError::invalid(
                "sample_count",
                "must be greater than zero",
            ));
        }
        if self.interval_seconds == 0 {
            return Err(SynthError::invalid(
                "interval_seconds",
                "must be greater than zero",
            ));
        }
        let last_step = (self.sample_count - 1) as u64;
        if self.interval_seconds.checked_mul(last_step).is_none() {
            return Err(SynthError::invalid(
                "interval_seconds",
                format!(
                    "{} samples every {}s overflow the timestamp range",
                    self.sample_count, self.interval_seconds
                ),
            ));
        }
        self.profile.validate()
    }
}

/// Inclusive-low, exclusive-high range used for uniform draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Whether `value` lies in `[low, high]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    fn validate(&self, name: &'static str) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(SynthError::invalid(name, "bounds must be finite"));
        }
        if self.low > self.high {
            return Err(SynthError::invalid(
                name,
                format!("low ({}) exceeds high ({})", self.low, self.high),
            ));
        }
        Ok(())
    }
}

/// All constants shaping the synthetic signals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalProfile {
    pub temperature: TemperatureProfile,
    pub humidity: HumidityProfile,
    pub light: LightProfile,
    pub inertial: InertialProfile,
    pub anomalies: AnomalyProfile,
}

impl SignalProfile {
    /// Reject non-finite constants, negative deviations and inverted ranges.
    pub fn validate(&self) -> Result<()> {
        let stds = [
            ("temperature.noise_std", self.temperature.noise_std),
            ("humidity.noise_std", self.humidity.noise_std),
            ("light.noise_std", self.light.noise_std),
            ("inertial.accel_xy_std", self.inertial.accel_xy_std),
            ("inertial.accel_z_std", self.inertial.accel_z_std),
            ("inertial.gyro_xy_std", self.inertial.gyro_xy_std),
            ("inertial.gyro_z_std", self.inertial.gyro_z_std),
        ];
        for (name, std) in stds {
            if !std.is_finite() || std < 0.0 {
                return Err(SynthError::invalid(
                    name,
                    format!("standard deviation must be finite and >= 0, got {}", std),
                ));
            }
        }

        let constants = [
            self.temperature.base,
            self.temperature.trend_amplitude,
            self.temperature.trend_frequency,
            self.temperature.cycle_amplitude,
            self.temperature.cycle_frequency,
            self.humidity.base,
            self.humidity.temperature_coupling,
            self.light.base,
            self.light.amplitude,
            self.light.frequency,
            self.inertial.gravity_mg,
        ];
        if constants.iter().any(|c| !c.is_finite()) {
            return Err(SynthError::invalid("profile", "constants must be finite"));
        }

        self.humidity.clip.validate("humidity.clip")?;
        self.light.clip.validate("light.clip")?;
        self.anomalies.validate()
    }
}

/// DHT22 temperature: slow trend + simulated daily cycle + noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureProfile {
    /// Baseline in °C.
    pub base: f64,
    pub trend_amplitude: f64,
    /// rad per second of timestamp.
    pub trend_frequency: f64,
    pub cycle_amplitude: f64,
    pub cycle_frequency: f64,
    pub noise_std: f64,
}

impl Default for TemperatureProfile {
    fn default() -> Self {
        Self {
            base: 24.7,
            trend_amplitude: 2.0,
            trend_frequency: 0.01,
            cycle_amplitude: 4.0,
            cycle_frequency: 0.001,
            noise_std: 0.3,
        }
    }
}

/// DHT22 relative humidity, inversely coupled to temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumidityProfile {
    pub base: f64,
    /// %RH per °C of deviation from the temperature base (negative = inverse).
    pub temperature_coupling: f64,
    pub noise_std: f64,
    pub clip: ValueRange,
}

impl Default for HumidityProfile {
    fn default() -> Self {
        Self {
            base: 55.0,
            temperature_coupling: -1.2,
            noise_std: 1.5,
            clip: ValueRange::new(30.0, 85.0),
        }
    }
}

/// LDR light level, one slow day/night cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightProfile {
    pub base: f64,
    pub amplitude: f64,
    pub frequency: f64,
    pub noise_std: f64,
    pub clip: ValueRange,
}

impl Default for LightProfile {
    fn default() -> Self {
        Self {
            base: 50.0,
            amplitude: 35.0,
            frequency: 0.008,
            noise_std: 8.0,
            clip: ValueRange::new(0.0, 100.0),
        }
    }
}

/// MPU6050 accelerometer (mg) and gyroscope (m°/s).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertialProfile {
    /// Z axis rest value: 1 g.
    pub gravity_mg: f64,
    pub accel_z_std: f64,
    pub accel_xy_std: f64,
    pub gyro_xy_std: f64,
    pub gyro_z_std: f64,
}

impl Default for InertialProfile {
    fn default() -> Self {
        Self {
            gravity_mg: 1000.0,
            accel_z_std: 25.0,
            accel_xy_std: 50.0,
            gyro_xy_std: 30.0,
            gyro_z_std: 20.0,
        }
    }
}

/// Anomaly injection amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyProfile {
    /// Share of rows corrupted, in [0, 1].
    pub fraction: f64,
    /// Added to temperature (°C).
    pub temperature_offset: ValueRange,
    /// Added to accel_x and accel_y (mg), drawn per axis.
    pub shock_offset: ValueRange,
    /// Replaces light (%).
    pub occlusion_level: ValueRange,
}

impl Default for AnomalyProfile {
    fn default() -> Self {
        Self {
            fraction: 0.10,
            temperature_offset: ValueRange::new(8.0, 15.0),
            shock_offset: ValueRange::new(300.0, 800.0),
            occlusion_level: ValueRange::new(0.0, 15.0),
        }
    }
}

impl AnomalyProfile {
    /// `floor(fraction * n)`.
    pub fn count_for(&self, sample_count: usize) -> usize {
        (sample_count as f64 * self.fraction).floor() as usize
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fraction) {
            return Err(SynthError::invalid(
                "anomalies.fraction",
                format!("must be within [0, 1], got {}", self.fraction),
            ));
        }
        self.temperature_offset
            .validate("anomalies.temperature_offset")?;
        self.shock_offset.validate("anomalies.shock_offset")?;
        self.occlusion_level.validate("anomalies.occlusion_level")
    }
}

/// Alert thresholds used by the analysis and the charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Critical temperature (°C), strictly above.
    pub high_temperature: f64,
    /// Vibration magnitude (mg), strictly above.
    pub high_vibration: f64,
    /// Light level (%), strictly below.
    pub low_light: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            high_temperature: 35.0,
            high_vibration: 1200.0,
            low_light: 10.0,
        }
    }
}

/// Analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub thresholds: AlertThresholds,
    /// Bins for the distribution histograms.
    pub histogram_bins: usize,
    /// Bins for the dashboard temperature histogram.
    pub dashboard_histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: AlertThresholds::default(),
            histogram_bins: 25,
            dashboard_histogram_bins: 20,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 || self.dashboard_histogram_bins == 0 {
            return Err(SynthError::invalid(
                "histogram_bins",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Presentation defaults carried into every chart document.
///
/// Purely cosmetic: nothing here changes the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Figure size in inches (width, height).
    pub figure_size: (f64, f64),
    pub font_size: f64,
    pub dpi: u32,
    /// Series colours, hex.
    pub palette: Vec<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            figure_size: (12.0, 8.0),
            font_size: 12.0,
            dpi: 300,
            palette: [
                "#e74c3c", "#3498db", "#f39c12", "#9b59b6", "#2ecc71", "#1abc9c",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl ChartStyle {
    /// Colour for the n-th series, cycling through the palette.
    pub fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return "#000000";
        }
        &self.palette[index % self.palette.len()]
    }
}

/// Everything one pipeline run needs, loadable from a single JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub generator: GeneratorConfig,
    pub analysis: AnalysisConfig,
    pub style: ChartStyle,
}

impl PipelineConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.analysis.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_config_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.sample_count, 250);
        assert_eq!(config.interval_seconds, 2);
        assert_eq!(config.seed, None);
        assert_eq!(config.duration_secs(), 498);
        assert_eq!(config.anomaly_count(), 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_samples_rejected() {
        let err = GeneratorConfig::new().with_sample_count(0).validate();
        assert!(matches!(
            err,
            Err(SynthError::InvalidArgument {
                name: "sample_count",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = GeneratorConfig::new().with_interval_secs(0).validate();
        assert!(err.unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_timestamp_overflow_rejected() {
        let config = GeneratorConfig::new()
            .with_sample_count(3)
            .with_interval_secs(u64::MAX / 2 + 1);
        assert!(config.validate().unwrap_err().is_invalid_argument());
        assert_eq!(config.duration_secs(), u64::MAX);

        // A single sample never advances the clock
        let config = GeneratorConfig::new()
            .with_sample_count(1)
            .with_interval_secs(u64::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_anomaly_count_floors() {
        let profile = AnomalyProfile::default();
        assert_eq!(profile.count_for(1), 0);
        assert_eq!(profile.count_for(9), 0);
        assert_eq!(profile.count_for(10), 1);
        assert_eq!(profile.count_for(99), 9);
        assert_eq!(profile.count_for(250), 25);
    }

    #[test]
    fn test_profile_rejects_negative_std() {
        let mut profile = SignalProfile::default();
        profile.light.noise_std = -1.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_profile_rejects_inverted_range() {
        let mut profile = SignalProfile::default();
        profile.anomalies.shock_offset = ValueRange::new(800.0, 300.0);
        assert!(profile.validate().is_err());

        let mut profile = SignalProfile::default();
        profile.anomalies.fraction = 1.5;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "generator": { "sample_count": 40, "seed": 7 } }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.generator.sample_count, 40);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(config.generator.interval_seconds, 2);
        assert_eq!(config.generator.profile, SignalProfile::default());
        assert_eq!(config.analysis.histogram_bins, 25);
    }

    #[test]
    fn test_pipeline_config_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");

        let mut config = PipelineConfig::default();
        config.generator.seed = Some(42);
        config.analysis.thresholds.high_temperature = 33.0;
        config.to_json_file(&path).unwrap();

        let loaded = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{ "generator": { "interval_seconds": 0 } }"#).unwrap();

        let err = PipelineConfig::from_json_file(&path).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_chart_style_palette_cycles() {
        let style = ChartStyle::default();
        assert_eq!(style.color(0), "#e74c3c");
        assert_eq!(style.color(6), "#e74c3c");
        assert_eq!(style.dpi, 300);
    }
}
