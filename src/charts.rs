// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Chart documents.
//!
//! Each chart is described as data (series, reference lines, annotations)
//! and written as JSON. Rendering is left to whatever plotting front-end
//! consumes the files. The x axis of time charts is in minutes.

use crate::alerts::AlertKind;
use crate::config::{AnalysisConfig, ChartStyle};
use crate::dataset::{Column, SensorDataset};
use crate::error::{Result, SynthError};
use crate::report::AnalysisReport;
use crate::stats::Histogram;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File stems of the chart set, in build order.
pub const CHART_NAMES: [&str; 7] = [
    "temperatura_tempo",
    "correlacao_temp_umidade",
    "luminosidade_tempo",
    "vibracao_mpu6050",
    "distribuicoes_sensores",
    "matriz_correlacao",
    "dashboard_completo",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    Line,
    /// Line with the area down to zero filled.
    Area,
    Scatter,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// One plotted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub kind: SeriesKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: String,
    /// Per-point values mapped through a colormap (scatter only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_values: Option<Vec<f64>>,
}

impl Series {
    pub fn new(label: &str, kind: SeriesKind, x: Vec<f64>, y: Vec<f64>, color: &str) -> Self {
        Self {
            label: label.to_string(),
            kind,
            x,
            y,
            color: color.to_string(),
            color_values: None,
        }
    }

    pub fn with_color_values(mut self, values: Vec<f64>) -> Self {
        self.color_values = Some(values);
        self
    }
}

/// Horizontal or vertical marker line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub label: String,
    /// `true` for a horizontal line at `y = value`.
    pub horizontal: bool,
    pub value: f64,
    pub color: String,
    pub style: LineStyle,
}

impl ReferenceLine {
    pub fn horizontal(label: &str, value: f64, color: &str, style: LineStyle) -> Self {
        Self {
            label: label.to_string(),
            horizontal: true,
            value,
            color: color.to_string(),
            style,
        }
    }

    pub fn vertical(label: &str, value: f64, color: &str, style: LineStyle) -> Self {
        Self {
            horizontal: false,
            ..Self::horizontal(label, value, color, style)
        }
    }
}

/// Text box anchored in axes coordinates (0..1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl Annotation {
    /// Top-left corner, where every stats box goes.
    pub fn top_left(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: 0.02,
            y: 0.98,
        }
    }
}

/// One set of axes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<(f64, f64)>,
}

impl Panel {
    fn new(title: &str, x_label: &str, y_label: &str) -> Self {
        Self {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            ..Self::default()
        }
    }
}

/// Lower-triangle correlation heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub labels: Vec<String>,
    /// `None` for masked (upper triangle) or undefined cells.
    pub cells: Vec<Vec<Option<f64>>>,
    pub colormap: String,
    pub center: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorState {
    Ok,
    Attention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorStatus {
    pub sensor: String,
    pub state: SensorState,
}

/// A complete chart document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// File stem.
    pub name: String,
    pub title: String,
    pub panels: Vec<Panel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<Heatmap>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sensor_status: Vec<SensorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_block: Option<String>,
    pub style: ChartStyle,
}

impl ChartSpec {
    fn new(name: &str, title: &str, style: &ChartStyle) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            panels: Vec::new(),
            heatmap: None,
            sensor_status: Vec::new(),
            text_block: None,
            style: style.clone(),
        }
    }

    /// Write as `<dir>/<name>.json`.
    pub fn write_json(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(format!("{}.json", self.name));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

const TEMPERATURE_COLOR: &str = "#e74c3c";
const HUMIDITY_COLOR: &str = "#3498db";
const LIGHT_COLOR: &str = "#f39c12";
const VIBRATION_COLOR: &str = "#9b59b6";

/// Static gravity offset subtracted from the Z component plot.
const GRAVITY_MG: f64 = 1000.0;

/// Builds the fixed chart set from a dataset and its analysis.
pub struct ChartBuilder<'a> {
    dataset: &'a SensorDataset,
    report: &'a AnalysisReport,
    config: &'a AnalysisConfig,
    style: &'a ChartStyle,
    minutes: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl<'a> ChartBuilder<'a> {
    /// `report` must come from `dataset`: its alert rows index the readings.
    pub fn new(
        dataset: &'a SensorDataset,
        report: &'a AnalysisReport,
        config: &'a AnalysisConfig,
        style: &'a ChartStyle,
    ) -> Result<Self> {
        let len = dataset.len();
        let alerts = &report.alerts;
        let stray = alerts
            .high_temperature
            .iter()
            .chain(&alerts.high_vibration)
            .chain(&alerts.low_light)
            .any(|&row| row >= len);
        if report.summary.sample_count != len || stray {
            return Err(SynthError::invalid(
                "report",
                format!(
                    "report covers {} samples, dataset has {}",
                    report.summary.sample_count, len
                ),
            ));
        }

        Ok(Self {
            dataset,
            report,
            config,
            style,
            minutes: dataset.minutes(),
            magnitudes: dataset.vibration_magnitudes(),
        })
    }

    /// All seven charts, in [`CHART_NAMES`] order.
    pub fn build_all(&self) -> Vec<ChartSpec> {
        vec![
            self.temperature_over_time(),
            self.temperature_vs_humidity(),
            self.light_over_time(),
            self.vibration(),
            self.distributions(),
            self.correlation_matrix(),
            self.dashboard(),
        ]
    }

    /// Build and write every chart into `dir`.
    pub fn write_all(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut paths = Vec::with_capacity(CHART_NAMES.len());
        for chart in self.build_all() {
            let path = chart.write_json(dir)?;
            log::debug!("Chart written: {}", path.display());
            paths.push(path);
        }
        Ok(paths)
    }

    fn column(&self, column: Column) -> Vec<f64> {
        self.dataset.column(column)
    }

    /// Points of `values` at `rows`, on the minutes axis.
    fn highlight(&self, rows: &[usize], values: &[f64], label: &str) -> Option<Series> {
        if rows.is_empty() {
            return None;
        }
        let x = rows.iter().map(|&i| self.minutes[i]).collect();
        let y = rows.iter().map(|&i| values[i]).collect();
        Some(Series::new(
            &format!("{} ({})", label, rows.len()),
            SeriesKind::Scatter,
            x,
            y,
            "red",
        ))
    }

    pub fn temperature_over_time(&self) -> ChartSpec {
        let temperature = self.column(Column::Temperature);
        let threshold = self.config.thresholds.high_temperature;
        let stats = &self.report.summary.temperature;

        let mut panel = Panel::new(
            "Temperature Monitoring - DHT22",
            "Time (minutes)",
            "Temperature (°C)",
        );
        panel.series.push(Series::new(
            "Temperature",
            SeriesKind::Line,
            self.minutes.clone(),
            temperature.clone(),
            TEMPERATURE_COLOR,
        ));
        panel.reference_lines.push(ReferenceLine::horizontal(
            &format!("Critical limit ({}°C)", threshold),
            threshold,
            "red",
            LineStyle::Dashed,
        ));
        if let Some(points) = self.highlight(
            self.report.alerts.rows(AlertKind::HighTemperature),
            &temperature,
            "Anomalies",
        ) {
            panel.series.push(points);
        }
        panel.annotations.push(Annotation::top_left(format!(
            "Mean: {:.1}°C\nMax: {:.1}°C\nMin: {:.1}°C",
            stats.mean, stats.max, stats.min
        )));

        let mut chart = ChartSpec::new(CHART_NAMES[0], "Temperature over time", self.style);
        chart.panels.push(panel);
        chart
    }

    pub fn temperature_vs_humidity(&self) -> ChartSpec {
        let temperature = self.column(Column::Temperature);
        let humidity = self.column(Column::Humidity);

        let mut panel = Panel::new(
            "Correlation: Temperature vs Humidity",
            "Temperature (°C)",
            "Humidity (%)",
        );
        panel.series.push(
            Series::new(
                "Readings",
                SeriesKind::Scatter,
                temperature.clone(),
                humidity,
                "viridis",
            )
            .with_color_values(self.minutes.clone()),
        );

        if let Some(fit) = self.report.temperature_humidity_trend {
            let trend = temperature.iter().map(|&t| fit.predict(t)).collect();
            panel.series.push(Series::new(
                &format!("Trend (R² = {:.3})", fit.r_squared),
                SeriesKind::Line,
                temperature,
                trend,
                "red",
            ));
        }
        if let Some(r) = self.report.temperature_humidity_correlation {
            panel
                .annotations
                .push(Annotation::top_left(format!("Correlation: {:.3}", r)));
        }

        let mut chart = ChartSpec::new(
            CHART_NAMES[1],
            "Temperature vs humidity correlation",
            self.style,
        );
        chart.panels.push(panel);
        chart
    }

    pub fn light_over_time(&self) -> ChartSpec {
        let light = self.column(Column::Light);
        let threshold = self.config.thresholds.low_light;

        let mut panel = Panel::new("Light Monitoring - LDR", "Time (minutes)", "Light (%)");
        panel.series.push(Series::new(
            "Light",
            SeriesKind::Area,
            self.minutes.clone(),
            light.clone(),
            LIGHT_COLOR,
        ));
        panel.reference_lines.push(ReferenceLine::horizontal(
            "Mean level (50%)",
            50.0,
            "green",
            LineStyle::Dotted,
        ));
        panel.reference_lines.push(ReferenceLine::horizontal(
            &format!("Low limit ({}%)", threshold),
            threshold,
            "red",
            LineStyle::Dashed,
        ));
        if let Some(points) = self.highlight(
            self.report.alerts.rows(AlertKind::LowLight),
            &light,
            "Low light",
        ) {
            panel.series.push(points);
        }
        panel.y_range = Some((0.0, 100.0));

        let mut chart = ChartSpec::new(CHART_NAMES[2], "Light over time", self.style);
        chart.panels.push(panel);
        chart
    }

    pub fn vibration(&self) -> ChartSpec {
        let threshold = self.config.thresholds.high_vibration;

        let mut magnitude = Panel::new("Total Vibration Magnitude", "", "Vibration (mg)");
        magnitude.series.push(Series::new(
            "Vibration magnitude",
            SeriesKind::Line,
            self.minutes.clone(),
            self.magnitudes.clone(),
            TEMPERATURE_COLOR,
        ));
        magnitude.reference_lines.push(ReferenceLine::horizontal(
            &format!("Alert limit ({}mg)", threshold),
            threshold,
            "red",
            LineStyle::Dashed,
        ));
        if let Some(points) = self.highlight(
            self.report.alerts.rows(AlertKind::HighVibration),
            &self.magnitudes,
            "High vibration",
        ) {
            magnitude.series.push(points);
        }

        let mut components = Panel::new(
            "Acceleration Components",
            "Time (minutes)",
            "Acceleration (mg)",
        );
        let axes = [
            ("Accel X", self.column(Column::AccelX)),
            ("Accel Y", self.column(Column::AccelY)),
            (
                "Accel Z (gravity removed)",
                self.column(Column::AccelZ)
                    .into_iter()
                    .map(|z| z - GRAVITY_MG)
                    .collect(),
            ),
        ];
        for (i, (label, values)) in axes.into_iter().enumerate() {
            components.series.push(Series::new(
                label,
                SeriesKind::Line,
                self.minutes.clone(),
                values,
                self.style.color(i),
            ));
        }

        let mut chart = ChartSpec::new(CHART_NAMES[3], "Vibration analysis (MPU6050)", self.style);
        chart.panels.push(magnitude);
        chart.panels.push(components);
        chart
    }

    fn histogram_panel(
        &self,
        title: &str,
        x_label: &str,
        values: &[f64],
        bins: usize,
        color: &str,
        mean_label: impl Fn(f64) -> String,
    ) -> Panel {
        let mut panel = Panel::new(title, x_label, "Density");
        if let Some(hist) = Histogram::compute(values, bins) {
            panel.series.push(Series::new(
                title,
                SeriesKind::Bar,
                hist.centers(),
                hist.density.clone(),
                color,
            ));
            panel.reference_lines.push(ReferenceLine::vertical(
                &mean_label(hist.mean),
                hist.mean,
                color,
                LineStyle::Dashed,
            ));
        }
        panel
    }

    pub fn distributions(&self) -> ChartSpec {
        let bins = self.config.histogram_bins;
        let mut chart = ChartSpec::new(CHART_NAMES[4], "IoT Sensor Distributions", self.style);

        chart.panels.push(self.histogram_panel(
            "Distribution - Temperature",
            "Temperature (°C)",
            &self.column(Column::Temperature),
            bins,
            TEMPERATURE_COLOR,
            |m| format!("Mean: {:.1}°C", m),
        ));
        chart.panels.push(self.histogram_panel(
            "Distribution - Humidity",
            "Humidity (%)",
            &self.column(Column::Humidity),
            bins,
            HUMIDITY_COLOR,
            |m| format!("Mean: {:.1}%", m),
        ));
        chart.panels.push(self.histogram_panel(
            "Distribution - Light",
            "Light (%)",
            &self.column(Column::Light),
            bins,
            LIGHT_COLOR,
            |m| format!("Mean: {:.1}%", m),
        ));
        chart.panels.push(self.histogram_panel(
            "Distribution - Vibration Magnitude",
            "Vibration (mg)",
            &self.magnitudes,
            bins,
            VIBRATION_COLOR,
            |m| format!("Mean: {:.0}mg", m),
        ));
        chart
    }

    pub fn correlation_matrix(&self) -> ChartSpec {
        let matrix = &self.report.correlations;
        let p = matrix.columns.len();

        // Mask the diagonal and upper triangle
        let cells = (0..p)
            .map(|i| {
                (0..p)
                    .map(|j| if j < i { matrix.values[i][j] } else { None })
                    .collect()
            })
            .collect();

        let mut chart =
            ChartSpec::new(CHART_NAMES[5], "Correlation Matrix - IoT Sensors", self.style);
        chart.heatmap = Some(Heatmap {
            labels: matrix.columns.iter().map(|c| c.header().to_string()).collect(),
            cells,
            colormap: "RdBu_r".to_string(),
            center: 0.0,
        });
        chart
    }

    pub fn dashboard(&self) -> ChartSpec {
        let mut chart = ChartSpec::new(
            CHART_NAMES[6],
            "IoT Dashboard - Industrial Monitoring System",
            self.style,
        );

        let temperature = self.column(Column::Temperature);
        let humidity = self.column(Column::Humidity);

        let mut temp = Panel::new("Temperature (°C)", "", "°C");
        temp.series.push(Series::new(
            "Temperature",
            SeriesKind::Line,
            self.minutes.clone(),
            temperature.clone(),
            TEMPERATURE_COLOR,
        ));

        let mut hum = Panel::new("Humidity (%)", "", "%");
        hum.series.push(Series::new(
            "Humidity",
            SeriesKind::Area,
            self.minutes.clone(),
            humidity.clone(),
            HUMIDITY_COLOR,
        ));

        let mut light = Panel::new("Light (%)", "", "%");
        light.series.push(Series::new(
            "Light",
            SeriesKind::Line,
            self.minutes.clone(),
            self.column(Column::Light),
            LIGHT_COLOR,
        ));

        let mut vib = Panel::new("Vibration Magnitude (mg)", "", "mg");
        vib.series.push(Series::new(
            "Vibration",
            SeriesKind::Line,
            self.minutes.clone(),
            self.magnitudes.clone(),
            VIBRATION_COLOR,
        ));

        let mut scatter = Panel::new("Temp vs Humidity", "Temperature (°C)", "Humidity (%)");
        scatter.series.push(
            Series::new(
                "Readings",
                SeriesKind::Scatter,
                temperature.clone(),
                humidity,
                "viridis",
            )
            .with_color_values(self.minutes.clone()),
        );

        let mut hist = Panel::new("Temperature Distribution", "Temperature (°C)", "Frequency");
        if let Some(h) = Histogram::compute(&temperature, self.config.dashboard_histogram_bins) {
            hist.series.push(Series::new(
                "Temperature",
                SeriesKind::Bar,
                h.centers(),
                h.counts.iter().map(|&c| c as f64).collect(),
                TEMPERATURE_COLOR,
            ));
        }

        chart.panels = vec![temp, hum, light, vib, scatter, hist];
        chart.text_block = Some(self.report.stats_block());
        chart.sensor_status = self.sensor_status();
        chart
    }

    /// A sensor needs attention when any of its alerts fired.
    fn sensor_status(&self) -> Vec<SensorStatus> {
        let alerts = &self.report.alerts;
        let state = |kind: AlertKind| {
            if alerts.count(kind) > 0 {
                SensorState::Attention
            } else {
                SensorState::Ok
            }
        };
        vec![
            SensorStatus {
                sensor: "DHT22".to_string(),
                state: state(AlertKind::HighTemperature),
            },
            SensorStatus {
                sensor: "MPU6050".to_string(),
                state: state(AlertKind::HighVibration),
            },
            SensorStatus {
                sensor: "LDR".to_string(),
                state: state(AlertKind::LowLight),
            },
        ]
    }
}
