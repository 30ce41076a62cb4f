// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Sensorsynth - Synthetic IoT telemetry
//!
//! Simulated readings for a small industrial monitoring rig (DHT22
//! temperature/humidity, LDR light, MPU6050 accelerometer and gyroscope),
//! with injected anomalies and a descriptive analysis on top.
//!
//! ## Key Features
//!
//! - **Reproducible**: seeded generation gives bit-identical datasets
//! - **Correlated signals**: humidity follows temperature inversely
//! - **Ground truth**: every injected anomaly is recorded with its row
//! - **Flat exports**: CSV data, JSON report, JSON chart documents
//!
//! ## Quick Start
//!
//! ```rust
//! use sensorsynth::{AnalysisConfig, AnalysisReport, GeneratorConfig, SyntheticSensorGenerator};
//!
//! let config = GeneratorConfig::new().with_sample_count(250).with_seed(42);
//! let dataset = SyntheticSensorGenerator::new(config)?.generate()?;
//! assert_eq!(dataset.len(), 250);
//! assert_eq!(dataset.plan().split_sizes(), [8, 8, 9]);
//!
//! let report = AnalysisReport::analyze(&dataset, &AnalysisConfig::default())?;
//! assert!(report.temperature_humidity_correlation.unwrap() < 0.0);
//! # Ok::<(), sensorsynth::SynthError>(())
//! ```
//!
//! ## Modules
//!
//! - [`generator`]: Signal synthesis
//! - [`anomalies`]: Anomaly selection and injection
//! - [`dataset`]: Readings, CSV and JSON I/O
//! - [`stats`]: Descriptive statistics, correlation, histograms
//! - [`alerts`]: Threshold alerts
//! - [`report`]: Analysis report
//! - [`charts`]: Chart documents
//! - [`pipeline`]: Generate, export, analyze and chart in one call

// Modules
pub mod alerts;
pub mod anomalies;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod report;
pub mod stats;

// Re-exports for convenient access
pub use alerts::{AlertKind, Alerts};
pub use anomalies::{AnomalyEffect, AnomalyEvent, AnomalyKind, AnomalyPlan};
pub use charts::{ChartBuilder, ChartSpec, CHART_NAMES};
pub use config::{
    AlertThresholds, AnalysisConfig, ChartStyle, GeneratorConfig, PipelineConfig, SignalProfile,
    ValueRange,
};
pub use dataset::{Column, DatasetMetadata, Reading, SensorDataset, CSV_HEADER};
pub use error::{Result, SynthError};
pub use generator::{generate, SyntheticSensorGenerator};
pub use pipeline::{Pipeline, RunOutput, CSV_FILE_NAME, REPORT_FILE_NAME};
pub use report::{AnalysisReport, DatasetSummary};
pub use stats::{pearson, ColumnStats, CorrelationMatrix, Histogram, LinearFit};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
