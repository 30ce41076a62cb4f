// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Dataset structures and I/O operations.
//!
//! A [`SensorDataset`] is an immutable snapshot: rows are in timestamp order
//! and every consumer iterates them in that order. The vibration magnitude is
//! derived on demand and never stored in a [`Reading`].

use crate::anomalies::{AnomalyEvent, AnomalyKind, AnomalyPlan};
use crate::config::DEFAULT_INTERVAL_SECS;
use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// CSV header, in export order.
pub const CSV_HEADER: [&str; 11] = [
    "Timestamp",
    "Temperatura",
    "Umidade",
    "Luminosidade",
    "Accel_X",
    "Accel_Y",
    "Accel_Z",
    "Gyro_X",
    "Gyro_Y",
    "Gyro_Z",
    "Magnitude_Vibracao",
];

/// One timestamped row of simulated sensor values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Seconds since start.
    pub timestamp: u64,
    /// °C, 2 decimals.
    pub temperature: f64,
    /// %RH, 2 decimals.
    pub humidity: f64,
    /// %, 2 decimals.
    pub light: f64,
    /// mg
    pub accel_x: i32,
    pub accel_y: i32,
    pub accel_z: i32,
    /// m°/s
    pub gyro_x: i32,
    pub gyro_y: i32,
    pub gyro_z: i32,
}

impl Reading {
    /// Euclidean norm of the three acceleration axes (mg).
    pub fn vibration_magnitude(&self) -> f64 {
        let (x, y, z) = (
            self.accel_x as f64,
            self.accel_y as f64,
            self.accel_z as f64,
        );
        (x * x + y * y + z * z).sqrt()
    }

    /// Value of a column for this row.
    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::Temperature => self.temperature,
            Column::Humidity => self.humidity,
            Column::Light => self.light,
            Column::AccelX => self.accel_x as f64,
            Column::AccelY => self.accel_y as f64,
            Column::AccelZ => self.accel_z as f64,
            Column::GyroX => self.gyro_x as f64,
            Column::GyroY => self.gyro_y as f64,
            Column::GyroZ => self.gyro_z as f64,
            Column::VibrationMagnitude => self.vibration_magnitude(),
        }
    }
}

/// A numeric column of the dataset, including the derived magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Temperature,
    Humidity,
    Light,
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
    VibrationMagnitude,
}

impl Column {
    /// Every numeric column, in CSV order.
    pub const ALL: [Column; 10] = [
        Column::Temperature,
        Column::Humidity,
        Column::Light,
        Column::AccelX,
        Column::AccelY,
        Column::AccelZ,
        Column::GyroX,
        Column::GyroY,
        Column::GyroZ,
        Column::VibrationMagnitude,
    ];

    /// Columns of the correlation matrix.
    pub const CORRELATED: [Column; 7] = [
        Column::Temperature,
        Column::Humidity,
        Column::Light,
        Column::AccelX,
        Column::AccelY,
        Column::AccelZ,
        Column::VibrationMagnitude,
    ];

    /// CSV header name.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Temperature => "Temperatura",
            Column::Humidity => "Umidade",
            Column::Light => "Luminosidade",
            Column::AccelX => "Accel_X",
            Column::AccelY => "Accel_Y",
            Column::AccelZ => "Accel_Z",
            Column::GyroX => "Gyro_X",
            Column::GyroY => "Gyro_Y",
            Column::GyroZ => "Gyro_Z",
            Column::VibrationMagnitude => "Magnitude_Vibracao",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Column::Temperature => "°C",
            Column::Humidity | Column::Light => "%",
            Column::AccelX | Column::AccelY | Column::AccelZ | Column::VibrationMagnitude => "mg",
            Column::GyroX | Column::GyroY | Column::GyroZ => "m°/s",
        }
    }
}

/// Generation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Seconds between readings.
    pub interval_seconds: u64,
    /// Generation seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// The full ordered collection of readings for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct SensorDataset {
    readings: Vec<Reading>,
    metadata: DatasetMetadata,
    #[serde(default)]
    plan: AnomalyPlan,
    #[serde(default)]
    anomalies: Vec<AnomalyEvent>,
}

/// Unchecked JSON shape of a [`SensorDataset`].
#[derive(Deserialize)]
struct RawDataset {
    readings: Vec<Reading>,
    metadata: DatasetMetadata,
    #[serde(default)]
    plan: AnomalyPlan,
    #[serde(default)]
    anomalies: Vec<AnomalyEvent>,
}

impl TryFrom<RawDataset> for SensorDataset {
    type Error = SynthError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        check_progression(&raw.readings, raw.metadata.interval_seconds)?;

        let len = raw.readings.len();
        let out_of_range = AnomalyKind::ALL
            .iter()
            .flat_map(|kind| raw.plan.rows(*kind))
            .chain(raw.anomalies.iter().map(|event| &event.row))
            .find(|&&row| row >= len);
        if let Some(row) = out_of_range {
            return Err(SynthError::invalid(
                "anomalies",
                format!("row {} is outside a dataset of {} readings", row, len),
            ));
        }

        Ok(Self {
            readings: raw.readings,
            metadata: raw.metadata,
            plan: raw.plan,
            anomalies: raw.anomalies,
        })
    }
}

/// Non-empty, positive step, timestamps in arithmetic progression.
fn check_progression(readings: &[Reading], interval_seconds: u64) -> Result<()> {
    if readings.is_empty() {
        return Err(SynthError::invalid("readings", "dataset has no readings"));
    }
    if interval_seconds == 0 {
        return Err(SynthError::invalid(
            "interval_seconds",
            "must be greater than zero",
        ));
    }
    for (i, pair) in readings.windows(2).enumerate() {
        if pair[0].timestamp.checked_add(interval_seconds) != Some(pair[1].timestamp) {
            return Err(SynthError::invalid(
                "readings",
                format!(
                    "timestamp {} at row {} does not follow {} with step {}",
                    pair[1].timestamp,
                    i + 1,
                    pair[0].timestamp,
                    interval_seconds
                ),
            ));
        }
    }
    Ok(())
}

/// CSV row layout. Field order is the column order.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Timestamp")]
    timestamp: u64,
    #[serde(rename = "Temperatura")]
    temperature: f64,
    #[serde(rename = "Umidade")]
    humidity: f64,
    #[serde(rename = "Luminosidade")]
    light: f64,
    #[serde(rename = "Accel_X")]
    accel_x: i32,
    #[serde(rename = "Accel_Y")]
    accel_y: i32,
    #[serde(rename = "Accel_Z")]
    accel_z: i32,
    #[serde(rename = "Gyro_X")]
    gyro_x: i32,
    #[serde(rename = "Gyro_Y")]
    gyro_y: i32,
    #[serde(rename = "Gyro_Z")]
    gyro_z: i32,
    #[serde(rename = "Magnitude_Vibracao")]
    vibration_magnitude: f64,
}

impl From<&Reading> for CsvRecord {
    fn from(r: &Reading) -> Self {
        Self {
            timestamp: r.timestamp,
            temperature: r.temperature,
            humidity: r.humidity,
            light: r.light,
            accel_x: r.accel_x,
            accel_y: r.accel_y,
            accel_z: r.accel_z,
            gyro_x: r.gyro_x,
            gyro_y: r.gyro_y,
            gyro_z: r.gyro_z,
            vibration_magnitude: r.vibration_magnitude(),
        }
    }
}

impl From<CsvRecord> for Reading {
    fn from(r: CsvRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            temperature: r.temperature,
            humidity: r.humidity,
            light: r.light,
            accel_x: r.accel_x,
            accel_y: r.accel_y,
            accel_z: r.accel_z,
            gyro_x: r.gyro_x,
            gyro_y: r.gyro_y,
            gyro_z: r.gyro_z,
        }
    }
}

impl SensorDataset {
    pub(crate) fn from_generated(
        readings: Vec<Reading>,
        metadata: DatasetMetadata,
        plan: AnomalyPlan,
        anomalies: Vec<AnomalyEvent>,
    ) -> Self {
        Self {
            readings,
            metadata,
            plan,
            anomalies,
        }
    }

    /// Build a dataset from existing readings, checking the timestamp progression.
    ///
    /// No anomaly ground truth is attached.
    pub fn from_readings(readings: Vec<Reading>, interval_seconds: u64) -> Result<Self> {
        check_progression(&readings, interval_seconds)?;
        Ok(Self {
            readings,
            metadata: DatasetMetadata {
                interval_seconds,
                seed: None,
            },
            plan: AnomalyPlan::default(),
            anomalies: Vec::new(),
        })
    }

    /// All rows, in timestamp order.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    /// Rows selected for anomaly injection (empty for imported data).
    pub fn plan(&self) -> &AnomalyPlan {
        &self.plan
    }

    /// Injected anomalies, in injection order.
    pub fn anomalies(&self) -> &[AnomalyEvent] {
        &self.anomalies
    }

    /// Number of injected anomalies of one kind.
    pub fn anomaly_count(&self, kind: AnomalyKind) -> usize {
        self.plan.rows(kind).len()
    }

    /// Get number of samples.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn interval_seconds(&self) -> u64 {
        self.metadata.interval_seconds
    }

    /// Timestamp of the last reading, in seconds.
    pub fn duration_secs(&self) -> u64 {
        self.readings.last().map(|r| r.timestamp).unwrap_or(0)
    }

    /// Get timestamps as a vector.
    pub fn timestamps(&self) -> Vec<u64> {
        self.readings.iter().map(|r| r.timestamp).collect()
    }

    /// Timestamps in minutes, the x axis of every time chart.
    pub fn minutes(&self) -> Vec<f64> {
        self.readings
            .iter()
            .map(|r| r.timestamp as f64 / 60.0)
            .collect()
    }

    /// Get a column as a vector of values.
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.readings.iter().map(|r| r.value(column)).collect()
    }

    /// Derived vibration magnitude per row.
    pub fn vibration_magnitudes(&self) -> Vec<f64> {
        self.column(Column::VibrationMagnitude)
    }

    /// Write CSV (with the derived magnitude column) to any writer.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        for reading in &self.readings {
            writer.serialize(CsvRecord::from(reading))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export to CSV file.
    pub fn to_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))?;
        log::info!("Exported {} readings to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a CSV produced by [`SensorDataset::write_csv`].
    ///
    /// The interval is inferred from the first two rows; a single-row file
    /// gets the default interval. The magnitude column is ignored and
    /// recomputed on demand.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        let found: Vec<&str> = headers.iter().collect();
        if found != CSV_HEADER {
            return Err(SynthError::Parse {
                line: 1,
                message: format!("unexpected header: {}", found.join(",")),
            });
        }

        let mut readings = Vec::new();
        for record in reader.deserialize::<CsvRecord>() {
            readings.push(Reading::from(record.map_err(value_error)?));
        }

        let interval = match readings.as_slice() {
            [first, second, ..] if second.timestamp > first.timestamp => {
                second.timestamp - first.timestamp
            }
            [_] => DEFAULT_INTERVAL_SECS,
            [] => {
                return Err(SynthError::Parse {
                    line: 2,
                    message: "no readings".to_string(),
                })
            }
            _ => {
                return Err(SynthError::Parse {
                    line: 3,
                    message: "timestamps are not increasing".to_string(),
                })
            }
        };

        Self::from_readings(readings, interval)
    }

    /// Import from CSV file.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::read_csv(BufReader::new(file))
    }

    /// Export to JSON file (readings, metadata and anomaly ground truth).
    pub fn to_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Import from JSON file, with the same checks as [`SensorDataset::from_readings`].
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let dataset = serde_json::from_reader(BufReader::new(file))?;
        Ok(dataset)
    }
}

/// Malformed values become `Parse` errors; everything else stays a CSV error.
fn value_error(err: csv::Error) -> SynthError {
    match err.kind() {
        csv::ErrorKind::Deserialize { pos, err: inner } => SynthError::Parse {
            line: pos.as_ref().map(|p| p.line() as usize).unwrap_or(0),
            message: inner.to_string(),
        },
        _ => SynthError::Csv(err),
    }
}

impl<'a> IntoIterator for &'a SensorDataset {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
