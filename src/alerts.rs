// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Threshold alerts.

use crate::config::AlertThresholds;
use crate::dataset::SensorDataset;
use serde::{Deserialize, Serialize};

/// Alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighTemperature,
    HighVibration,
    LowLight,
}

/// Rows crossing each threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alerts {
    pub high_temperature: Vec<usize>,
    pub high_vibration: Vec<usize>,
    pub low_light: Vec<usize>,
}

impl Alerts {
    /// Scan every reading against `thresholds`.
    pub fn detect(dataset: &SensorDataset, thresholds: &AlertThresholds) -> Self {
        let mut alerts = Self::default();
        for (i, r) in dataset.iter().enumerate() {
            if r.temperature > thresholds.high_temperature {
                alerts.high_temperature.push(i);
            }
            if r.vibration_magnitude() > thresholds.high_vibration {
                alerts.high_vibration.push(i);
            }
            if r.light < thresholds.low_light {
                alerts.low_light.push(i);
            }
        }

        if !alerts.is_empty() {
            log::debug!(
                "Alerts: {} high temperature, {} high vibration, {} low light",
                alerts.high_temperature.len(),
                alerts.high_vibration.len(),
                alerts.low_light.len()
            );
        }
        alerts
    }

    pub fn rows(&self, kind: AlertKind) -> &[usize] {
        match kind {
            AlertKind::HighTemperature => &self.high_temperature,
            AlertKind::HighVibration => &self.high_vibration,
            AlertKind::LowLight => &self.low_light,
        }
    }

    pub fn count(&self, kind: AlertKind) -> usize {
        self.rows(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.high_temperature.is_empty()
            && self.high_vibration.is_empty()
            && self.low_light.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Reading;

    fn reading(timestamp: u64, temperature: f64, light: f64, accel_x: i32) -> Reading {
        Reading {
            timestamp,
            temperature,
            humidity: 50.0,
            light,
            accel_x,
            accel_y: 0,
            accel_z: 1000,
            gyro_x: 0,
            gyro_y: 0,
            gyro_z: 0,
        }
    }

    #[test]
    fn test_detect_thresholds() {
        let dataset = SensorDataset::from_readings(
            vec![
                reading(0, 25.0, 50.0, 0),
                reading(2, 35.0, 10.0, 0),   // on the line: no alert
                reading(4, 35.01, 9.99, 0),  // hot and dark
                reading(6, 25.0, 50.0, 700), // sqrt(700² + 1000²) ≈ 1220
            ],
            2,
        )
        .unwrap();

        let alerts = Alerts::detect(&dataset, &AlertThresholds::default());
        assert_eq!(alerts.high_temperature, vec![2]);
        assert_eq!(alerts.low_light, vec![2]);
        assert_eq!(alerts.high_vibration, vec![3]);
        assert_eq!(alerts.count(AlertKind::HighVibration), 1);
        assert!(!alerts.is_empty());
    }

    #[test]
    fn test_custom_thresholds() {
        let dataset =
            SensorDataset::from_readings(vec![reading(0, 30.0, 50.0, 0)], 2).unwrap();
        let thresholds = AlertThresholds {
            high_temperature: 29.0,
            ..AlertThresholds::default()
        };
        let alerts = Alerts::detect(&dataset, &thresholds);
        assert_eq!(alerts.rows(AlertKind::HighTemperature), &[0]);
        assert!(alerts.low_light.is_empty());
    }
}
