// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Anomaly injection.
//!
//! A fixed share of rows is picked uniformly without replacement. The picked
//! indices, in draw order, are cut into three contiguous slices:
//!
//! | slice | size               | effect                                  |
//! |-------|--------------------|-----------------------------------------|
//! | 1     | `k / 3`            | temperature spike (offset added)        |
//! | 2     | `k / 3`            | vibration shock on accel X and Y        |
//! | 3     | `k - 2 * (k / 3)`  | light occlusion (value replaced)        |
//!
//! The integer-division remainder always lands in the last slice.

use crate::config::{AnomalyProfile, ValueRange};
use crate::generator::RawSignals;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Category of an injected anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Overheating event on the DHT22.
    TemperatureSpike,
    /// Mechanical shock seen by the MPU6050.
    VibrationShock,
    /// LDR covered or lights off.
    LightOcclusion,
}

impl AnomalyKind {
    /// All kinds, in slice order.
    pub const ALL: [AnomalyKind; 3] = [
        AnomalyKind::TemperatureSpike,
        AnomalyKind::VibrationShock,
        AnomalyKind::LightOcclusion,
    ];

    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyKind::TemperatureSpike => "temperature_spike",
            AnomalyKind::VibrationShock => "vibration_shock",
            AnomalyKind::LightOcclusion => "light_occlusion",
        }
    }
}

/// Rows selected for corruption, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyPlan {
    /// Rows receiving a temperature spike, in draw order.
    pub temperature: Vec<usize>,
    /// Rows receiving a vibration shock, in draw order.
    pub vibration: Vec<usize>,
    /// Rows receiving a light occlusion, in draw order.
    pub light: Vec<usize>,
}

impl AnomalyPlan {
    /// Pick `count` distinct rows out of `sample_count` and split them.
    ///
    /// `count` is capped at `sample_count`.
    pub fn select<R: Rng + ?Sized>(sample_count: usize, count: usize, rng: &mut R) -> Self {
        let count = count.min(sample_count);
        if count == 0 {
            return Self::default();
        }
        let chosen = index::sample(rng, sample_count, count).into_vec();
        Self::from_selection(chosen)
    }

    /// Split an ordered selection into the three slices.
    pub fn from_selection(chosen: Vec<usize>) -> Self {
        let (first, second) = split_points(chosen.len());
        Self {
            temperature: chosen[..first].to_vec(),
            vibration: chosen[first..second].to_vec(),
            light: chosen[second..].to_vec(),
        }
    }

    /// Rows for one kind.
    pub fn rows(&self, kind: AnomalyKind) -> &[usize] {
        match kind {
            AnomalyKind::TemperatureSpike => &self.temperature,
            AnomalyKind::VibrationShock => &self.vibration,
            AnomalyKind::LightOcclusion => &self.light,
        }
    }

    /// Kind injected at `row`, if any.
    pub fn kind_at(&self, row: usize) -> Option<AnomalyKind> {
        AnomalyKind::ALL
            .into_iter()
            .find(|kind| self.rows(*kind).contains(&row))
    }

    /// Total number of corrupted rows.
    pub fn len(&self) -> usize {
        self.temperature.len() + self.vibration.len() + self.light.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice sizes, in slice order.
    pub fn split_sizes(&self) -> [usize; 3] {
        [self.temperature.len(), self.vibration.len(), self.light.len()]
    }

    /// Apply the plan to raw signals, drawing magnitudes from `rng`.
    ///
    /// Draw order: all temperature offsets, then all X shocks, then all Y
    /// shocks, then all occlusion levels. Must run after clipping so that the
    /// occlusion level replaces the clipped light value.
    pub(crate) fn inject<R: Rng + ?Sized>(
        &self,
        signals: &mut RawSignals,
        profile: &AnomalyProfile,
        rng: &mut R,
    ) -> Vec<AnomalyEvent> {
        let mut events = Vec::with_capacity(self.len());

        let temperature_offsets =
            draw_many(&profile.temperature_offset, self.temperature.len(), rng);
        for (&row, &offset) in self.temperature.iter().zip(&temperature_offsets) {
            signals.temperature[row] += offset;
            events.push(AnomalyEvent {
                row,
                effect: AnomalyEffect::TemperatureSpike { offset_c: offset },
            });
        }

        let shocks_x = draw_many(&profile.shock_offset, self.vibration.len(), rng);
        let shocks_y = draw_many(&profile.shock_offset, self.vibration.len(), rng);
        for ((&row, &dx), &dy) in self.vibration.iter().zip(&shocks_x).zip(&shocks_y) {
            signals.accel_x[row] += dx;
            signals.accel_y[row] += dy;
            events.push(AnomalyEvent {
                row,
                effect: AnomalyEffect::VibrationShock {
                    offset_x_mg: dx,
                    offset_y_mg: dy,
                },
            });
        }

        let levels = draw_many(&profile.occlusion_level, self.light.len(), rng);
        for (&row, &level) in self.light.iter().zip(&levels) {
            signals.light[row] = level;
            events.push(AnomalyEvent {
                row,
                effect: AnomalyEffect::LightOcclusion { level_pct: level },
            });
        }

        events
    }
}

/// End of slice 1 and end of slice 2 for `k` selected rows.
pub fn split_points(k: usize) -> (usize, usize) {
    (k / 3, 2 * (k / 3))
}

/// What was done to a row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyEffect {
    TemperatureSpike { offset_c: f64 },
    VibrationShock { offset_x_mg: f64, offset_y_mg: f64 },
    LightOcclusion { level_pct: f64 },
}

impl AnomalyEffect {
    pub fn kind(&self) -> AnomalyKind {
        match self {
            AnomalyEffect::TemperatureSpike { .. } => AnomalyKind::TemperatureSpike,
            AnomalyEffect::VibrationShock { .. } => AnomalyKind::VibrationShock,
            AnomalyEffect::LightOcclusion { .. } => AnomalyKind::LightOcclusion,
        }
    }
}

/// One injected anomaly (ground truth for detectors).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    /// Row index in the dataset.
    pub row: usize,
    #[serde(flatten)]
    pub effect: AnomalyEffect,
}

/// Uniform draw in `[low, high)`; a degenerate range yields `low`.
fn draw<R: Rng + ?Sized>(range: &ValueRange, rng: &mut R) -> f64 {
    if range.low < range.high {
        rng.gen_range(range.low..range.high)
    } else {
        range.low
    }
}

fn draw_many<R: Rng + ?Sized>(range: &ValueRange, n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| draw(range, &mut *rng)).collect()
}
