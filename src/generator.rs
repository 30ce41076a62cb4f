// Sensorsynth - Synthetic IoT telemetry
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Core dataset generation logic.
//!
//! Each signal is produced as a whole column: every noise vector is drawn
//! in one go, in a fixed order. With a seeded source the output is
//! bit-identical across runs.

use crate::anomalies::AnomalyPlan;
use crate::config::{GeneratorConfig, SignalProfile};
use crate::dataset::{DatasetMetadata, Reading, SensorDataset};
use crate::error::{Result, SynthError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Column-oriented signals before rounding.
#[derive(Debug, Clone)]
pub(crate) struct RawSignals {
    pub timestamps: Vec<u64>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub light: Vec<f64>,
    pub accel_x: Vec<f64>,
    pub accel_y: Vec<f64>,
    pub accel_z: Vec<f64>,
    pub gyro_x: Vec<f64>,
    pub gyro_y: Vec<f64>,
    pub gyro_z: Vec<f64>,
}

impl RawSignals {
    /// Rounded rows, in timestamp order.
    fn into_readings(self) -> Vec<Reading> {
        (0..self.timestamps.len())
            .map(|i| Reading {
                timestamp: self.timestamps[i],
                temperature: round2(self.temperature[i]),
                humidity: round2(self.humidity[i]),
                light: round2(self.light[i]),
                accel_x: round_int(self.accel_x[i]),
                accel_y: round_int(self.accel_y[i]),
                accel_z: round_int(self.accel_z[i]),
                gyro_x: round_int(self.gyro_x[i]),
                gyro_y: round_int(self.gyro_y[i]),
                gyro_z: round_int(self.gyro_z[i]),
            })
            .collect()
    }
}

/// Synthetic DHT22 + LDR + MPU6050 generator.
#[derive(Debug, Clone)]
pub struct SyntheticSensorGenerator {
    config: GeneratorConfig,
}

impl SyntheticSensorGenerator {
    /// Create a generator, rejecting invalid configurations up front.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate using the configured seed, or OS entropy when unseeded.
    pub fn generate(&self) -> Result<SensorDataset> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with(&mut rng)
    }

    /// Generate from an explicit random source.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SensorDataset> {
        let config = &self.config;
        let profile = &config.profile;
        let n = config.sample_count;

        log::debug!(
            "Generating {} samples every {}s (seed: {:?})",
            n,
            config.interval_seconds,
            config.seed
        );

        let mut signals = synthesize(n, config.interval_seconds, profile, rng)?;

        let plan = AnomalyPlan::select(n, config.anomaly_count(), rng);
        let events = plan.inject(&mut signals, &profile.anomalies, rng);

        let [temperature, vibration, light] = plan.split_sizes();
        log::debug!(
            "Injected {} anomalies (temperature: {}, vibration: {}, light: {})",
            plan.len(),
            temperature,
            vibration,
            light
        );

        let metadata = DatasetMetadata {
            interval_seconds: config.interval_seconds,
            seed: config.seed,
        };
        let dataset =
            SensorDataset::from_generated(signals.into_readings(), metadata, plan, events);

        log::info!("Generated {} readings", dataset.len());
        Ok(dataset)
    }
}

/// Generate `sample_count` readings `interval_seconds` apart with the default profile.
pub fn generate<R: Rng + ?Sized>(
    sample_count: usize,
    interval_seconds: u64,
    rng: &mut R,
) -> Result<SensorDataset> {
    let config = GeneratorConfig::new()
        .with_sample_count(sample_count)
        .with_interval_secs(interval_seconds);
    SyntheticSensorGenerator::new(config)?.generate_with(rng)
}

/// Baseline signals: periodic components, coupling, noise and clipping.
fn synthesize<R: Rng + ?Sized>(
    n: usize,
    interval_seconds: u64,
    profile: &SignalProfile,
    rng: &mut R,
) -> Result<RawSignals> {
    let timestamps: Vec<u64> = (0..n as u64).map(|i| i * interval_seconds).collect();
    let t: Vec<f64> = timestamps.iter().map(|&ts| ts as f64).collect();

    let tp = &profile.temperature;
    let temperature_noise = gaussian("temperature.noise_std", tp.noise_std, n, rng)?;
    let temperature: Vec<f64> = t
        .iter()
        .zip(&temperature_noise)
        .map(|(&t, &noise)| {
            tp.base
                + (t * tp.trend_frequency).sin() * tp.trend_amplitude
                + (t * tp.cycle_frequency).sin() * tp.cycle_amplitude
                + noise
        })
        .collect();

    let hp = &profile.humidity;
    let humidity_noise = gaussian("humidity.noise_std", hp.noise_std, n, rng)?;
    let humidity: Vec<f64> = temperature
        .iter()
        .zip(&humidity_noise)
        .map(|(&temp, &noise)| {
            let coupled = (temp - tp.base) * hp.temperature_coupling;
            (hp.base + coupled + noise).clamp(hp.clip.low, hp.clip.high)
        })
        .collect();

    let lp = &profile.light;
    let light_noise = gaussian("light.noise_std", lp.noise_std, n, rng)?;
    let light: Vec<f64> = t
        .iter()
        .zip(&light_noise)
        .map(|(&t, &noise)| {
            let cycle = lp.base + lp.amplitude * (t * lp.frequency).sin();
            (cycle + noise).clamp(lp.clip.low, lp.clip.high)
        })
        .collect();

    let ip = &profile.inertial;
    let accel_z = gaussian("inertial.accel_z_std", ip.accel_z_std, n, rng)?
        .into_iter()
        .map(|v| ip.gravity_mg + v)
        .collect();
    let accel_x = gaussian("inertial.accel_xy_std", ip.accel_xy_std, n, rng)?;
    let accel_y = gaussian("inertial.accel_xy_std", ip.accel_xy_std, n, rng)?;

    let gyro_x = gaussian("inertial.gyro_xy_std", ip.gyro_xy_std, n, rng)?;
    let gyro_y = gaussian("inertial.gyro_xy_std", ip.gyro_xy_std, n, rng)?;
    let gyro_z = gaussian("inertial.gyro_z_std", ip.gyro_z_std, n, rng)?;

    Ok(RawSignals {
        timestamps,
        temperature,
        humidity,
        light,
        accel_x,
        accel_y,
        accel_z,
        gyro_x,
        gyro_y,
        gyro_z,
    })
}

/// `n` zero-mean normal draws.
fn gaussian<R: Rng + ?Sized>(
    name: &'static str,
    std: f64,
    n: usize,
    rng: &mut R,
) -> Result<Vec<f64>> {
    let dist = Normal::new(0.0, std).map_err(|e| SynthError::invalid(name, e.to_string()))?;
    Ok((0..n).map(|_| dist.sample(&mut *rng)).collect())
}

/// Round to 2 decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Round to the nearest integer, ties to even.
pub fn round_int(value: f64) -> i32 {
    value.round_ties_even() as i32
}
