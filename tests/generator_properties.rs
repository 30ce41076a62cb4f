//! Property-based tests for the generator.
//!
//! Run with: cargo test --test generator_properties

use proptest::prelude::*;
use sensorsynth::{AnomalyKind, GeneratorConfig, SensorDataset, SyntheticSensorGenerator};

fn generate(samples: usize, interval: u64, seed: u64) -> SensorDataset {
    let config = GeneratorConfig::new()
        .with_sample_count(samples)
        .with_interval_secs(interval)
        .with_seed(seed);
    SyntheticSensorGenerator::new(config)
        .unwrap()
        .generate()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_shape_and_timestamps(samples in 1usize..600, interval in 1u64..30, seed in any::<u64>()) {
        let dataset = generate(samples, interval, seed);
        prop_assert_eq!(dataset.len(), samples);

        let ts = dataset.timestamps();
        prop_assert_eq!(ts[0], 0);
        for pair in ts.windows(2) {
            prop_assert_eq!(pair[1] - pair[0], interval);
        }
    }

    #[test]
    fn prop_clipped_ranges(samples in 1usize..600, seed in any::<u64>()) {
        let dataset = generate(samples, 2, seed);
        for r in dataset.iter() {
            prop_assert!((30.0..=85.0).contains(&r.humidity), "humidity {}", r.humidity);
            prop_assert!((0.0..=100.0).contains(&r.light), "light {}", r.light);
        }
    }

    #[test]
    fn prop_anomaly_partition(samples in 1usize..600, seed in any::<u64>()) {
        let dataset = generate(samples, 2, seed);
        let plan = dataset.plan();
        let k = samples / 10;
        prop_assert_eq!(plan.len(), k);
        prop_assert_eq!(plan.split_sizes(), [k / 3, k / 3, k - 2 * (k / 3)]);

        let mut all: Vec<usize> = AnomalyKind::ALL
            .iter()
            .flat_map(|kind| plan.rows(*kind).iter().copied())
            .collect();
        all.sort_unstable();
        all.dedup();
        prop_assert_eq!(all.len(), k);
        prop_assert!(all.iter().all(|&row| row < samples));
    }

    #[test]
    fn prop_deterministic(samples in 1usize..300, seed in any::<u64>()) {
        let a = generate(samples, 2, seed);
        let b = generate(samples, 2, seed);
        prop_assert_eq!(a.readings(), b.readings());
        prop_assert_eq!(a.anomalies(), b.anomalies());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn prop_finite_up_to_ten_thousand(samples in 5_000usize..=10_000, seed in any::<u64>()) {
        let dataset = generate(samples, 2, seed);
        for r in dataset.iter() {
            prop_assert!(r.temperature.is_finite());
            prop_assert!(r.humidity.is_finite());
            prop_assert!(r.light.is_finite());
            prop_assert!(r.vibration_magnitude().is_finite());
        }
    }
}
