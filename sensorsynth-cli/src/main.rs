// Sensorsynth CLI - Command line runner for the sensorsynth pipeline
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # Sensorsynth CLI
//!
//! Generates one synthetic dataset, exports it, analyzes it and writes the
//! chart documents.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults: 250 samples every 2 s, into ./output
//! sensorsynth --seed 42
//!
//! # Longer run from a config file, without charts
//! sensorsynth --config pipeline.json --samples 5000 --no-charts
//! ```

use clap::Parser;
use sensorsynth::{Pipeline, PipelineConfig, RunOutput};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

/// Synthetic IoT sensor data generator and analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of readings to generate
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Seconds between readings
    #[arg(short, long)]
    interval: Option<u64>,

    /// RNG seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for the CSV, report and chart files
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// JSON pipeline config; flags above override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the chart documents
    #[arg(long)]
    no_charts: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Load the config file (or defaults) and apply flag overrides.
    fn pipeline_config(&self) -> sensorsynth::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        let generator = &mut config.generator;
        if let Some(samples) = self.samples {
            generator.sample_count = samples;
        }
        if let Some(interval) = self.interval {
            generator.interval_seconds = interval;
        }
        if self.seed.is_some() {
            generator.seed = self.seed;
        }
        Ok(config)
    }
}

fn run(args: &Args) -> sensorsynth::Result<RunOutput> {
    let config = args.pipeline_config()?;
    info!(
        "Generating {} samples every {}s (seed: {:?})",
        config.generator.sample_count, config.generator.interval_seconds, config.generator.seed
    );

    Pipeline::new(config)?
        .with_charts(!args.no_charts)
        .run(&args.output_dir)
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Sensorsynth v{}", sensorsynth::VERSION);

    match run(&args) {
        Ok(output) => {
            println!("{}", output.report);
            info!(
                "{} files written to {}",
                output.files().len(),
                args.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
