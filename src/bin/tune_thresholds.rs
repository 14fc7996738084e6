//! Offline tuning of the perturbation-rule thresholds.
//!
//! Batch job, separate from the serving path: reads labeled training
//! rows from a JSON file, runs the genetic search, and prints the best
//! threshold table as JSON on stdout.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use neurovoice::application::{OptimizerConfig, ThresholdOptimizer, TrainingRow};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(training_path) = args.get(1) else {
        eprintln!("Usage: tune_thresholds <training.json> [seed]");
        std::process::exit(2);
    };

    let bytes = std::fs::read(training_path)
        .with_context(|| format!("Failed to read training file {training_path}"))?;
    let rows: Vec<TrainingRow> = serde_json::from_slice(&bytes)
        .with_context(|| format!("Invalid training JSON in {training_path}"))?;
    tracing::info!("Loaded {} training rows", rows.len());

    let mut config = OptimizerConfig::default();
    if let Some(seed) = args.get(2) {
        config.seed = seed.parse().context("Seed must be an unsigned integer")?;
    }

    let optimizer = ThresholdOptimizer::new(config);
    let thresholds = optimizer.optimize(&rows)?;
    let accuracy = optimizer.cross_validated_accuracy(&thresholds, &rows)?;
    tracing::info!("Best thresholds score {:.4} cross-validated accuracy", accuracy);

    println!("{}", serde_json::to_string_pretty(&thresholds)?);
    Ok(())
}
