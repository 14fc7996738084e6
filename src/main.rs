//! Neurovoice: Parkinson's voice-analysis decision core.
//!
//! Thin command-line entry point around the classification services.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use neurovoice::adapters::{ArtifactSet, RecordStore};
use neurovoice::application::{DeviationAnalyzer, HeuristicClassifier, InferenceService};
use neurovoice::domain::{AcousticThresholds, AliasTable, AnalysisRecord, FeatureSet, Prediction};

const USAGE: &str = "Usage:
  neurovoice predict <artifacts-dir> <features.json>
      Run the statistical classifier and deviation analysis over a
      22-feature clinical input (clinical column aliases accepted).

  neurovoice screen <features.json> [record.json]
      Run the acoustic heuristic over a 5-feature input, optionally
      persisting the outcome record.";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("predict") if args.len() == 4 => predict(Path::new(&args[2]), Path::new(&args[3])),
        Some("screen") if args.len() == 3 || args.len() == 4 => {
            screen(Path::new(&args[2]), args.get(3).map(Path::new))
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

fn read_features(path: &Path) -> Result<FeatureSet> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read features file {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Invalid features JSON in {}", path.display()))
}

fn predict(artifacts_dir: &Path, features_path: &Path) -> Result<()> {
    let artifacts = ArtifactSet::load(artifacts_dir)?;
    let aliases = AliasTable::clinical()?;
    let observed = aliases.normalize(&read_features(features_path)?);

    let service = InferenceService::new(
        Arc::clone(&artifacts.scaler),
        Arc::clone(&artifacts.classifier),
    );
    let prediction = service.predict(&observed)?;

    let analyzer = DeviationAnalyzer::new(Arc::clone(&artifacts.profile));
    let analysis = analyzer.analyze(&observed)?;

    let output = serde_json::json!({
        "prediction": prediction,
        "analysis": analysis,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn screen(features_path: &Path, record_path: Option<&Path>) -> Result<()> {
    let observed = read_features(features_path)?;
    let thresholds = AcousticThresholds::default();

    let classifier = HeuristicClassifier::Acoustic(thresholds);
    let label = classifier.evaluate(&observed)?;
    tracing::info!("Acoustic screening: {} risk", label.risk());

    let record = AnalysisRecord::new(Prediction::new(label), observed, thresholds)?;
    if let Some(path) = record_path {
        RecordStore::new(path).save(&record)?;
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
