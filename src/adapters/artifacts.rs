//! Fitted model artifacts exported by the training pipeline.
//!
//! The training pipeline exports three JSON files into an artifact
//! directory:
//! - `scaler.json`: standardization parameters in clinical feature order
//! - `classifier.json`: logistic model weights over the scaled features
//! - `reference_profile.json`: per-population summary statistics
//!
//! Loading happens once at startup. A missing or malformed file is a
//! fatal `ModelUnavailable` condition: the service refuses to start
//! rather than serve requests with a partial model.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{Label, ReferenceProfile, CLINICAL_FEATURES};
use crate::ports::{ModelError, ProbabilisticClassifier, Scaler};
use crate::{NeurovoiceError, Result};

/// Standardization transform fit on the clinical training data.
///
/// Matches the JSON structure produced by the training pipeline's export
/// step: per-feature mean and scale in fit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.len() != self.feature_names.len() || self.scale.len() != self.feature_names.len()
        {
            return Err(format!(
                "Inconsistent dimensions: {} names, {} means, {} scales",
                self.feature_names.len(),
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.feature_names.len() != CLINICAL_FEATURES.len() {
            return Err(format!(
                "Expected {} clinical features, got {}",
                CLINICAL_FEATURES.len(),
                self.feature_names.len()
            ));
        }
        for (name, expected) in self.feature_names.iter().zip(CLINICAL_FEATURES) {
            if name != expected {
                return Err(format!(
                    "Feature order mismatch: expected {expected}, found {name}"
                ));
            }
        }
        for (i, (&m, &s)) in self.mean.iter().zip(&self.scale).enumerate() {
            if !m.is_finite() || !s.is_finite() {
                return Err(format!("Non-finite scaler entry at index {i}"));
            }
            if s == 0.0 {
                return Err(format!(
                    "Zero scale for feature {}: scaler is degenerate",
                    self.feature_names[i]
                ));
            }
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> std::result::Result<Vec<f64>, ModelError> {
        if features.len() != self.mean.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.mean.len(),
                got: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }
}

/// Logistic model over the scaled clinical features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.coefficients.len() != CLINICAL_FEATURES.len() {
            return Err(format!(
                "Expected {} coefficients, got {}",
                CLINICAL_FEATURES.len(),
                self.coefficients.len()
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err("Non-finite model weight".to_string());
        }
        Ok(())
    }

    /// Probability of the positive (parkinsonian) class.
    fn positive_probability(&self, features: &[f64]) -> std::result::Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                got: features.len(),
            });
        }
        let z = self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (&w, &x)| acc + w * x);
        let p = 1.0 / (1.0 + (-z).exp());
        if !p.is_finite() {
            return Err(ModelError::NonFinite(p));
        }
        Ok(p)
    }
}

impl ProbabilisticClassifier for LogisticModel {
    fn predict(&self, features: &[f64]) -> std::result::Result<Label, ModelError> {
        let p = self.positive_probability(features)?;
        Ok(if p >= 0.5 {
            Label::Parkinsons
        } else {
            Label::Healthy
        })
    }

    fn predict_proba(&self, features: &[f64]) -> std::result::Result<[f64; 2], ModelError> {
        let p = self.positive_probability(features)?;
        Ok([1.0 - p, p])
    }
}

/// The full set of startup artifacts, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub scaler: Arc<StandardScaler>,
    pub classifier: Arc<LogisticModel>,
    pub profile: Arc<ReferenceProfile>,
}

impl ArtifactSet {
    /// Load and validate all artifacts from a directory.
    ///
    /// # Errors
    /// Returns `ModelUnavailable` naming the offending file if any
    /// artifact is missing, unreadable, malformed, or fails validation.
    pub fn load(dir: &Path) -> Result<Self> {
        tracing::info!("Loading model artifacts from {}", dir.display());

        let scaler: StandardScaler = load_json(&dir.join("scaler.json"))?;
        scaler
            .validate()
            .map_err(|e| NeurovoiceError::ModelUnavailable(format!("scaler.json: {e}")))?;

        let classifier: LogisticModel = load_json(&dir.join("classifier.json"))?;
        classifier
            .validate()
            .map_err(|e| NeurovoiceError::ModelUnavailable(format!("classifier.json: {e}")))?;

        let profile: ReferenceProfile = load_json(&dir.join("reference_profile.json"))?;

        tracing::info!(
            "Artifacts loaded: {} features, reference profile covers {} features",
            scaler.feature_names.len(),
            profile.len()
        );

        Ok(Self {
            scaler: Arc::new(scaler),
            classifier: Arc::new(classifier),
            profile: Arc::new(profile),
        })
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).map_err(|e| {
        NeurovoiceError::ModelUnavailable(format!("Failed to read {}: {e}", path.display()))
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        NeurovoiceError::ModelUnavailable(format!("Invalid format in {}: {e}", path.display()))
    })
}
