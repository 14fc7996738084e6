//! Inference service: Orchestrates the statistical classification
//! pipeline.
//!
//! This service coordinates:
//! - Ordered vector building over the clinical vocabulary
//! - The fitted scaling transform
//! - Classification and confidence selection

use std::sync::Arc;

use crate::application::vector::build_vector;
use crate::domain::{FeatureSet, Prediction, CLINICAL_FEATURES};
use crate::ports::{ProbabilisticClassifier, Scaler};
use crate::Result;

/// Service for running the statistical classifier.
///
/// The scaler and classifier are supplied at startup and shared
/// read-only; their absence is a startup failure, never a per-request
/// error.
pub struct InferenceService<S, C>
where
    S: Scaler,
    C: ProbabilisticClassifier,
{
    scaler: Arc<S>,
    classifier: Arc<C>,
}

impl<S, C> InferenceService<S, C>
where
    S: Scaler,
    C: ProbabilisticClassifier,
{
    /// Create a new inference service.
    pub fn new(scaler: Arc<S>, classifier: Arc<C>) -> Self {
        Self { scaler, classifier }
    }

    /// Run the full pipeline on a clinical feature set.
    ///
    /// The reported confidence is the probability of whichever class the
    /// classifier predicted, not hardcoded to the positive class.
    ///
    /// # Errors
    /// Returns `MissingFeature`/`InvalidFeature` for bad input, or a
    /// `Model` error if an artifact rejects the vector.
    pub fn predict(&self, features: &FeatureSet) -> Result<Prediction> {
        tracing::debug!("Building ordered clinical feature vector");
        let vector = build_vector(features, &CLINICAL_FEATURES)?;

        tracing::debug!("Applying fitted scaling transform");
        let scaled = self.scaler.transform(&vector)?;

        let label = self.classifier.predict(&scaled)?;
        let proba = self.classifier.predict_proba(&scaled)?;
        let probability = proba[label.index()];

        tracing::info!(
            "Inference complete: label={}, confidence={:.2}%",
            label,
            probability * 100.0
        );

        Ok(Prediction::with_probability(label, probability))
    }
}
