//! Model ports: Traits for the fitted scaler and classifier.
//!
//! These traits abstract the concrete artifact representation from the
//! inference pipeline. Implementations are loaded once at startup and
//! shared read-only across concurrent requests.

use crate::domain::Label;

/// Errors that can occur while evaluating a fitted artifact.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("Feature vector has {got} entries, model was fit with {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Model produced a non-finite value: {0}")]
    NonFinite(f64),
}

/// Trait for the fitted scaling transform.
///
/// The input vector must be in the exact feature order the scaler was
/// fit with; implementations validate dimensionality only.
pub trait Scaler: Send + Sync {
    /// Apply the fitted transform to an ordered feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if the vector length does
    /// not match the fit-time dimensionality.
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// Trait for the fitted binary classifier.
pub trait ProbabilisticClassifier: Send + Sync {
    /// Predict the binary class for a scaled feature vector.
    ///
    /// # Errors
    /// Returns `ModelError` on dimensionality mismatch or a degenerate
    /// model output.
    fn predict(&self, features: &[f64]) -> Result<Label, ModelError>;

    /// Class probabilities `[p(healthy), p(parkinsons)]` for a scaled
    /// feature vector.
    ///
    /// # Errors
    /// Returns `ModelError` on dimensionality mismatch or a degenerate
    /// model output.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError>;
}
