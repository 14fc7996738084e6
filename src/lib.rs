//! # Neurovoice
//!
//! Decision core for Parkinson's disease screening from acoustic voice
//! measurements.
//!
//! This crate provides:
//! - Rule-based heuristic classifiers over acoustic and perturbation features
//! - A statistical classifier pipeline (scaler + fitted model) over the
//!   22-feature clinical vocabulary
//! - Z-score deviation analysis against healthy and parkinsonian reference
//!   population profiles
//! - An offline genetic optimizer for the perturbation rule thresholds
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (features, thresholds, reference profiles,
//!   predictions)
//! - `ports`: Trait definitions for external model artifacts
//! - `adapters`: Concrete implementations (JSON artifacts, record store)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use domain::{FeatureSet, Label, Prediction};

/// Result type for Neurovoice operations
pub type Result<T> = std::result::Result<T, NeurovoiceError>;

/// Main error type for Neurovoice
#[derive(Debug, thiserror::Error)]
pub enum NeurovoiceError {
    #[error("Missing required feature: {0}")]
    MissingFeature(String),

    #[error("Feature {name} has non-numeric value: {value}")]
    InvalidFeature { name: String, value: f64 },

    #[error("Reference profile has zero variance for feature: {0}")]
    DegenerateReference(String),

    #[error("Model artifact unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model evaluation failed: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
