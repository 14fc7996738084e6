//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external I/O.
//! All types are serializable and implement strict validation.

mod features;
mod prediction;
mod reference;
mod thresholds;

pub use features::{
    AliasTable, FeatureSet, ACOUSTIC_FEATURES, CLINICAL_FEATURES, PERTURBATION_FEATURES,
};
pub use prediction::{AnalysisRecord, Label, Prediction};
pub use reference::{FeatureStats, Population, ReferenceProfile};
pub use thresholds::{AcousticThresholds, PerturbationThresholds};
