//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement the
//! feature-to-decision pipeline: vector building, heuristic and
//! statistical classification, deviation analysis, and the offline
//! threshold optimizer.

mod deviation;
mod heuristic;
mod inference;
mod optimizer;
mod vector;

pub use deviation::{DeviationAnalyzer, DeviationReport, FeatureDeviation};
pub use heuristic::HeuristicClassifier;
pub use inference::InferenceService;
pub use optimizer::{OptimizerConfig, ThresholdOptimizer, TrainingRow};
pub use vector::build_vector;
