//! Ports layer: Trait definitions for external model artifacts.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the classification services and the externally-supplied fitted
//! artifacts (scaler, classifier).

mod model;

pub use model::{ModelError, ProbabilisticClassifier, Scaler};
