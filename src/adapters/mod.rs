//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with the outside world:
//! - `artifacts`: fitted model artifacts exported as JSON by the training
//!   pipeline (scaler, classifier, reference profile)
//! - `records`: structured JSON store for the latest analysis outcome

pub mod artifacts;
pub mod records;

pub use artifacts::{ArtifactSet, LogisticModel, StandardScaler};
pub use records::RecordStore;
