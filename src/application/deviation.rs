//! Deviation Analyzer: z-score comparison against reference populations.
//!
//! For each observed feature covered by the reference profile, computes
//! the standardized distance from both population means and reports which
//! population the observation is statistically closer to.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{FeatureSet, Population, ReferenceProfile};
use crate::{NeurovoiceError, Result};

/// Per-feature deviation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDeviation {
    /// Observed measurement
    pub value: f64,
    /// Healthy population mean
    pub healthy_mean: f64,
    /// Parkinsonian population mean
    pub parkinsons_mean: f64,
    /// Population the observation is statistically closer to
    pub closer_to: Population,
    /// `|value - healthy mean|` in healthy standard deviations
    pub deviation_from_healthy: f64,
    /// `|value - parkinsons mean|` in parkinsonian standard deviations
    pub deviation_from_parkinsons: f64,
}

/// Deviation records keyed by feature name, in input insertion order.
pub type DeviationReport = IndexMap<String, FeatureDeviation>;

/// Stateless analyzer over a shared read-only reference profile.
#[derive(Debug, Clone)]
pub struct DeviationAnalyzer {
    profile: Arc<ReferenceProfile>,
}

impl DeviationAnalyzer {
    /// Create an analyzer over a loaded reference profile.
    #[must_use]
    pub fn new(profile: Arc<ReferenceProfile>) -> Self {
        Self { profile }
    }

    /// Analyze an observed feature set against the reference profile.
    ///
    /// Features absent from the profile are skipped; the report carries
    /// no implied ranking beyond the input's insertion order. Ties in
    /// standardized distance resolve to the parkinsonian population: the
    /// comparison is non-strict and this direction is part of the
    /// reported contract on boundary cases.
    ///
    /// # Errors
    /// Returns `DegenerateReference` naming the feature if either
    /// population has zero standard deviation for a compared feature.
    /// Returns `InvalidFeature` for a non-finite observation.
    pub fn analyze(&self, observed: &FeatureSet) -> Result<DeviationReport> {
        let mut report = DeviationReport::with_capacity(observed.len());

        for (name, _) in observed.iter() {
            let (healthy, parkinsons) = match (
                self.profile.stats(Population::Healthy, name),
                self.profile.stats(Population::Parkinsons, name),
            ) {
                (Some(h), Some(p)) => (h, p),
                _ => continue,
            };
            let value = observed.require(name)?;

            if healthy.std == 0.0 || parkinsons.std == 0.0 {
                return Err(NeurovoiceError::DegenerateReference(name.to_string()));
            }

            let z_healthy = (value - healthy.mean).abs() / healthy.std;
            let z_parkinsons = (value - parkinsons.mean).abs() / parkinsons.std;

            let closer_to = if z_healthy < z_parkinsons {
                Population::Healthy
            } else {
                Population::Parkinsons
            };

            report.insert(
                name.to_string(),
                FeatureDeviation {
                    value,
                    healthy_mean: healthy.mean,
                    parkinsons_mean: parkinsons.mean,
                    closer_to,
                    deviation_from_healthy: z_healthy,
                    deviation_from_parkinsons: z_parkinsons,
                },
            );
        }

        tracing::debug!(
            "Deviation analysis covered {} of {} observed features",
            report.len(),
            observed.len()
        );

        Ok(report)
    }
}
