//! Reference population profiles.
//!
//! Per-feature summary statistics for the two labeled populations,
//! computed once offline from the training data. Read-only at runtime and
//! shared across concurrent analyses.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{NeurovoiceError, Result};

/// The two labeled reference populations.
///
/// The serialized names match the display strings: generated reports
/// consume `closer_to` verbatim, so the wire form is part of the
/// reporting contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Population {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Parkinson's")]
    Parkinsons,
}

impl std::fmt::Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::Parkinsons => write!(f, "Parkinson's"),
        }
    }
}

/// Summary statistics for one feature within one population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-feature statistics for both populations.
///
/// Both populations must cover the same feature names; `std` must be
/// finite and non-negative. A zero `std` is accepted here and rejected
/// only when a z-score against that feature is actually requested, so a
/// profile with a degenerate column can still serve the remaining ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProfileData")]
pub struct ReferenceProfile {
    healthy: IndexMap<String, FeatureStats>,
    parkinsons: IndexMap<String, FeatureStats>,
}

/// Raw serialized form, validated into a `ReferenceProfile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileData {
    healthy: IndexMap<String, FeatureStats>,
    parkinsons: IndexMap<String, FeatureStats>,
}

impl TryFrom<ProfileData> for ReferenceProfile {
    type Error = NeurovoiceError;

    fn try_from(data: ProfileData) -> Result<Self> {
        Self::from_parts(data.healthy, data.parkinsons)
    }
}

impl ReferenceProfile {
    /// Build a profile from per-population statistic maps.
    ///
    /// # Errors
    /// Returns `Validation` if the populations cover different feature
    /// names or any statistic is non-finite or has negative `std`.
    pub fn from_parts(
        healthy: IndexMap<String, FeatureStats>,
        parkinsons: IndexMap<String, FeatureStats>,
    ) -> Result<Self> {
        for name in healthy.keys() {
            if !parkinsons.contains_key(name) {
                return Err(NeurovoiceError::Validation(format!(
                    "Feature {name} present for healthy but not parkinsons population"
                )));
            }
        }
        for name in parkinsons.keys() {
            if !healthy.contains_key(name) {
                return Err(NeurovoiceError::Validation(format!(
                    "Feature {name} present for parkinsons but not healthy population"
                )));
            }
        }
        for (name, stats) in healthy.iter().chain(parkinsons.iter()) {
            if !(stats.mean.is_finite()
                && stats.std.is_finite()
                && stats.min.is_finite()
                && stats.max.is_finite())
            {
                return Err(NeurovoiceError::Validation(format!(
                    "Non-finite statistics for feature {name}"
                )));
            }
            if stats.std < 0.0 {
                return Err(NeurovoiceError::Validation(format!(
                    "Negative standard deviation for feature {name}"
                )));
            }
        }
        Ok(Self {
            healthy,
            parkinsons,
        })
    }

    /// Look up statistics for a feature within a population.
    #[must_use]
    pub fn stats(&self, population: Population, feature: &str) -> Option<&FeatureStats> {
        match population {
            Population::Healthy => self.healthy.get(feature),
            Population::Parkinsons => self.parkinsons.get(feature),
        }
    }

    /// Whether the profile covers a feature (both populations, by
    /// construction).
    #[must_use]
    pub fn contains(&self, feature: &str) -> bool {
        self.healthy.contains_key(feature)
    }

    /// Feature names covered by the profile.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.healthy.keys().map(String::as_str)
    }

    /// Number of covered features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.healthy.len()
    }

    /// Whether the profile is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.healthy.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, std: f64) -> FeatureStats {
        FeatureStats {
            mean,
            std,
            min: mean - 3.0 * std,
            max: mean + 3.0 * std,
        }
    }

    #[test]
    fn test_population_serializes_as_display_name() {
        let healthy = serde_json::to_string(&Population::Healthy).expect("Should serialize");
        let parkinsons = serde_json::to_string(&Population::Parkinsons).expect("Should serialize");
        assert_eq!(healthy, "\"Healthy\"");
        assert_eq!(parkinsons, "\"Parkinson's\"");
    }

    #[test]
    fn test_population_mismatch_rejected() {
        let healthy: IndexMap<String, FeatureStats> =
            [("hnr".to_string(), stats(24.0, 4.0))].into_iter().collect();
        let parkinsons: IndexMap<String, FeatureStats> =
            [("rpde".to_string(), stats(0.5, 0.1))].into_iter().collect();
        assert!(ReferenceProfile::from_parts(healthy, parkinsons).is_err());
    }

    #[test]
    fn test_negative_std_rejected() {
        let healthy: IndexMap<String, FeatureStats> =
            [("hnr".to_string(), stats(24.0, -1.0))].into_iter().collect();
        let parkinsons: IndexMap<String, FeatureStats> =
            [("hnr".to_string(), stats(20.0, 4.0))].into_iter().collect();
        assert!(ReferenceProfile::from_parts(healthy, parkinsons).is_err());
    }

    #[test]
    fn test_json_validation_on_deserialize() {
        let json = r#"{
            "healthy": {"hnr": {"mean": 24.0, "std": 4.0, "min": 10.0, "max": 33.0}},
            "parkinsons": {"hnr": {"mean": 20.0, "std": 4.5, "min": 8.0, "max": 33.0}}
        }"#;
        let profile: ReferenceProfile = serde_json::from_str(json).expect("Should parse");
        assert!(profile.contains("hnr"));
        assert_eq!(
            profile
                .stats(Population::Parkinsons, "hnr")
                .map(|s| s.mean),
            Some(20.0)
        );

        let bad = r#"{
            "healthy": {"hnr": {"mean": 24.0, "std": 4.0, "min": 10.0, "max": 33.0}},
            "parkinsons": {}
        }"#;
        assert!(serde_json::from_str::<ReferenceProfile>(bad).is_err());
    }
}
