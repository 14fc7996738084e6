//! Prediction and analysis-record types.
//!
//! Represents the output of the heuristic and statistical classifiers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::features::{FeatureSet, ACOUSTIC_FEATURES};
use super::thresholds::AcousticThresholds;
use crate::Result;

/// Binary classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Label {
    /// No parkinsonian markers detected (class 0)
    Healthy,
    /// Parkinsonian markers detected (class 1)
    Parkinsons,
}

impl Label {
    /// Index of this class in a probability vector.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Healthy => 0,
            Self::Parkinsons => 1,
        }
    }

    /// Human-readable diagnosis text.
    #[must_use]
    pub fn diagnosis(&self) -> &'static str {
        match self {
            Self::Healthy => "No Parkinson's Disease Detected",
            Self::Parkinsons => "Parkinson's Disease Detected",
        }
    }

    /// Screening risk wording used in generated reports.
    #[must_use]
    pub fn risk(&self) -> &'static str {
        match self {
            Self::Healthy => "Low",
            Self::Parkinsons => "High",
        }
    }
}

impl TryFrom<u8> for Label {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Healthy),
            1 => Ok(Self::Parkinsons),
            other => Err(format!("Invalid class label: {other}")),
        }
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label.index() as u8
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::Parkinsons => write!(f, "Parkinson's"),
        }
    }
}

/// Output of a single classification.
///
/// Ephemeral: produced per request and owned by the caller, never shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Binary class
    pub label: Label,

    /// Confidence for the predicted class, when the classifier provides one
    pub probability: Option<f64>,

    /// Human-readable diagnosis
    pub diagnosis: String,
}

impl Prediction {
    /// Create a prediction without a probability (heuristic classifiers).
    #[must_use]
    pub fn new(label: Label) -> Self {
        Self {
            label,
            probability: None,
            diagnosis: label.diagnosis().to_string(),
        }
    }

    /// Create a prediction with the classifier's confidence for the
    /// predicted class.
    #[must_use]
    pub fn with_probability(label: Label, probability: f64) -> Self {
        Self {
            label,
            probability: Some(probability),
            diagnosis: label.diagnosis().to_string(),
        }
    }
}

/// Persisted outcome of an acoustic screening.
///
/// Stores the observed values, the thresholds in force, and the signed
/// distance of each observation from its threshold. Written and read as
/// structured JSON only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Unique record identifier
    pub id: String,

    /// Classification outcome
    pub prediction: Prediction,

    /// Observed acoustic measurements
    pub observed: FeatureSet,

    /// Threshold table the rule was evaluated against
    pub thresholds: AcousticThresholds,

    /// Signed `value - threshold` per acoustic feature
    pub differences: IndexMap<String, f64>,

    /// Timestamp of the analysis
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl AnalysisRecord {
    /// Build a record from a screening outcome.
    ///
    /// # Errors
    /// Returns `MissingFeature` if any acoustic feature is absent from
    /// the observed set.
    pub fn new(
        prediction: Prediction,
        observed: FeatureSet,
        thresholds: AcousticThresholds,
    ) -> Result<Self> {
        let cutoffs = [
            thresholds.pitch,
            thresholds.intensity,
            thresholds.f1,
            thresholds.f2,
            thresholds.f3,
        ];
        let mut differences = IndexMap::with_capacity(ACOUSTIC_FEATURES.len());
        for (name, cutoff) in ACOUSTIC_FEATURES.iter().zip(cutoffs) {
            let value = observed.require(name)?;
            differences.insert(format!("{name}_diff"), value - cutoff);
        }
        Ok(Self {
            id: record_id(),
            prediction,
            observed,
            thresholds,
            differences,
            created_at: chrono::Utc::now(),
        })
    }
}

/// Generate a random record identifier (UUID v4 format) using a CSPRNG.
fn record_id() -> String {
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    let mut rng = ChaCha20Rng::from_entropy();
    let bytes: [u8; 16] = rng.gen();

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        (bytes[6] & 0x0f) | 0x40, bytes[7],
        (bytes[8] & 0x3f) | 0x80, bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serde_as_class_index() {
        let json = serde_json::to_string(&Label::Parkinsons).expect("Should serialize");
        assert_eq!(json, "1");
        let back: Label = serde_json::from_str("0").expect("Should parse");
        assert_eq!(back, Label::Healthy);
        assert!(serde_json::from_str::<Label>("2").is_err());
    }

    #[test]
    fn test_prediction_diagnosis_text() {
        let p = Prediction::new(Label::Parkinsons);
        assert_eq!(p.diagnosis, "Parkinson's Disease Detected");
        assert!(p.probability.is_none());

        let p = Prediction::with_probability(Label::Healthy, 0.92);
        assert_eq!(p.diagnosis, "No Parkinson's Disease Detected");
        assert_eq!(p.probability, Some(0.92));
    }

    #[test]
    fn test_record_differences() {
        let observed: FeatureSet = [
            ("mean_pitch", 100.0),
            ("mean_intensity", 60.0),
            ("f1", 1400.0),
            ("f2", 1700.0),
            ("f3", 1600.0),
        ]
        .into_iter()
        .collect();
        let record = AnalysisRecord::new(
            Prediction::new(Label::Parkinsons),
            observed,
            AcousticThresholds::default(),
        )
        .expect("Should build");

        let pitch_diff = record.differences["mean_pitch_diff"];
        assert!((pitch_diff - (100.0 - 116.09)).abs() < 1e-9);
        assert_eq!(record.differences.len(), 5);
        assert_eq!(record.id.len(), 36);
    }

    #[test]
    fn test_record_requires_all_acoustic_features() {
        let observed: FeatureSet = [("mean_pitch", 100.0)].into_iter().collect();
        let err = AnalysisRecord::new(
            Prediction::new(Label::Healthy),
            observed,
            AcousticThresholds::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::NeurovoiceError::MissingFeature(name) if name == "mean_intensity"
        ));
    }

    #[test]
    fn test_record_id_format() {
        let a = record_id();
        let b = record_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
