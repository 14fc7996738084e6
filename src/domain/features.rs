//! Feature vocabularies and the named-feature input type.
//!
//! Three fixed vocabularies are in use:
//! - The 5-feature acoustic set measured directly from a recording
//!   (mean pitch, mean intensity, first three formants).
//! - The 7-feature perturbation set used by the tunable screening rule.
//! - The 22-feature clinical set (UCI Parkinsons telemonitoring columns)
//!   consumed by the fitted statistical model, in the exact order the
//!   scaler and model were fit with.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{NeurovoiceError, Result};

/// Features extracted directly from a voice recording.
pub const ACOUSTIC_FEATURES: [&str; 5] = ["mean_pitch", "mean_intensity", "f1", "f2", "f3"];

/// Features consumed by the 7-parameter perturbation rule.
pub const PERTURBATION_FEATURES: [&str; 7] =
    ["jitter_rel", "shim_loc", "shim_db", "hnr", "rpde", "dfa", "ppe"];

/// Clinical feature set in model-fit order. The statistical scaler and
/// classifier are order-sensitive and unaware of names, so this ordering
/// is a hard contract.
pub const CLINICAL_FEATURES: [&str; 22] = [
    "mdvp_fo_hz",
    "mdvp_fhi_hz",
    "mdvp_flo_hz",
    "mdvp_jitter_percent",
    "mdvp_jitter_abs",
    "mdvp_rap",
    "mdvp_ppq",
    "jitter_ddp",
    "mdvp_shimmer",
    "mdvp_shimmer_db",
    "shimmer_apq3",
    "shimmer_apq5",
    "mdvp_apq",
    "shimmer_dda",
    "nhr",
    "hnr",
    "rpde",
    "dfa",
    "spread1",
    "spread2",
    "d2",
    "ppe",
];

/// Clinical alias -> internal field name, one pair per clinical feature.
/// Aliases follow the published dataset column headers.
const CLINICAL_ALIASES: [(&str, &str); 22] = [
    ("MDVP:Fo(Hz)", "mdvp_fo_hz"),
    ("MDVP:Fhi(Hz)", "mdvp_fhi_hz"),
    ("MDVP:Flo(Hz)", "mdvp_flo_hz"),
    ("MDVP:Jitter(%)", "mdvp_jitter_percent"),
    ("MDVP:Jitter(Abs)", "mdvp_jitter_abs"),
    ("MDVP:RAP", "mdvp_rap"),
    ("MDVP:PPQ", "mdvp_ppq"),
    ("Jitter:DDP", "jitter_ddp"),
    ("MDVP:Shimmer", "mdvp_shimmer"),
    ("MDVP:Shimmer(dB)", "mdvp_shimmer_db"),
    ("Shimmer:APQ3", "shimmer_apq3"),
    ("Shimmer:APQ5", "shimmer_apq5"),
    ("MDVP:APQ", "mdvp_apq"),
    ("Shimmer:DDA", "shimmer_dda"),
    ("NHR", "nhr"),
    ("HNR", "hnr"),
    ("RPDE", "rpde"),
    ("DFA", "dfa"),
    ("spread1", "spread1"),
    ("spread2", "spread2"),
    ("D2", "d2"),
    ("PPE", "ppe"),
];

/// A named-feature input: feature name -> measured value.
///
/// Insertion order is preserved and carried through to derived outputs
/// such as the deviation report. No implicit defaulting: absent keys stay
/// absent and are surfaced as `MissingFeature` on access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet {
    values: IndexMap<String, f64>,
}

impl FeatureSet {
    /// Create an empty feature set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a measurement, replacing any previous value for the name.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Look up a measurement by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Check whether a feature is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Look up a required measurement, validating that it is a finite number.
    ///
    /// # Errors
    /// Returns `MissingFeature` naming the key if absent, or
    /// `InvalidFeature` if the stored value is NaN or infinite.
    pub fn require(&self, name: &str) -> Result<f64> {
        let value = self
            .get(name)
            .ok_or_else(|| NeurovoiceError::MissingFeature(name.to_string()))?;
        if !value.is_finite() {
            return Err(NeurovoiceError::InvalidFeature {
                name: name.to_string(),
                value,
            });
        }
        Ok(value)
    }

    /// Number of features present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, f64)> for FeatureSet {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}

/// Bidirectional mapping between clinical column aliases and internal
/// field names, validated for bijectivity at construction.
///
/// Replaces ad-hoc string lookups across the two naming schemes: every
/// alias resolves to exactly one internal name and vice versa.
#[derive(Debug, Clone)]
pub struct AliasTable {
    forward: HashMap<&'static str, &'static str>,
    reverse: HashMap<&'static str, &'static str>,
}

impl AliasTable {
    /// Build the clinical alias table.
    ///
    /// # Errors
    /// Returns `Validation` if the pair list is not a bijection (duplicate
    /// alias or duplicate internal name).
    pub fn clinical() -> Result<Self> {
        let mut forward = HashMap::with_capacity(CLINICAL_ALIASES.len());
        let mut reverse = HashMap::with_capacity(CLINICAL_ALIASES.len());
        for (alias, internal) in CLINICAL_ALIASES {
            if forward.insert(alias, internal).is_some() {
                return Err(NeurovoiceError::Validation(format!(
                    "Duplicate clinical alias: {alias}"
                )));
            }
            if reverse.insert(internal, alias).is_some() {
                return Err(NeurovoiceError::Validation(format!(
                    "Duplicate internal feature name: {internal}"
                )));
            }
        }
        Ok(Self { forward, reverse })
    }

    /// Resolve a clinical alias to its internal name.
    #[must_use]
    pub fn internal(&self, alias: &str) -> Option<&'static str> {
        self.forward.get(alias).copied()
    }

    /// Resolve an internal name back to its clinical alias.
    #[must_use]
    pub fn alias(&self, internal: &str) -> Option<&'static str> {
        self.reverse.get(internal).copied()
    }

    /// Rewrite a feature set so that clinical aliases become internal
    /// names. Names that are neither an alias nor an internal name pass
    /// through unchanged; order is preserved.
    #[must_use]
    pub fn normalize(&self, raw: &FeatureSet) -> FeatureSet {
        raw.iter()
            .map(|(name, value)| match self.internal(name) {
                Some(internal) => (internal.to_string(), value),
                None => (name.to_string(), value),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_names_the_feature() {
        let fs = FeatureSet::new();
        let err = fs.require("mean_pitch").unwrap_err();
        match err {
            NeurovoiceError::MissingFeature(name) => assert_eq!(name, "mean_pitch"),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_require_rejects_non_finite() {
        let mut fs = FeatureSet::new();
        fs.insert("hnr", f64::NAN);
        assert!(matches!(
            fs.require("hnr"),
            Err(NeurovoiceError::InvalidFeature { .. })
        ));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let fs: FeatureSet = [("f3", 1.0), ("f1", 2.0), ("f2", 3.0)]
            .into_iter()
            .collect();
        let names: Vec<&str> = fs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["f3", "f1", "f2"]);
    }

    #[test]
    fn test_json_object_round_trip() {
        let mut fs = FeatureSet::new();
        fs.insert("mean_pitch", 100.5);
        fs.insert("f1", 1400.0);
        let json = serde_json::to_string(&fs).expect("Should serialize");
        let back: FeatureSet = serde_json::from_str(&json).expect("Should parse");
        assert_eq!(back, fs);
    }

    #[test]
    fn test_non_numeric_json_value_rejected() {
        let result: std::result::Result<FeatureSet, _> =
            serde_json::from_str(r#"{"mean_pitch": "high"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_alias_table_is_bijective() {
        let table = AliasTable::clinical().expect("Should build");
        for name in CLINICAL_FEATURES {
            let alias = table.alias(name).expect("Every internal name has an alias");
            assert_eq!(table.internal(alias), Some(name));
        }
    }

    #[test]
    fn test_normalize_rewrites_aliases() {
        let table = AliasTable::clinical().expect("Should build");
        let raw: FeatureSet = [("MDVP:Fo(Hz)", 120.5), ("hnr", 24.6), ("extra", 1.0)]
            .into_iter()
            .collect();
        let normalized = table.normalize(&raw);
        assert_eq!(normalized.get("mdvp_fo_hz"), Some(120.5));
        assert_eq!(normalized.get("hnr"), Some(24.6));
        assert_eq!(normalized.get("extra"), Some(1.0));
        assert!(!normalized.contains("MDVP:Fo(Hz)"));
    }
}
