//! Heuristic classifiers: deterministic rule evaluators.
//!
//! Two interchangeable variants of a single classifier capability,
//! sharing validation and error reporting and differing only in their
//! required feature set and rule:
//!
//! - **Acoustic** (5 features): a strict conjunction over pitch,
//!   intensity and the first three formants. Any single feature inside
//!   normal range forces a healthy label.
//! - **Perturbation** (7 features): a mandatory jitter gate, a mandatory
//!   shimmer gate (either sub-condition suffices), and a mandatory
//!   instability gate satisfied by any of four independent measures.
//!
//! Both variants are pure: evaluating twice with identical inputs yields
//! identical output.

use crate::domain::{
    AcousticThresholds, FeatureSet, Label, PerturbationThresholds, ACOUSTIC_FEATURES,
    PERTURBATION_FEATURES,
};
use crate::Result;

/// A rule-based classifier, tagged by variant.
#[derive(Debug, Clone, PartialEq)]
pub enum HeuristicClassifier {
    /// 5-feature acoustic rule with fixed empirical thresholds
    Acoustic(AcousticThresholds),
    /// 7-parameter perturbation rule, thresholds tuned offline
    Perturbation(PerturbationThresholds),
}

impl HeuristicClassifier {
    /// Feature names this variant requires from the input.
    #[must_use]
    pub fn required_features(&self) -> &'static [&'static str] {
        match self {
            Self::Acoustic(_) => &ACOUSTIC_FEATURES,
            Self::Perturbation(_) => &PERTURBATION_FEATURES,
        }
    }

    /// Variant tag for logging.
    #[must_use]
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Acoustic(_) => "acoustic",
            Self::Perturbation(_) => "perturbation",
        }
    }

    /// Evaluate the rule over a feature set.
    ///
    /// Every required feature is bound and validated before the rule is
    /// applied, so a missing feature is reported even when boolean
    /// short-circuiting would otherwise have masked it.
    ///
    /// # Errors
    /// Returns `MissingFeature` naming the absent key, or
    /// `InvalidFeature` for a non-finite value.
    pub fn evaluate(&self, features: &FeatureSet) -> Result<Label> {
        let positive = match self {
            Self::Acoustic(t) => {
                let pitch = features.require("mean_pitch")?;
                let intensity = features.require("mean_intensity")?;
                let f1 = features.require("f1")?;
                let f2 = features.require("f2")?;
                let f3 = features.require("f3")?;

                pitch < t.pitch
                    && intensity < t.intensity
                    && f1 > t.f1
                    && f2 > t.f2
                    && f3 > t.f3
            }
            Self::Perturbation(t) => {
                let jitter_rel = features.require("jitter_rel")?;
                let shim_loc = features.require("shim_loc")?;
                let shim_db = features.require("shim_db")?;
                let hnr = features.require("hnr")?;
                let rpde = features.require("rpde")?;
                let dfa = features.require("dfa")?;
                let ppe = features.require("ppe")?;

                let jitter_gate = jitter_rel > t.jitter_rel;
                let shimmer_gate = shim_loc > t.shim_loc || shim_db > t.shim_db;
                let instability_gate =
                    hnr < t.hnr || rpde > t.rpde || dfa > t.dfa || ppe > t.ppe;

                jitter_gate && shimmer_gate && instability_gate
            }
        };

        Ok(if positive {
            Label::Parkinsons
        } else {
            Label::Healthy
        })
    }
}
