//! Threshold tables for the two heuristic rule variants.
//!
//! The two tables are independent and never mixed: the acoustic table
//! carries fixed empirical constants derived from training-data
//! percentiles, the perturbation table is produced offline by the
//! genetic optimizer. Both are immutable once a classifier holds them.

use serde::{Deserialize, Serialize};

/// Thresholds for the 5-feature acoustic rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcousticThresholds {
    /// Mean fundamental frequency cutoff in Hz (abnormal below)
    pub pitch: f64,
    /// Mean intensity cutoff in dB (abnormal below)
    pub intensity: f64,
    /// First formant cutoff in Hz (abnormal above)
    pub f1: f64,
    /// Second formant cutoff in Hz (abnormal above)
    pub f2: f64,
    /// Third formant cutoff in Hz (abnormal above)
    pub f3: f64,
}

impl Default for AcousticThresholds {
    /// Empirical constants from the screening training data.
    fn default() -> Self {
        Self {
            pitch: 116.09,
            intensity: 67.89,
            f1: 1343.93,
            f2: 1688.41,
            f3: 1495.40,
        }
    }
}

/// Thresholds for the 7-parameter perturbation rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerturbationThresholds {
    /// Relative jitter gate (abnormal above)
    pub jitter_rel: f64,
    /// Local shimmer gate (abnormal above)
    pub shim_loc: f64,
    /// Shimmer in dB gate (abnormal above)
    pub shim_db: f64,
    /// Harmonics-to-noise ratio gate (abnormal below)
    pub hnr: f64,
    /// Recurrence period density entropy gate (abnormal above)
    pub rpde: f64,
    /// Detrended fluctuation analysis gate (abnormal above)
    pub dfa: f64,
    /// Pitch period entropy gate (abnormal above)
    pub ppe: f64,
}

impl PerturbationThresholds {
    /// Field order used by the optimizer's genome encoding.
    #[must_use]
    pub fn to_array(&self) -> [f64; 7] {
        [
            self.jitter_rel,
            self.shim_loc,
            self.shim_db,
            self.hnr,
            self.rpde,
            self.dfa,
            self.ppe,
        ]
    }

    /// Decode from the optimizer's genome encoding.
    #[must_use]
    pub fn from_array(v: [f64; 7]) -> Self {
        Self {
            jitter_rel: v[0],
            shim_loc: v[1],
            shim_db: v[2],
            hnr: v[3],
            rpde: v[4],
            dfa: v[5],
            ppe: v[6],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acoustic_defaults() {
        let t = AcousticThresholds::default();
        assert!((t.pitch - 116.09).abs() < f64::EPSILON);
        assert!((t.f3 - 1495.40).abs() < f64::EPSILON);
    }

    #[test]
    fn test_perturbation_array_round_trip() {
        let v = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        let t = PerturbationThresholds::from_array(v);
        assert_eq!(t.to_array(), v);
        assert!((t.hnr - 0.4).abs() < f64::EPSILON);
    }
}
