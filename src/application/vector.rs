//! Feature Vector Builder.
//!
//! Maps a named-feature input into the fixed ordered vector expected by
//! an order-sensitive scoring function. The output ordering must exactly
//! match the ordering the downstream scaler and model were fit with; the
//! model is unaware of feature names.

use crate::domain::FeatureSet;
use crate::Result;

/// Build an ordered feature vector from a named-feature input.
///
/// Pure function of its inputs; no coercion beyond the numeric
/// validation performed by [`FeatureSet::require`].
///
/// # Errors
/// Returns `MissingFeature` naming the first absent key in `order`, or
/// `InvalidFeature` if a present value is non-finite.
pub fn build_vector(raw: &FeatureSet, order: &[&str]) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(order.len());
    for &name in order {
        out.push(raw.require(name)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CLINICAL_FEATURES;
    use crate::NeurovoiceError;

    #[test]
    fn test_order_is_the_contract() {
        let raw: FeatureSet = [("b", 2.0), ("a", 1.0), ("c", 3.0)].into_iter().collect();
        let v = build_vector(&raw, &["a", "b", "c"]).expect("Should build");
        assert_eq!(v, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_feature_named_exactly() {
        let mut raw = FeatureSet::new();
        for name in CLINICAL_FEATURES {
            raw.insert(name, 1.0);
        }
        // Drop each feature in turn; the error must name that feature.
        for missing in CLINICAL_FEATURES {
            let mut partial = FeatureSet::new();
            for (name, value) in raw.iter() {
                if name != missing {
                    partial.insert(name, value);
                }
            }
            let order: Vec<&str> = CLINICAL_FEATURES.to_vec();
            match build_vector(&partial, &order).unwrap_err() {
                NeurovoiceError::MissingFeature(name) => assert_eq!(name, missing),
                other => panic!("Unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let mut raw = FeatureSet::new();
        raw.insert("a", 1.0);
        raw.insert("b", f64::INFINITY);
        assert!(matches!(
            build_vector(&raw, &["a", "b"]).unwrap_err(),
            NeurovoiceError::InvalidFeature { name, .. } if name == "b"
        ));
    }
}
