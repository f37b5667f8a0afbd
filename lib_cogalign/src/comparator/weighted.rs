use crate::{
    error::Result,
    segment::{FeatureValue, Sequence},
};

use super::{Comparator, check_finite_weights, feature_differences};

/// Sums the absolute feature differences, each multiplied by its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedComparator {
    weights: Vec<f64>,
}

impl WeightedComparator {
    pub fn new(weights: Vec<f64>) -> Result<Self> {
        check_finite_weights(&weights, "feature weights")?;
        Ok(Self { weights })
    }

    /// Every feature has weight one.
    pub fn uniform(feature_count: usize) -> Self {
        Self {
            weights: vec![1.0; feature_count],
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl<T: FeatureValue> Comparator<T> for WeightedComparator {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        feature_differences(&left[i], &right[j])
            .zip(&self.weights)
            .map(|(difference, weight)| difference * weight)
            .sum()
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}
