use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    segment::{FeatureValue, Sequence},
};

use super::{Comparator, check_finite_weights, feature_differences};

/// A correction term applied when two features differ at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureInteraction {
    pub first: usize,
    pub second: usize,
    pub weight: f64,
}

/// A weighted linear feature distance plus sparse pairwise correction terms.
///
/// Each interaction adds `weight * |d_first| * |d_second|`, where `d` are the feature differences.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseComparator {
    weights: Vec<f64>,
    interactions: Vec<FeatureInteraction>,
}

impl SparseComparator {
    pub fn new(weights: Vec<f64>, interactions: Vec<FeatureInteraction>) -> Result<Self> {
        check_finite_weights(&weights, "feature weights")?;
        for interaction in &interactions {
            if interaction.first >= weights.len() || interaction.second >= weights.len() {
                return Err(Error::InvalidConfiguration(format!(
                    "feature interaction ({}, {}) refers to a feature beyond the {} weighted features",
                    interaction.first,
                    interaction.second,
                    weights.len()
                )));
            }
            check_finite_weights(&[interaction.weight], "interaction weights")?;
        }

        Ok(Self {
            weights,
            interactions,
        })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl<T: FeatureValue> Comparator<T> for SparseComparator {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        let differences: Vec<_> = feature_differences(&left[i], &right[j]).collect();
        let linear: f64 = differences
            .iter()
            .zip(&self.weights)
            .map(|(difference, weight)| difference * weight)
            .sum();
        let corrections: f64 = self
            .interactions
            .iter()
            .map(|interaction| {
                interaction.weight
                    * differences.get(interaction.first).copied().unwrap_or(0.0)
                    * differences.get(interaction.second).copied().unwrap_or(0.0)
            })
            .sum();
        linear + corrections
    }

    fn name(&self) -> &'static str {
        "sparse"
    }
}
