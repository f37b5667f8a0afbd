use crate::{
    error::Result,
    segment::{FeatureValue, Sequence},
};

use super::{Comparator, check_finite_weights};

/// Scores equal segments with `match_score` and all other pairs with `mismatch_score`.
///
/// The default scores `0` for a match and `1` for a mismatch, which makes it a distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MismatchComparator {
    match_score: f64,
    mismatch_score: f64,
}

impl MismatchComparator {
    pub fn new(match_score: f64, mismatch_score: f64) -> Result<Self> {
        check_finite_weights(&[match_score, mismatch_score], "match and mismatch scores")?;
        Ok(Self {
            match_score,
            mismatch_score,
        })
    }
}

impl Default for MismatchComparator {
    fn default() -> Self {
        Self {
            match_score: 0.0,
            mismatch_score: 1.0,
        }
    }
}

impl<T: FeatureValue> Comparator<T> for MismatchComparator {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        if left[i] == right[j] {
            self.match_score
        } else {
            self.mismatch_score
        }
    }

    fn name(&self) -> &'static str {
        "mismatch"
    }
}
