use crate::{
    error::Result,
    segment::{FeatureValue, Sequence},
};

use super::{Comparator, check_finite_weights};

/// Adds the weighted mean score of the neighbouring position pairs to the score of the wrapped comparator.
///
/// The neighbours of `(i, j)` are `(i - 1, j - 1)` and `(i + 1, j + 1)`, as far as they exist in both sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextComparator<C> {
    inner: C,
    weight: f64,
}

impl<C> ContextComparator<C> {
    pub fn new(inner: C, weight: f64) -> Result<Self> {
        check_finite_weights(&[weight], "context weights")?;
        Ok(Self { inner, weight })
    }
}

impl<T: FeatureValue, C: Comparator<T>> Comparator<T> for ContextComparator<C> {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        let score = self.inner.apply(left, right, i, j);

        let mut context = 0.0;
        let mut neighbours = 0;
        if i > 0 && j > 0 {
            context += self.inner.apply(left, right, i - 1, j - 1);
            neighbours += 1;
        }
        if i + 1 < left.len() && j + 1 < right.len() {
            context += self.inner.apply(left, right, i + 1, j + 1);
            neighbours += 1;
        }

        if neighbours == 0 {
            score
        } else {
            score + self.weight * context / f64::from(neighbours)
        }
    }

    fn name(&self) -> &'static str {
        "context"
    }
}
