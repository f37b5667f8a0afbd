//! Scoring of aligned segment pairs.
//!
//! A comparator scores `left[i]` against `right[j]`.
//! Gap columns are scored by passing the gap sequence of the [`SequenceFactory`](crate::segment::SequenceFactory) as one side,
//! comparators never treat gaps specially.

use std::sync::Arc;

use crate::segment::{FeatureValue, Segment, Sequence};

pub use context::ContextComparator;
pub use matrix::MatrixComparator;
pub use mismatch::MismatchComparator;
pub use reinforcement::{ReinforcementComparator, SymbolPairFactor};
pub use sparse::{FeatureInteraction, SparseComparator};
pub use weighted::WeightedComparator;

mod context;
mod matrix;
mod mismatch;
mod reinforcement;
mod sparse;
mod weighted;


/// Scores the alignment of two positions.
///
/// Implementations must be pure functions of their inputs and return finite values.
pub trait Comparator<T>: Send + Sync {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64;

    fn name(&self) -> &'static str;
}

/// The absolute per-feature differences of two segments.
pub fn feature_differences<'segment, T: FeatureValue>(
    left: &'segment Segment<T>,
    right: &'segment Segment<T>,
) -> impl Iterator<Item = f64> + 'segment {
    left.features()
        .iter()
        .zip(right.features())
        .map(|(left, right)| (left.as_f64() - right.as_f64()).abs())
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for Box<C> {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        self.as_ref().apply(left, right, i, j)
    }

    fn name(&self) -> &'static str {
        self.as_ref().name()
    }
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for Arc<C> {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        self.as_ref().apply(left, right, i, j)
    }

    fn name(&self) -> &'static str {
        self.as_ref().name()
    }
}

impl<T, C: Comparator<T> + ?Sized> Comparator<T> for &C {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        (*self).apply(left, right, i, j)
    }

    fn name(&self) -> &'static str {
        (*self).name()
    }
}

fn check_finite_weights(weights: &[f64], what: &str) -> crate::error::Result<()> {
    if let Some(weight) = weights.iter().find(|weight| !weight.is_finite()) {
        Err(crate::error::Error::InvalidConfiguration(format!(
            "all {what} must be finite, but found {weight}"
        )))
    } else {
        Ok(())
    }
}
