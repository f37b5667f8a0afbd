//! Aligning many independent pairs on the rayon thread pool.

use log::debug;
use rayon::prelude::*;

use crate::{
    alignment_algorithm::AlignmentAlgorithm, alignment_result::AlignmentResult, error::Result,
    segment::Sequence,
};

/// Aligns every pair, returning the results in input order.
///
/// A failing pair does not affect the others.
pub fn align_batch<T: Send + Sync>(
    algorithm: &dyn AlignmentAlgorithm<T>,
    pairs: &[(Sequence<T>, Sequence<T>)],
) -> Vec<Result<AlignmentResult<T>>> {
    align_batch_with_progress(algorithm, pairs, || {})
}

/// Like [`align_batch`], but calls `progress` once after each finished pair.
pub fn align_batch_with_progress<T: Send + Sync>(
    algorithm: &dyn AlignmentAlgorithm<T>,
    pairs: &[(Sequence<T>, Sequence<T>)],
    progress: impl Fn() + Sync,
) -> Vec<Result<AlignmentResult<T>>> {
    debug!(
        "Aligning {} pairs with {} on {} threads",
        pairs.len(),
        algorithm.name(),
        rayon::current_num_threads()
    );

    pairs
        .par_iter()
        .map(|(left, right)| {
            let result = algorithm.align_pair(left, right);
            progress();
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::{
        alignment_algorithm::AlignmentAlgorithm,
        comparator::MismatchComparator,
        error::Error,
        gap_penalty::NullGapPenalty,
        needleman_wunsch::NeedlemanWunschAlgorithm,
        optimization::Optimization,
        segment::{FeatureModel, Sequence},
        test_util::{letter_factory, word},
    };

    use super::{align_batch, align_batch_with_progress};

    #[test]
    fn results_keep_input_order() {
        let factory = letter_factory();
        let algorithm = NeedlemanWunschAlgorithm::new(
            Box::new(MismatchComparator::default()),
            Box::new(NullGapPenalty),
            Optimization::Min,
            factory.gap_sequence().clone(),
        );
        let pairs: Vec<_> = ["", "a", "ab", "abc", "abcd", "dcba"]
            .into_iter()
            .map(|right| (word(&factory, "abcd"), word(&factory, right)))
            .collect();

        let counter = AtomicUsize::new(0);
        let results = align_batch_with_progress(&algorithm, &pairs, || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(counter.load(Ordering::Relaxed), pairs.len());

        for ((left, right), result) in pairs.iter().zip(&results) {
            let expected = algorithm.align_pair(left, right).unwrap();
            assert_eq!(result.as_ref().unwrap().score(), expected.score());
            assert_eq!(result.as_ref().unwrap().right(), right);
        }
    }

    #[test]
    fn failures_stay_local() {
        let factory = letter_factory();
        let algorithm = NeedlemanWunschAlgorithm::new(
            Box::new(MismatchComparator::default()),
            Box::new(NullGapPenalty),
            Optimization::Min,
            factory.gap_sequence().clone(),
        );
        let other_model = std::sync::Arc::new(FeatureModel::new("other", vec!["x".to_string()]));
        let pairs = vec![
            (word(&factory, "ab"), word(&factory, "b")),
            (word(&factory, "ab"), Sequence::empty(other_model)),
            (word(&factory, "a"), word(&factory, "a")),
        ];

        let results = align_batch(&algorithm, &pairs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().score().as_f64(), 1.0);
        assert!(matches!(
            results[1],
            Err(Error::FeatureModelMismatch { .. })
        ));
        assert_eq!(results[2].as_ref().unwrap().score().as_f64(), 0.0);
    }
}
