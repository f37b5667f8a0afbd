//! Re-scoring of finished alignments.

use num_traits::Zero;

use crate::{
    alignment::Alignment,
    alignment_matrix::{AlignmentProblem, BaseAlignmentType},
    comparator::Comparator,
    error::{Error, Result},
    gap_penalty::GapPenalty,
    score::Score,
    segment::{FeatureValue, Sequence},
};

/// Scores an alignment of `left` and `right` column by column.
///
/// Gap columns cost the comparator score against the gap sequence plus the gap penalty for the current run.
/// A run ends with any column that is not a gap in the same row.
/// Columns with gaps in both rows are ignored.
pub fn score_alignment<T: FeatureValue>(
    alignment: &Alignment<T>,
    left: &Sequence<T>,
    right: &Sequence<T>,
    gap_sequence: &Sequence<T>,
    comparator: &dyn Comparator<T>,
    gap_penalty: &dyn GapPenalty,
) -> Result<Score> {
    let moves = alignment_moves(alignment, left, right)?;
    score_moves(
        &AlignmentProblem {
            left,
            right,
            gap_sequence,
            comparator,
            gap_penalty,
            optimization: Default::default(),
        },
        &moves,
    )
}

/// Recovers the moves of a pairwise alignment, checking that its rows spell `left` and `right`.
pub(crate) fn alignment_moves<T: FeatureValue>(
    alignment: &Alignment<T>,
    left: &Sequence<T>,
    right: &Sequence<T>,
) -> Result<Vec<BaseAlignmentType>> {
    if alignment.rows() != 2 {
        return Err(Error::WrongSequenceCount {
            expected: 2,
            actual: alignment.rows(),
        });
    }

    let (mut left_position, mut right_position) = (0, 0);
    let mut moves = Vec::with_capacity(alignment.columns());
    for (top, bottom) in alignment.iter_pairs() {
        let alignment_type = match (top.is_gap(), bottom.is_gap()) {
            (false, false) => BaseAlignmentType::Substitution,
            (false, true) => BaseAlignmentType::Deletion,
            (true, false) => BaseAlignmentType::Insertion,
            (true, true) => continue,
        };

        if !top.is_gap() {
            if left.get(left_position) != Some(top) {
                return Err(Error::AlignmentSequenceMismatch { row: 0 });
            }
            left_position += 1;
        }
        if !bottom.is_gap() {
            if right.get(right_position) != Some(bottom) {
                return Err(Error::AlignmentSequenceMismatch { row: 1 });
            }
            right_position += 1;
        }
        moves.push(alignment_type);
    }

    if left_position != left.len() {
        return Err(Error::AlignmentSequenceMismatch { row: 0 });
    }
    if right_position != right.len() {
        return Err(Error::AlignmentSequenceMismatch { row: 1 });
    }
    Ok(moves)
}

/// Scores a path through the full alignment matrix of the problem.
pub(crate) fn score_moves<T>(
    problem: &AlignmentProblem<'_, T>,
    moves: &[BaseAlignmentType],
) -> Result<Score> {
    let comparator = |left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize| {
        Score::new(problem.comparator.apply(left, right, i, j), "comparator")
    };
    let gap = |run_length: usize| {
        Score::new(problem.gap_penalty.evaluate(run_length), "gap penalty")
    };

    let mut score = Score::zero();
    let (mut left_position, mut right_position) = (0, 0);
    let mut run_length = 0;
    let mut previous = None;

    for &alignment_type in moves {
        if previous != Some(alignment_type) {
            run_length = 0;
        }

        match alignment_type {
            BaseAlignmentType::Substitution => {
                score = score.checked_add(
                    comparator(problem.left, problem.right, left_position, right_position)?,
                    "alignment score",
                )?;
                left_position += 1;
                right_position += 1;
            }
            BaseAlignmentType::Deletion => {
                score = score.checked_add(
                    comparator(problem.left, problem.gap_sequence, left_position, 0)?,
                    "alignment score",
                )?;
                score = score.checked_add(gap(run_length)?, "alignment score")?;
                run_length += 1;
                left_position += 1;
            }
            BaseAlignmentType::Insertion => {
                score = score.checked_add(
                    comparator(problem.gap_sequence, problem.right, 0, right_position)?,
                    "alignment score",
                )?;
                score = score.checked_add(gap(run_length)?, "alignment score")?;
                run_length += 1;
                right_position += 1;
            }
        }

        previous = Some(alignment_type);
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::score_alignment;
    use crate::{
        alignment::Alignment,
        comparator::MismatchComparator,
        error::Error,
        gap_penalty::{ConvexGapPenalty, NullGapPenalty},
        test_util::{letter_factory, word},
    };

    fn pairwise(top: &str, bottom: &str) -> Alignment<i64> {
        let factory = letter_factory();
        Alignment::from_pairs(
            factory.model().clone(),
            top.chars().zip(bottom.chars()).map(|(top, bottom)| {
                (
                    factory.segment(&top.to_string()).unwrap(),
                    factory.segment(&bottom.to_string()).unwrap(),
                )
            }),
        )
    }

    #[test]
    fn gap_columns_pay_comparator_and_penalty() {
        let factory = letter_factory();
        let left = word(&factory, "aba");
        let right = word(&factory, "baba");
        let alignment = pairwise("#_aba", "#baba");

        let score = score_alignment(
            &alignment,
            &left,
            &right,
            factory.gap_sequence(),
            &MismatchComparator::default(),
            &NullGapPenalty,
        )
        .unwrap();
        assert_eq!(score.as_f64(), 1.0);

        let convex = ConvexGapPenalty::new(2.0, 1.0).unwrap();
        let left = word(&factory, "abc");
        let right = word(&factory, "c");
        let alignment = pairwise("#abc", "#__c");
        let score = score_alignment(
            &alignment,
            &left,
            &right,
            factory.gap_sequence(),
            &MismatchComparator::default(),
            &convex,
        )
        .unwrap();
        assert_eq!(score.as_f64(), 5.0);
    }

    #[test]
    fn runs_restart_after_other_columns() {
        let factory = letter_factory();
        let left = word(&factory, "ab");
        let right = word(&factory, "ba");
        let convex = ConvexGapPenalty::new(2.0, 1.0).unwrap();
        // Two deletion runs of length one, separated by an insertion.
        let alignment = pairwise("#a_b_", "#_b_a");
        let score = score_alignment(
            &alignment,
            &left,
            &right,
            factory.gap_sequence(),
            &MismatchComparator::default(),
            &convex,
        )
        .unwrap();
        assert_eq!(score.as_f64(), 4.0 * 3.0);
    }

    #[test]
    fn foreign_alignments_are_rejected() {
        let factory = letter_factory();
        let left = word(&factory, "ab");
        let right = word(&factory, "ab");
        let result = score_alignment(
            &pairwise("#ac", "#ab"),
            &left,
            &right,
            factory.gap_sequence(),
            &MismatchComparator::default(),
            &NullGapPenalty,
        );
        assert!(matches!(
            result,
            Err(Error::AlignmentSequenceMismatch { row: 0 })
        ));

        let result = score_alignment(
            &pairwise("#a", "#a"),
            &left,
            &right,
            factory.gap_sequence(),
            &MismatchComparator::default(),
            &NullGapPenalty,
        );
        assert!(matches!(
            result,
            Err(Error::AlignmentSequenceMismatch { .. })
        ));
    }
}
