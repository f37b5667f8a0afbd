//! Global alignment with a full dynamic programming matrix.

use std::time::Instant;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    alignment::Alignment,
    alignment_algorithm::AlignmentAlgorithm,
    alignment_matrix::{
        AlignmentMatrix, AlignmentProblem, AlignmentWindow, BaseAlignmentType, Direction,
        index::AlignmentMatrixIndex,
    },
    alignment_result::AlignmentResult,
    comparator::Comparator,
    error::Result,
    gap_penalty::GapPenalty,
    optimization::Optimization,
    segment::{FeatureValue, Segment, Sequence},
};


pub const DEFAULT_MAX_ALIGNMENTS: usize = 100;

/// Whether to report all co-optimal alignments or only the first in tie-breaking order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieMode {
    #[default]
    All,
    Single,
}

pub struct NeedlemanWunschAlgorithm<T> {
    comparator: Box<dyn Comparator<T>>,
    gap_penalty: Box<dyn GapPenalty>,
    optimization: Optimization,
    gap_sequence: Sequence<T>,
    tie_mode: TieMode,
    max_alignments: usize,
}

/// The paths through a matrix, each as its moves from the origin to the last cell.
pub(crate) struct Traceback {
    pub paths: Vec<Vec<BaseAlignmentType>>,
    pub limit_reached: bool,
}

impl<T: FeatureValue> NeedlemanWunschAlgorithm<T> {
    /// `gap_sequence` is the one-segment sequence holding the gap segment, see [`SequenceFactory::gap_sequence`](crate::segment::SequenceFactory::gap_sequence).
    pub fn new(
        comparator: Box<dyn Comparator<T>>,
        gap_penalty: Box<dyn GapPenalty>,
        optimization: Optimization,
        gap_sequence: Sequence<T>,
    ) -> Self {
        Self {
            comparator,
            gap_penalty,
            optimization,
            gap_sequence,
            tie_mode: TieMode::default(),
            max_alignments: DEFAULT_MAX_ALIGNMENTS,
        }
    }

    pub fn with_tie_mode(mut self, tie_mode: TieMode) -> Self {
        self.tie_mode = tie_mode;
        self
    }

    /// Limits the number of enumerated co-optimal alignments, at least one is always reported.
    pub fn with_max_alignments(mut self, max_alignments: usize) -> Self {
        self.max_alignments = max_alignments.max(1);
        self
    }

    pub fn comparator(&self) -> &dyn Comparator<T> {
        self.comparator.as_ref()
    }

    pub fn gap_penalty(&self) -> &dyn GapPenalty {
        self.gap_penalty.as_ref()
    }

    pub fn optimization(&self) -> Optimization {
        self.optimization
    }

    pub fn gap_sequence(&self) -> &Sequence<T> {
        &self.gap_sequence
    }

    pub fn gap(&self) -> &Segment<T> {
        &self.gap_sequence[0]
    }

    pub fn tie_mode(&self) -> TieMode {
        self.tie_mode
    }

    pub(crate) fn problem<'a>(
        &'a self,
        left: &'a Sequence<T>,
        right: &'a Sequence<T>,
    ) -> Result<AlignmentProblem<'a, T>> {
        left.check_same_model(right)?;
        left.check_same_model(&self.gap_sequence)?;

        Ok(AlignmentProblem {
            left,
            right,
            gap_sequence: &self.gap_sequence,
            comparator: self.comparator.as_ref(),
            gap_penalty: self.gap_penalty.as_ref(),
            optimization: self.optimization,
        })
    }
}

impl<T: FeatureValue> AlignmentAlgorithm<T> for NeedlemanWunschAlgorithm<T> {
    fn align_pair(&self, left: &Sequence<T>, right: &Sequence<T>) -> Result<AlignmentResult<T>> {
        let start_time = Instant::now();
        let problem = self.problem(left, right)?;
        let window = AlignmentWindow::new(0..left.len(), 0..right.len());
        let keep_ties = self.tie_mode == TieMode::All;

        debug!(
            "Aligning '{left}' and '{right}' with a {}x{} matrix",
            left.len() + 1,
            right.len() + 1
        );
        let matrix = AlignmentMatrix::compute(&problem, &window, keep_ties)?;
        let traceback = traceback(&matrix, keep_ties, self.max_alignments);
        if traceback.limit_reached {
            warn!(
                "Stopped enumerating co-optimal alignments of '{left}' and '{right}' after {}",
                traceback.paths.len()
            );
        }

        let alignments = traceback
            .paths
            .iter()
            .map(|moves| {
                Alignment::from_pairs(left.model().clone(), columns(&problem, &window, moves))
            })
            .collect();

        Ok(AlignmentResult::new(
            self.name(),
            left.clone(),
            right.clone(),
            Some(matrix.score_table()),
            matrix.score(),
            alignments,
            matrix.cell_count(),
            traceback.limit_reached,
            start_time.elapsed(),
        ))
    }

    fn name(&self) -> &'static str {
        "needleman-wunsch"
    }
}

/// Enumerates optimal paths depth-first, following predecessors in tie-breaking order.
pub(crate) fn traceback(
    matrix: &AlignmentMatrix,
    keep_ties: bool,
    max_alignments: usize,
) -> Traceback {
    let final_index = matrix.final_index();
    let mut stack: Vec<(AlignmentMatrixIndex, BaseAlignmentType, Vec<BaseAlignmentType>)> = matrix
        .final_states(keep_ties)
        .into_iter()
        .rev()
        .map(|alignment_type| (final_index, alignment_type, Vec::new()))
        .collect();
    let mut paths = Vec::new();

    while let Some((index, alignment_type, mut moves)) = stack.pop() {
        if index.is_origin() {
            moves.reverse();
            paths.push(moves);
            if paths.len() >= max_alignments {
                return Traceback {
                    paths,
                    limit_reached: !stack.is_empty(),
                };
            }
            continue;
        }

        moves.push(alignment_type);
        let predecessor = index.predecessor(alignment_type);
        let predecessor_types: Vec<_> = matrix
            .entry(index)
            .state(alignment_type)
            .predecessors
            .iter()
            .take(if keep_ties { 3 } else { 1 })
            .collect();

        if let Some((first, rest)) = predecessor_types.split_first() {
            for &predecessor_type in rest.iter().rev() {
                stack.push((predecessor, predecessor_type, moves.clone()));
            }
            stack.push((predecessor, *first, moves));
        }
    }

    Traceback {
        paths,
        limit_reached: false,
    }
}

/// Turns the moves through a forward window into alignment columns.
pub(crate) fn columns<T: Clone>(
    problem: &AlignmentProblem<'_, T>,
    window: &AlignmentWindow,
    moves: &[BaseAlignmentType],
) -> Vec<(Segment<T>, Segment<T>)> {
    debug_assert_eq!(window.direction, Direction::Forward);
    let gap = &problem.gap_sequence[0];
    let (mut left_position, mut right_position) = (window.left.start, window.right.start);

    moves
        .iter()
        .map(|alignment_type| match alignment_type {
            BaseAlignmentType::Substitution => {
                left_position += 1;
                right_position += 1;
                (
                    problem.left[left_position - 1].clone(),
                    problem.right[right_position - 1].clone(),
                )
            }
            BaseAlignmentType::Deletion => {
                left_position += 1;
                (problem.left[left_position - 1].clone(), gap.clone())
            }
            BaseAlignmentType::Insertion => {
                right_position += 1;
                (gap.clone(), problem.right[right_position - 1].clone())
            }
        })
        .collect()
}
