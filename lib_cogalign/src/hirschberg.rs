//! Global alignment in linear space.
//!
//! The left range is split in its middle, and the right range at the position where the best forward prefix score
//! and the best backward suffix score meet. Both halves are then aligned recursively.
//! A split through the middle row either substitutes or deletes the last segment of the upper half.
//! Deletions crossing the split carry their run into the lower half as a leading deletion context.
//!
//! The score is the same as the full-matrix score when all comparator and gap penalty values are integral.
//! With fractional values the two may differ by floating point rounding, since they sum the columns in a different order.

use std::{ops::Range, time::Instant};

use log::debug;

use crate::{
    alignment::Alignment,
    alignment_algorithm::AlignmentAlgorithm,
    alignment_matrix::{
        AlignmentMatrix, AlignmentMatrixEntry, AlignmentProblem, AlignmentWindow,
        BaseAlignmentType,
    },
    alignment_result::AlignmentResult,
    error::Result,
    needleman_wunsch::{self, NeedlemanWunschAlgorithm},
    scoring::score_moves,
    score::Score,
    segment::{FeatureValue, Sequence},
};


/// Windows with fewer cells than this are not split across threads.
const PARALLEL_CELL_THRESHOLD: usize = 1 << 14;

/// Computes one optimal alignment with the scoring of the wrapped [`NeedlemanWunschAlgorithm`],
/// keeping only two matrix rows in memory at a time.
pub struct HirschbergAlgorithm<T> {
    needleman_wunsch: NeedlemanWunschAlgorithm<T>,
    parallel: bool,
}

type Moves = Vec<BaseAlignmentType>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    Substitution(usize),
    Deletion(usize),
}

impl<T: FeatureValue> HirschbergAlgorithm<T> {
    pub fn new(needleman_wunsch: NeedlemanWunschAlgorithm<T>) -> Self {
        Self {
            needleman_wunsch,
            parallel: false,
        }
    }

    /// Aligns the two halves of large windows on separate threads.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn needleman_wunsch(&self) -> &NeedlemanWunschAlgorithm<T> {
        &self.needleman_wunsch
    }

    /// Returns the moves of an optimal path through the window and the number of computed cells.
    fn align_window(
        &self,
        problem: &AlignmentProblem<'_, T>,
        left: Range<usize>,
        right: Range<usize>,
        leading_deletion: bool,
        trailing_deletion: bool,
    ) -> Result<(Moves, usize)> {
        let (left_length, right_length) = (left.len(), right.len());
        if left_length == 0 {
            return Ok((vec![BaseAlignmentType::Insertion; right_length], 0));
        }
        if right_length == 0 {
            return Ok((vec![BaseAlignmentType::Deletion; left_length], 0));
        }
        if left_length == 1 || right_length == 1 {
            let window = AlignmentWindow::new(left, right)
                .with_contexts(leading_deletion, trailing_deletion);
            return self.align_full(problem, &window);
        }

        let middle = left.start + left_length / 2;
        let forward_window = AlignmentWindow::new(left.start..middle, right.clone())
            .with_contexts(leading_deletion, false);
        let backward_window = AlignmentWindow::new(middle..left.end, right.clone())
            .with_contexts(trailing_deletion, false)
            .reversed();
        let forward = AlignmentMatrix::compute_last_row(problem, &forward_window)?;
        let backward = AlignmentMatrix::compute_last_row(problem, &backward_window)?;
        let mut computed_cells = (forward_window.left_len() + backward_window.left_len() + 2)
            * (right_length + 1);

        let Some(split) = self.find_split(problem, &forward, &backward)? else {
            debug!("Found no split for {left:?} x {right:?}, falling back to a full matrix");
            let window = AlignmentWindow::new(left, right)
                .with_contexts(leading_deletion, trailing_deletion);
            let (moves, cells) = self.align_full(problem, &window)?;
            return Ok((moves, computed_cells + cells));
        };

        let (upper, lower, split_move, split_deletion) = match split {
            Split::Substitution(offset) => (
                (left.start..middle - 1, right.start..right.start + offset - 1),
                (middle..left.end, right.start + offset..right.end),
                BaseAlignmentType::Substitution,
                false,
            ),
            Split::Deletion(offset) => (
                (left.start..middle - 1, right.start..right.start + offset),
                (middle..left.end, right.start + offset..right.end),
                BaseAlignmentType::Deletion,
                true,
            ),
        };

        let align_upper =
            || self.align_window(problem, upper.0, upper.1, leading_deletion, split_deletion);
        let align_lower =
            || self.align_window(problem, lower.0, lower.1, split_deletion, trailing_deletion);
        let (upper, lower) = if self.parallel
            && left_length * right_length >= PARALLEL_CELL_THRESHOLD
        {
            rayon::join(align_upper, align_lower)
        } else {
            (align_upper(), align_lower())
        };
        let ((mut moves, upper_cells), (lower_moves, lower_cells)) = (upper?, lower?);

        moves.push(split_move);
        moves.extend(lower_moves);
        computed_cells += upper_cells + lower_cells;
        Ok((moves, computed_cells))
    }

    /// Aligns a small window with a full matrix.
    fn align_full(
        &self,
        problem: &AlignmentProblem<'_, T>,
        window: &AlignmentWindow,
    ) -> Result<(Moves, usize)> {
        let matrix = AlignmentMatrix::compute(problem, window, false)?;
        let traceback = needleman_wunsch::traceback(&matrix, false, 1);
        let moves = traceback.paths.into_iter().next().unwrap_or_default();
        Ok((moves, matrix.cell_count()))
    }

    /// Finds the best way to cross the middle row.
    ///
    /// `forward[y]` is the entry of the upper half ending in right offset `y`,
    /// and `backward[n - y]` the entry of the reversed lower half starting there.
    /// Smaller offsets are preferred, and substitutions before deletions.
    fn find_split(
        &self,
        problem: &AlignmentProblem<'_, T>,
        forward: &[AlignmentMatrixEntry],
        backward: &[AlignmentMatrixEntry],
    ) -> Result<Option<Split>> {
        let optimization = problem.optimization;
        let right_length = forward.len() - 1;
        let extension_bonus = Score::new(problem.gap_penalty.evaluate(1), "gap penalty")?
            .checked_sub(
                Score::new(problem.gap_penalty.evaluate(0), "gap penalty")?,
                "gap penalty",
            )?;
        let reachable = |entry: &AlignmentMatrixEntry, alignment_type| {
            let state = entry.state(alignment_type);
            state.is_reachable(optimization).then_some(state.score)
        };

        let mut best: Option<(Score, Split)> = None;
        let mut offer = |score: Score, split: Split| {
            if best.is_none_or(|(best_score, _)| optimization.is_better(score, best_score)) {
                best = Some((score, split));
            }
        };

        for (offset, prefix) in forward.iter().enumerate() {
            let suffix = &backward[right_length - offset];

            let substitution_prefix = reachable(prefix, BaseAlignmentType::Substitution)
                .filter(|_| offset > 0);
            let substitution_suffix = optimization.best(
                BaseAlignmentType::ALL
                    .into_iter()
                    .filter_map(|alignment_type| reachable(suffix, alignment_type)),
            );
            if let (Some(prefix_score), Some(suffix_score)) =
                (substitution_prefix, substitution_suffix)
            {
                offer(
                    prefix_score.checked_add(suffix_score, "alignment score")?,
                    Split::Substitution(offset),
                );
            }

            // A deletion starting the suffix extends the run of the split deletion.
            let extended_deletion_suffix = reachable(suffix, BaseAlignmentType::Deletion)
                .map(|score| score.checked_add(extension_bonus, "alignment score"))
                .transpose()?;
            let deletion_suffix = optimization.best(
                [
                    reachable(suffix, BaseAlignmentType::Substitution),
                    reachable(suffix, BaseAlignmentType::Insertion),
                    extended_deletion_suffix,
                ]
                .into_iter()
                .flatten(),
            );
            if let (Some(prefix_score), Some(suffix_score)) =
                (reachable(prefix, BaseAlignmentType::Deletion), deletion_suffix)
            {
                offer(
                    prefix_score.checked_add(suffix_score, "alignment score")?,
                    Split::Deletion(offset),
                );
            }
        }

        Ok(best.map(|(_, split)| split))
    }
}

impl<T: FeatureValue> AlignmentAlgorithm<T> for HirschbergAlgorithm<T> {
    fn align_pair(&self, left: &Sequence<T>, right: &Sequence<T>) -> Result<AlignmentResult<T>> {
        let start_time = Instant::now();
        let problem = self.needleman_wunsch.problem(left, right)?;
        debug!(
            "Aligning '{left}' and '{right}' in linear space{}",
            if self.parallel { " on multiple threads" } else { "" }
        );

        let (moves, computed_cells) =
            self.align_window(&problem, 0..left.len(), 0..right.len(), false, false)?;
        let score = score_moves(&problem, &moves)?;
        let window = AlignmentWindow::new(0..left.len(), 0..right.len());
        let alignment = Alignment::from_pairs(
            left.model().clone(),
            needleman_wunsch::columns(&problem, &window, &moves),
        );

        Ok(AlignmentResult::new(
            self.name(),
            left.clone(),
            right.clone(),
            None,
            score,
            vec![alignment],
            computed_cells,
            false,
            start_time.elapsed(),
        ))
    }

    fn name(&self) -> &'static str {
        "hirschberg"
    }
}
