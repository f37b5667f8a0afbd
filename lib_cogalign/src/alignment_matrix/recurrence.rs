use std::ops::Range;

use crate::{
    comparator::Comparator,
    error::Result,
    gap_penalty::GapPenalty,
    optimization::Optimization,
    score::Score,
    segment::Sequence,
};

use super::{
    AlignmentMatrixEntry, BaseAlignmentType, PredecessorSet, StateEntry,
    index::AlignmentMatrixIndex,
};

const SCORE_CONTEXT: &str = "alignment score";

/// The inputs of one pairwise alignment, shared by all sub-problems.
pub struct AlignmentProblem<'a, T> {
    pub left: &'a Sequence<T>,
    pub right: &'a Sequence<T>,
    /// Passed to the comparator as the other side of gap columns.
    pub gap_sequence: &'a Sequence<T>,
    pub comparator: &'a dyn Comparator<T>,
    pub gap_penalty: &'a dyn GapPenalty,
    pub optimization: Optimization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    /// Both ranges are traversed from their ends towards their starts.
    Reverse,
}

/// The part of an [`AlignmentProblem`] covered by one alignment matrix.
///
/// A leading deletion context means that a deletion run continues into the window from before its start.
/// A trailing deletion context means that a deletion follows directly after the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentWindow {
    pub left: Range<usize>,
    pub right: Range<usize>,
    pub direction: Direction,
    pub leading_deletion: bool,
    pub trailing_deletion: bool,
}

impl AlignmentWindow {
    pub fn new(left: Range<usize>, right: Range<usize>) -> Self {
        Self {
            left,
            right,
            direction: Direction::Forward,
            leading_deletion: false,
            trailing_deletion: false,
        }
    }

    pub fn with_contexts(mut self, leading_deletion: bool, trailing_deletion: bool) -> Self {
        self.leading_deletion = leading_deletion;
        self.trailing_deletion = trailing_deletion;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.direction = match self.direction {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        };
        self
    }

    pub fn left_len(&self) -> usize {
        self.left.len()
    }

    pub fn right_len(&self) -> usize {
        self.right.len()
    }

    /// The position in the left sequence consumed by matrix row `left_index`, which must be at least one.
    pub fn left_position(&self, left_index: usize) -> usize {
        debug_assert!(left_index > 0 && left_index <= self.left.len());
        match self.direction {
            Direction::Forward => self.left.start + left_index - 1,
            Direction::Reverse => self.left.end - left_index,
        }
    }

    /// The position in the right sequence consumed by matrix column `right_index`, which must be at least one.
    pub fn right_position(&self, right_index: usize) -> usize {
        debug_assert!(right_index > 0 && right_index <= self.right.len());
        match self.direction {
            Direction::Forward => self.right.start + right_index - 1,
            Direction::Reverse => self.right.end - right_index,
        }
    }
}

/// Computes matrix entries from their neighbours.
pub(crate) struct Recurrence<'a, T> {
    problem: &'a AlignmentProblem<'a, T>,
    window: &'a AlignmentWindow,
    /// Comparator scores of each left segment against the gap, by matrix row minus one.
    deletion_costs: Vec<Score>,
    /// Comparator scores of the gap against each right segment, by matrix column minus one.
    insertion_costs: Vec<Score>,
    gap_open: Score,
    keep_ties: bool,
}

impl<'a, T> Recurrence<'a, T> {
    pub fn new(
        problem: &'a AlignmentProblem<'a, T>,
        window: &'a AlignmentWindow,
        keep_ties: bool,
    ) -> Result<Self> {
        let deletion_costs = (1..=window.left_len())
            .map(|left_index| {
                Score::new(
                    problem.comparator.apply(
                        problem.left,
                        problem.gap_sequence,
                        window.left_position(left_index),
                        0,
                    ),
                    "comparator",
                )
            })
            .collect::<Result<_>>()?;
        let insertion_costs = (1..=window.right_len())
            .map(|right_index| {
                Score::new(
                    problem.comparator.apply(
                        problem.gap_sequence,
                        problem.right,
                        0,
                        window.right_position(right_index),
                    ),
                    "comparator",
                )
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            problem,
            window,
            deletion_costs,
            insertion_costs,
            gap_open: Score::new(problem.gap_penalty.evaluate(0), "gap penalty")?,
            keep_ties,
        })
    }

    fn gap(&self, run_length: usize) -> Result<Score> {
        if run_length == 0 {
            Ok(self.gap_open)
        } else {
            Score::new(self.problem.gap_penalty.evaluate(run_length), "gap penalty")
        }
    }

    fn substitution_cost(&self, index: AlignmentMatrixIndex) -> Result<Score> {
        Score::new(
            self.problem.comparator.apply(
                self.problem.left,
                self.problem.right,
                self.window.left_position(index.left_index()),
                self.window.right_position(index.right_index()),
            ),
            "comparator",
        )
    }

    /// The entry of cell `(0, 0)`.
    pub fn origin(&self) -> AlignmentMatrixEntry {
        let mut entry = AlignmentMatrixEntry::unreachable(self.problem.optimization);
        if self.window.leading_deletion {
            *entry.state_mut(BaseAlignmentType::Deletion) = StateEntry::start(1);
        } else {
            *entry.state_mut(BaseAlignmentType::Substitution) = StateEntry::start(0);
        }
        entry
    }

    /// Computes the entry of a cell other than the origin.
    ///
    /// `diagonal`, `up` and `left` are the entries of the substitution, deletion and insertion predecessor cells, if they exist.
    pub fn compute_entry(
        &self,
        index: AlignmentMatrixIndex,
        diagonal: Option<&AlignmentMatrixEntry>,
        up: Option<&AlignmentMatrixEntry>,
        left: Option<&AlignmentMatrixEntry>,
    ) -> Result<AlignmentMatrixEntry> {
        let optimization = self.problem.optimization;
        let mut entry = AlignmentMatrixEntry::unreachable(optimization);

        if let Some(diagonal) = diagonal {
            let cost = self.substitution_cost(index)?;
            let mut candidates = [None; 3];
            for (candidate, alignment_type) in candidates.iter_mut().zip(BaseAlignmentType::ALL) {
                let state = diagonal.state(alignment_type);
                if state.is_reachable(optimization) {
                    *candidate = Some((state.score.checked_add(cost, SCORE_CONTEXT)?, 0));
                }
            }
            *entry.state_mut(BaseAlignmentType::Substitution) = self.select(candidates);
        }

        if let Some(up) = up {
            let cost = self.deletion_costs[index.left_index() - 1];
            let candidates = self.gap_candidates(up, BaseAlignmentType::Deletion, cost)?;
            *entry.state_mut(BaseAlignmentType::Deletion) = self.select(candidates);
        }

        if let Some(left) = left {
            let cost = self.insertion_costs[index.right_index() - 1];
            let candidates = self.gap_candidates(left, BaseAlignmentType::Insertion, cost)?;
            *entry.state_mut(BaseAlignmentType::Insertion) = self.select(candidates);
        }

        Ok(entry)
    }

    /// Candidates for entering a gap state, which continue the run only if the predecessor is in the same gap state.
    fn gap_candidates(
        &self,
        predecessor: &AlignmentMatrixEntry,
        gap_type: BaseAlignmentType,
        cost: Score,
    ) -> Result<[Option<(Score, usize)>; 3]> {
        let mut candidates = [None; 3];
        for (candidate, alignment_type) in candidates.iter_mut().zip(BaseAlignmentType::ALL) {
            let state = predecessor.state(alignment_type);
            if state.is_reachable(self.problem.optimization) {
                let run_length = if alignment_type == gap_type {
                    state.run_length
                } else {
                    0
                };
                let score = state
                    .score
                    .checked_add(cost, SCORE_CONTEXT)?
                    .checked_add(self.gap(run_length)?, SCORE_CONTEXT)?;
                *candidate = Some((score, run_length + 1));
            }
        }
        Ok(candidates)
    }

    /// Chooses the best candidate, preferring earlier candidates on ties.
    ///
    /// Candidates are indexed by the alignment type of the predecessor state.
    fn select(&self, candidates: [Option<(Score, usize)>; 3]) -> StateEntry {
        let optimization = self.problem.optimization;
        let mut best: Option<(Score, usize)> = None;
        for &(score, run_length) in candidates.iter().flatten() {
            if best.is_none_or(|(best_score, _)| optimization.is_better(score, best_score)) {
                best = Some((score, run_length));
            }
        }

        let Some((score, run_length)) = best else {
            return StateEntry::unreachable(optimization);
        };

        let run_sensitive = self.problem.gap_penalty.depends_on_run_length();
        let mut predecessors = PredecessorSet::default();
        for (candidate, alignment_type) in candidates.iter().zip(BaseAlignmentType::ALL) {
            let Some((candidate_score, candidate_run_length)) = *candidate else {
                continue;
            };
            if candidate_score == score
                && (!run_sensitive || candidate_run_length == run_length)
                && (self.keep_ties || predecessors.is_empty())
            {
                predecessors.insert(alignment_type);
            }
        }

        StateEntry {
            score,
            run_length,
            predecessors,
        }
    }

    /// The scores with which each state of the last cell ends the window.
    ///
    /// With a trailing deletion context, ending in a deletion makes the following deletion an extension instead of an opening.
    pub fn final_scores(&self, entry: &AlignmentMatrixEntry) -> Result<[Option<Score>; 3]> {
        let optimization = self.problem.optimization;
        let mut result = [None; 3];
        for (score, alignment_type) in result.iter_mut().zip(BaseAlignmentType::ALL) {
            let state = entry.state(alignment_type);
            if !state.is_reachable(optimization) {
                continue;
            }

            *score = Some(
                if alignment_type == BaseAlignmentType::Deletion && self.window.trailing_deletion {
                    state
                        .score
                        .checked_add(self.gap(1)?, SCORE_CONTEXT)?
                        .checked_sub(self.gap_open, SCORE_CONTEXT)?
                } else {
                    state.score
                },
            );
        }
        Ok(result)
    }
}
