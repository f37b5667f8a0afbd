//! The dynamic programming matrix of a pairwise alignment.
//!
//! Every cell holds three states: the best alignment of the consumed prefixes that ends in a substitution,
//! in a deletion (a left segment against the gap) or in an insertion (the gap against a right segment).
//! Gap states also track the length of their current run, which the gap penalty is evaluated with.

use index::AlignmentMatrixIndex;
use log::trace;
use ndarray::Array2;
use num_traits::Zero;
use recurrence::Recurrence;

use crate::{error::Result, optimization::Optimization, score::Score};

pub use recurrence::{AlignmentProblem, AlignmentWindow, Direction};

pub mod index;
mod recurrence;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    matrix: Array2<AlignmentMatrixEntry>,
    optimization: Optimization,
    /// The scores of the states of the last cell, adjusted for a trailing context.
    final_scores: [Option<Score>; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentMatrixEntry {
    states: [StateEntry; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateEntry {
    pub score: Score,
    /// The length of the gap run this state ends in, zero for substitutions.
    pub run_length: usize,
    /// The states of the predecessor cell this state can be reached from with its score.
    pub predecessors: PredecessorSet,
}

/// The kind of the last column of an alignment prefix.
///
/// The declaration order is the tie-breaking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BaseAlignmentType {
    Substitution,
    /// Consumes a left segment only.
    Deletion,
    /// Consumes a right segment only.
    Insertion,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredecessorSet(u8);

impl BaseAlignmentType {
    pub const ALL: [Self; 3] = [Self::Substitution, Self::Deletion, Self::Insertion];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn letter(self) -> char {
        match self {
            Self::Substitution => 'S',
            Self::Deletion => 'D',
            Self::Insertion => 'I',
        }
    }
}

impl PredecessorSet {
    pub fn insert(&mut self, alignment_type: BaseAlignmentType) {
        self.0 |= alignment_type.bit();
    }

    pub fn contains(&self, alignment_type: BaseAlignmentType) -> bool {
        self.0 & alignment_type.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates the contained types in tie-breaking order.
    pub fn iter(self) -> impl Iterator<Item = BaseAlignmentType> {
        BaseAlignmentType::ALL
            .into_iter()
            .filter(move |alignment_type| self.contains(*alignment_type))
    }
}

impl StateEntry {
    pub fn unreachable(optimization: Optimization) -> Self {
        Self {
            score: optimization.default_value(),
            run_length: 0,
            predecessors: PredecessorSet::default(),
        }
    }

    /// A state at the origin that has no predecessor.
    fn start(run_length: usize) -> Self {
        Self {
            score: Score::zero(),
            run_length,
            predecessors: PredecessorSet::default(),
        }
    }

    pub fn is_reachable(&self, optimization: Optimization) -> bool {
        !optimization.is_default_value(self.score)
    }
}

impl AlignmentMatrixEntry {
    pub fn unreachable(optimization: Optimization) -> Self {
        Self {
            states: [StateEntry::unreachable(optimization); 3],
        }
    }

    pub fn state(&self, alignment_type: BaseAlignmentType) -> &StateEntry {
        &self.states[alignment_type as usize]
    }

    fn state_mut(&mut self, alignment_type: BaseAlignmentType) -> &mut StateEntry {
        &mut self.states[alignment_type as usize]
    }

    /// The best score over all states.
    pub fn best_score(&self, optimization: Optimization) -> Score {
        optimization
            .best(self.states.iter().map(|state| state.score))
            .unwrap_or_else(|| optimization.default_value())
    }

    /// The first state achieving the best score, if any state is reachable.
    pub fn best_state(&self, optimization: Optimization) -> Option<BaseAlignmentType> {
        let best_score = self.best_score(optimization);
        BaseAlignmentType::ALL.into_iter().find(|alignment_type| {
            let state = self.state(*alignment_type);
            state.is_reachable(optimization) && state.score == best_score
        })
    }
}

impl AlignmentMatrix {
    /// Fills the matrix of the given window.
    ///
    /// If `keep_ties` is set, every state remembers all predecessors achieving its score.
    /// Otherwise, only the first one in tie-breaking order is kept.
    pub fn compute<T>(
        problem: &AlignmentProblem<'_, T>,
        window: &AlignmentWindow,
        keep_ties: bool,
    ) -> Result<Self> {
        let recurrence = Recurrence::new(problem, window, keep_ties)?;
        let (left_length, right_length) = (window.left_len(), window.right_len());
        let mut matrix = Array2::from_elem(
            (left_length + 1, right_length + 1),
            AlignmentMatrixEntry::unreachable(problem.optimization),
        );

        for left_index in 0..=left_length {
            for right_index in 0..=right_length {
                let index = AlignmentMatrixIndex::new(left_index, right_index);
                let entry = if index.is_origin() {
                    recurrence.origin()
                } else {
                    let diagonal = (left_index > 0 && right_index > 0)
                        .then(|| matrix[index.substitution_predecessor()]);
                    let up = (left_index > 0).then(|| matrix[index.deletion_predecessor()]);
                    let left = (right_index > 0).then(|| matrix[index.insertion_predecessor()]);
                    recurrence.compute_entry(
                        index,
                        diagonal.as_ref(),
                        up.as_ref(),
                        left.as_ref(),
                    )?
                };
                matrix[index] = entry;
            }
        }

        let final_scores = recurrence.final_scores(&matrix[[left_length, right_length]])?;
        trace!(
            "Computed {}x{} alignment matrix with final scores {final_scores:?}",
            left_length + 1,
            right_length + 1
        );

        Ok(Self {
            matrix,
            optimization: problem.optimization,
            final_scores,
        })
    }

    /// Computes only the last row of the matrix of the given window, keeping two rows in memory.
    ///
    /// The entries keep no ties.
    pub fn compute_last_row<T>(
        problem: &AlignmentProblem<'_, T>,
        window: &AlignmentWindow,
    ) -> Result<Vec<AlignmentMatrixEntry>> {
        let recurrence = Recurrence::new(problem, window, false)?;
        let right_length = window.right_len();

        let mut previous = Vec::with_capacity(right_length + 1);
        previous.push(recurrence.origin());
        for right_index in 1..=right_length {
            let entry = recurrence.compute_entry(
                AlignmentMatrixIndex::new(0, right_index),
                None,
                None,
                Some(&previous[right_index - 1]),
            )?;
            previous.push(entry);
        }

        for left_index in 1..=window.left_len() {
            let mut current = Vec::with_capacity(right_length + 1);
            current.push(recurrence.compute_entry(
                AlignmentMatrixIndex::new(left_index, 0),
                None,
                Some(&previous[0]),
                None,
            )?);
            for right_index in 1..=right_length {
                let entry = recurrence.compute_entry(
                    AlignmentMatrixIndex::new(left_index, right_index),
                    Some(&previous[right_index - 1]),
                    Some(&previous[right_index]),
                    Some(&current[right_index - 1]),
                )?;
                current.push(entry);
            }
            previous = current;
        }

        Ok(previous)
    }

    pub fn dim(&self) -> (usize, usize) {
        self.matrix.dim()
    }

    pub fn cell_count(&self) -> usize {
        self.matrix.len()
    }

    pub fn optimization(&self) -> Optimization {
        self.optimization
    }

    pub fn entry(&self, index: AlignmentMatrixIndex) -> &AlignmentMatrixEntry {
        &self.matrix[index]
    }

    pub fn final_index(&self) -> AlignmentMatrixIndex {
        let (rows, columns) = self.matrix.dim();
        AlignmentMatrixIndex::new(rows - 1, columns - 1)
    }

    /// The optimal score of the window.
    pub fn score(&self) -> Score {
        self.optimization
            .best(self.final_scores.iter().flatten().copied())
            .unwrap_or_else(|| self.optimization.default_value())
    }

    /// The states of the last cell achieving the optimal score, in tie-breaking order.
    pub fn final_states(&self, keep_ties: bool) -> Vec<BaseAlignmentType> {
        let score = Some(self.score());
        BaseAlignmentType::ALL
            .into_iter()
            .zip(self.final_scores)
            .filter(|(_, final_score)| *final_score == score)
            .map(|(alignment_type, _)| alignment_type)
            .take(if keep_ties { 3 } else { 1 })
            .collect()
    }

    /// The best score of each cell over its states.
    pub fn score_table(&self) -> Array2<Score> {
        self.matrix
            .map(|entry| entry.best_score(self.optimization))
    }

    #[cfg(test)]
    fn manual_debug_scores(&self) -> Vec<Vec<f64>> {
        self.matrix
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|entry| entry.best_score(self.optimization).as_f64())
                    .collect()
            })
            .collect()
    }
}

impl core::fmt::Display for AlignmentMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let scores = self
            .matrix
            .map(|entry| entry.best_score(self.optimization).to_string());
        let mut score_column_widths = vec![0; self.matrix.dim().1];
        for left_index in 0..self.matrix.dim().0 {
            for (right_index, width) in score_column_widths.iter_mut().enumerate() {
                *width = scores[[left_index, right_index]].len().max(*width);
            }
        }

        for left_index in 0..self.matrix.dim().0 {
            write!(f, "[ ")?;
            #[allow(clippy::needless_range_loop)]
            for right_index in 0..self.matrix.dim().1 {
                write!(
                    f,
                    "{: >width$}",
                    scores[[left_index, right_index]],
                    width = score_column_widths[right_index],
                )?;
                write!(
                    f,
                    "{} ",
                    self.matrix[[left_index, right_index]]
                        .best_state(self.optimization)
                        .map(BaseAlignmentType::letter)
                        .unwrap_or('N')
                )?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
