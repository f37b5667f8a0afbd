use std::{
    fmt::{Display, Formatter, Result},
    time::Duration,
};

use ndarray::Array2;
use noisy_float::types::{R64, r64};
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::{alignment::Alignment, score::Score, segment::Sequence};

/// The outcome of aligning two sequences.
///
/// Every alignment has the optimal score, and if a score table was computed, its last cell holds that score as well.
#[derive(Debug, Clone)]
pub struct AlignmentResult<T> {
    left: Sequence<T>,
    right: Sequence<T>,
    table: Option<Array2<Score>>,
    score: Score,
    alignments: Vec<Alignment<T>>,
    statistics: AlignmentStatistics,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[must_use]
pub struct AlignmentStatistics {
    pub algorithm: String,
    pub left: String,
    pub right: String,
    pub score: R64,
    /// The score divided by the number of columns of the first alignment.
    pub score_per_column: R64,
    pub alignment_count: usize,
    pub column_count: usize,
    pub computed_cells: usize,
    /// True if more co-optimal alignments exist than were enumerated.
    pub tie_limit_reached: bool,
    pub duration_seconds: R64,
}

impl<T> AlignmentResult<T> {
    #[expect(clippy::too_many_arguments)]
    pub(crate) fn new(
        algorithm: &str,
        left: Sequence<T>,
        right: Sequence<T>,
        table: Option<Array2<Score>>,
        score: Score,
        alignments: Vec<Alignment<T>>,
        computed_cells: usize,
        tie_limit_reached: bool,
        duration: Duration,
    ) -> Self {
        let column_count = alignments.first().map(Alignment::columns).unwrap_or(0);
        let statistics = AlignmentStatistics {
            algorithm: algorithm.to_string(),
            left: left.symbols(),
            right: right.symbols(),
            score: score.as_r64(),
            score_per_column: if column_count == 0 {
                R64::zero()
            } else {
                score.as_r64() / r64(column_count as f64)
            },
            alignment_count: alignments.len(),
            column_count,
            computed_cells,
            tie_limit_reached,
            duration_seconds: r64(duration.as_secs_f64()),
        };

        Self {
            left,
            right,
            table,
            score,
            alignments,
            statistics,
        }
    }

    pub fn left(&self) -> &Sequence<T> {
        &self.left
    }

    pub fn right(&self) -> &Sequence<T> {
        &self.right
    }

    /// The best score of each cell of the dynamic programming matrix.
    ///
    /// Linear-space algorithms do not keep a table.
    pub fn table(&self) -> Option<&Array2<Score>> {
        self.table.as_ref()
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn alignments(&self) -> &[Alignment<T>] {
        &self.alignments
    }

    /// The first optimal alignment, which is the one preferred by the tie-breaking order.
    pub fn best_alignment(&self) -> Option<&Alignment<T>> {
        self.alignments.first()
    }

    pub fn into_alignments(self) -> Vec<Alignment<T>> {
        self.alignments
    }

    pub fn statistics(&self) -> &AlignmentStatistics {
        &self.statistics
    }
}

impl<T> Display for AlignmentResult<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for alignment in &self.alignments {
            writeln!(f, "{alignment}")?;
            writeln!(f)?;
        }
        write!(f, "{}", self.statistics)
    }
}

impl Display for AlignmentStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "Score per column: {:.2}", self.score_per_column)?;
        writeln!(f, "Alignments: {}", self.alignment_count)?;
        if self.tie_limit_reached {
            writeln!(f, "More co-optimal alignments exist")?;
        }
        writeln!(f, "Columns: {}", self.column_count)?;
        writeln!(f, "Computed cells: {}", self.computed_cells)?;
        write!(f, "Duration: {:.2}s", self.duration_seconds)?;

        Ok(())
    }
}
