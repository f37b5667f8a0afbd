use num_traits::Bounded;
use serde::{Deserialize, Serialize};

use crate::score::Score;

/// Whether alignments minimise a distance or maximise a similarity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Optimization {
    #[default]
    Min,
    Max,
}

impl Optimization {
    /// True if `a` is at least as good as `b`.
    pub fn test(&self, a: Score, b: Score) -> bool {
        match self {
            Self::Min => a <= b,
            Self::Max => a >= b,
        }
    }

    /// True if `a` is strictly better than `b`.
    pub fn is_better(&self, a: Score, b: Score) -> bool {
        !self.test(b, a)
    }

    /// Returns the better of both scores, preferring `a` on equality.
    pub fn apply(&self, a: Score, b: Score) -> Score {
        if self.test(a, b) { a } else { b }
    }

    /// The worst possible score, used for unreachable states.
    pub fn default_value(&self) -> Score {
        match self {
            Self::Min => Score::max_value(),
            Self::Max => Score::min_value(),
        }
    }

    pub fn is_default_value(&self, score: Score) -> bool {
        score == self.default_value()
    }

    /// Returns the best score, or `None` if there is none.
    pub fn best(&self, scores: impl IntoIterator<Item = Score>) -> Option<Score> {
        scores.into_iter().reduce(|a, b| self.apply(a, b))
    }
}

#[cfg(test)]
mod tests {
    use num_traits::Bounded;

    use super::Optimization;
    use crate::score::Score;

    fn score(value: f64) -> Score {
        Score::new(value, "test").unwrap()
    }

    #[test]
    fn min_and_max() {
        assert!(Optimization::Min.test(score(1.0), score(1.0)));
        assert!(Optimization::Min.test(score(1.0), score(2.0)));
        assert!(!Optimization::Max.test(score(1.0), score(2.0)));
        assert!(!Optimization::Min.is_better(score(1.0), score(1.0)));
        assert_eq!(Optimization::Max.apply(score(1.0), score(2.0)), score(2.0));
        assert_eq!(Optimization::Min.default_value(), Score::max_value());
        assert_eq!(Optimization::Max.default_value(), Score::min_value());
        assert_eq!(
            Optimization::Min.best([score(3.0), score(-1.0), score(2.0)]),
            Some(score(-1.0))
        );
        assert_eq!(Optimization::Max.best([]), None);
    }
}
