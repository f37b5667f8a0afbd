use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub},
};

use noisy_float::types::R64;
use num_traits::{Bounded, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The score of an alignment, an alignment column or a dynamic programming cell.
///
/// Scores are always finite, which makes them totally ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(R64);

impl Score {
    /// Converts a raw comparator or gap penalty output into a score.
    ///
    /// `context` names the producer of the value for the error message.
    pub fn new(value: f64, context: &'static str) -> Result<Self> {
        R64::try_new(value)
            .map(Self)
            .ok_or(Error::NonFiniteScore { context, value })
    }

    /// Adds two scores, failing if the sum is not finite.
    pub fn checked_add(self, rhs: Self, context: &'static str) -> Result<Self> {
        Self::new(self.as_f64() + rhs.as_f64(), context)
    }

    /// Subtracts two scores, failing if the difference is not finite.
    pub fn checked_sub(self, rhs: Self, context: &'static str) -> Result<Self> {
        Self::new(self.as_f64() - rhs.as_f64(), context)
    }

    pub fn as_f64(&self) -> f64 {
        self.0.raw()
    }

    pub fn as_r64(&self) -> R64 {
        self.0
    }
}

impl From<R64> for Score {
    fn from(value: R64) -> Self {
        Self(value)
    }
}

impl From<Score> for R64 {
    fn from(value: Score) -> Self {
        value.0
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Score {
    type Output = Score;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Zero for Score {
    fn zero() -> Self {
        Self(R64::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Bounded for Score {
    fn min_value() -> Self {
        Self(R64::min_value())
    }

    fn max_value() -> Self {
        Self(R64::max_value())
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.raw().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use num_traits::{Bounded, Zero};

    use super::Score;
    use crate::error::Error;

    #[test]
    fn rejects_non_finite_values() {
        assert!(matches!(
            Score::new(f64::NAN, "comparator"),
            Err(Error::NonFiniteScore {
                context: "comparator",
                ..
            })
        ));
        assert!(Score::new(f64::INFINITY, "gap penalty").is_err());
        assert!(Score::new(f64::NEG_INFINITY, "gap penalty").is_err());
    }

    #[test]
    fn arithmetic_and_order() {
        let one = Score::new(1.0, "test").unwrap();
        let half = Score::new(0.5, "test").unwrap();
        assert_eq!((one + half).as_f64(), 1.5);
        assert_eq!((one - half).as_f64(), 0.5);
        assert_eq!([one, half, half].into_iter().sum::<Score>().as_f64(), 2.0);
        assert!(Score::min_value() < Score::zero());
        assert!(Score::zero() < Score::max_value());
        assert_eq!(one.to_string(), "1");
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let one = Score::new(1.0, "test").unwrap();
        let huge = Score::new(1e308, "test").unwrap();
        assert_eq!(one.checked_add(one, "test").unwrap().as_f64(), 2.0);
        assert_eq!(one.checked_sub(one, "test").unwrap().as_f64(), 0.0);
        assert!(matches!(
            huge.checked_add(huge, "alignment score"),
            Err(Error::NonFiniteScore {
                context: "alignment score",
                ..
            })
        ));
        assert!((-huge).checked_sub(huge, "alignment score").is_err());
    }
}
