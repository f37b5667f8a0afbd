//! Cost models for gap runs.
//!
//! A gap penalty is evaluated once per gap position with the length of the run so far,
//! so `evaluate(0)` is the cost of opening a run and `evaluate(n)` for `n > 0` the cost of its `n+1`th position.

use std::sync::Arc;

use crate::error::{Error, Result};

pub trait GapPenalty: Send + Sync {
    /// Returns the marginal cost of one more gap position after `current_gap_length` positions of the same run.
    fn evaluate(&self, current_gap_length: usize) -> f64;

    /// True if `evaluate` distinguishes run lengths beyond opening and extending.
    fn depends_on_run_length(&self) -> bool {
        false
    }

    /// The total cost of a finished run of `run_length` gap positions.
    fn run_cost(&self, run_length: usize) -> f64 {
        (0..run_length).map(|length| self.evaluate(length)).sum()
    }

    fn name(&self) -> &'static str;
}

/// Gaps are free.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NullGapPenalty;

/// Every gap position costs the same.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantGapPenalty {
    cost: f64,
}

/// Opening a run costs `open`, every further position costs `extend`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvexGapPenalty {
    open: f64,
    extend: f64,
}

/// Opening a run costs `open`, the position after `n` positions costs `extend * n`.
///
/// The marginal cost grows with the run, so this penalty is meant for scoring finished alignments.
/// The dynamic programming recurrence only tracks the best run per state and may miss the optimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineGapPenalty {
    open: f64,
    extend: f64,
}

fn check_finite(value: f64, name: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidConfiguration(format!(
            "the gap {name} cost must be finite, but is {value}"
        )))
    }
}

impl ConstantGapPenalty {
    pub fn new(cost: f64) -> Result<Self> {
        Ok(Self {
            cost: check_finite(cost, "position")?,
        })
    }
}

impl ConvexGapPenalty {
    pub fn new(open: f64, extend: f64) -> Result<Self> {
        Ok(Self {
            open: check_finite(open, "open")?,
            extend: check_finite(extend, "extend")?,
        })
    }
}

impl AffineGapPenalty {
    pub fn new(open: f64, extend: f64) -> Result<Self> {
        Ok(Self {
            open: check_finite(open, "open")?,
            extend: check_finite(extend, "extend")?,
        })
    }
}

impl GapPenalty for NullGapPenalty {
    fn evaluate(&self, _current_gap_length: usize) -> f64 {
        0.0
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

impl GapPenalty for ConstantGapPenalty {
    fn evaluate(&self, _current_gap_length: usize) -> f64 {
        self.cost
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

impl GapPenalty for ConvexGapPenalty {
    fn evaluate(&self, current_gap_length: usize) -> f64 {
        if current_gap_length == 0 {
            self.open
        } else {
            self.extend
        }
    }

    fn name(&self) -> &'static str {
        "convex"
    }
}

impl GapPenalty for AffineGapPenalty {
    fn evaluate(&self, current_gap_length: usize) -> f64 {
        if current_gap_length == 0 {
            self.open
        } else {
            self.extend * current_gap_length as f64
        }
    }

    fn depends_on_run_length(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "affine"
    }
}

impl<Penalty: GapPenalty + ?Sized> GapPenalty for Box<Penalty> {
    fn evaluate(&self, current_gap_length: usize) -> f64 {
        self.as_ref().evaluate(current_gap_length)
    }

    fn depends_on_run_length(&self) -> bool {
        self.as_ref().depends_on_run_length()
    }

    fn name(&self) -> &'static str {
        self.as_ref().name()
    }
}

impl<Penalty: GapPenalty + ?Sized> GapPenalty for Arc<Penalty> {
    fn evaluate(&self, current_gap_length: usize) -> f64 {
        self.as_ref().evaluate(current_gap_length)
    }

    fn depends_on_run_length(&self) -> bool {
        self.as_ref().depends_on_run_length()
    }

    fn name(&self) -> &'static str {
        self.as_ref().name()
    }
}

impl<Penalty: GapPenalty + ?Sized> GapPenalty for &Penalty {
    fn evaluate(&self, current_gap_length: usize) -> f64 {
        (*self).evaluate(current_gap_length)
    }

    fn depends_on_run_length(&self) -> bool {
        (*self).depends_on_run_length()
    }

    fn name(&self) -> &'static str {
        (*self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::{AffineGapPenalty, ConstantGapPenalty, ConvexGapPenalty, GapPenalty, NullGapPenalty};

    #[test]
    fn variants() {
        assert_eq!(NullGapPenalty.evaluate(5), 0.0);

        let constant = ConstantGapPenalty::new(2.0).unwrap();
        assert_eq!(constant.evaluate(0), 2.0);
        assert_eq!(constant.evaluate(7), 2.0);
        assert_eq!(constant.run_cost(3), 6.0);

        let convex = ConvexGapPenalty::new(3.0, 1.0).unwrap();
        assert_eq!(convex.evaluate(0), 3.0);
        assert_eq!(convex.evaluate(1), 1.0);
        assert_eq!(convex.evaluate(4), 1.0);
        assert_eq!(convex.run_cost(3), 5.0);
        assert!(!convex.depends_on_run_length());

        let affine = AffineGapPenalty::new(3.0, 0.5).unwrap();
        assert_eq!(affine.evaluate(0), 3.0);
        assert_eq!(affine.evaluate(1), 0.5);
        assert_eq!(affine.evaluate(4), 2.0);
        assert_eq!(affine.run_cost(3), 4.5);
        assert!(affine.depends_on_run_length());
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        assert!(ConstantGapPenalty::new(f64::NAN).is_err());
        assert!(ConvexGapPenalty::new(1.0, f64::INFINITY).is_err());
        assert!(AffineGapPenalty::new(f64::NEG_INFINITY, 1.0).is_err());
    }

    #[test]
    fn boxed_penalties_delegate() {
        let boxed: Box<dyn GapPenalty> = Box::new(AffineGapPenalty::new(1.0, 1.0).unwrap());
        assert!(boxed.depends_on_run_length());
        assert_eq!(boxed.evaluate(2), 2.0);
        assert_eq!(boxed.name(), "affine");
    }
}
