use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    segment::{FeatureValue, Sequence},
};

use super::{Comparator, check_finite_weights};

/// A multiplier for the score of one symbol pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPairFactor {
    pub left: String,
    pub right: String,
    pub factor: f64,
}

/// Multiplies the score of the wrapped comparator for known symbol pairs, in either order.
///
/// Used to strengthen or weaken sound correspondences that were observed before.
#[derive(Debug, Clone, PartialEq)]
pub struct ReinforcementComparator<C> {
    inner: C,
    /// Symmetric, every pair is stored in both orders.
    factors: BTreeMap<String, BTreeMap<String, f64>>,
}

impl<C> ReinforcementComparator<C> {
    pub fn new(inner: C, factors: impl IntoIterator<Item = SymbolPairFactor>) -> Result<Self> {
        let mut factor_map: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for SymbolPairFactor {
            left,
            right,
            factor,
        } in factors
        {
            check_finite_weights(&[factor], "reinforcement factors")?;
            factor_map
                .entry(right.clone())
                .or_default()
                .insert(left.clone(), factor);
            factor_map.entry(left).or_default().insert(right, factor);
        }

        Ok(Self {
            inner,
            factors: factor_map,
        })
    }

    fn factor(&self, left: &str, right: &str) -> f64 {
        self.factors
            .get(left)
            .and_then(|factors| factors.get(right))
            .copied()
            .unwrap_or(1.0)
    }
}

impl<T: FeatureValue, C: Comparator<T>> Comparator<T> for ReinforcementComparator<C> {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        self.inner.apply(left, right, i, j) * self.factor(left[i].symbol(), right[j].symbol())
    }

    fn name(&self) -> &'static str {
        "reinforcement"
    }
}
