use ndarray::Array2;

use crate::{
    error::{Error, Result},
    segment::{FeatureValue, Sequence},
};

use super::{Comparator, check_finite_weights, feature_differences};

/// The quadratic form `dᵀ M d` over the absolute feature differences `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixComparator {
    matrix: Array2<f64>,
}

impl MatrixComparator {
    /// Builds the comparator from the rows of a square weight matrix.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dimension = rows.len();
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != dimension)
        {
            return Err(Error::InvalidConfiguration(format!(
                "the weight matrix must be square, but row {index} has {} entries instead of {dimension}",
                row.len()
            )));
        }

        let values: Vec<_> = rows.into_iter().flatten().collect();
        check_finite_weights(&values, "matrix weights")?;
        let matrix = Array2::from_shape_vec((dimension, dimension), values)
            .map_err(|error| Error::InvalidConfiguration(error.to_string()))?;
        Ok(Self { matrix })
    }

    pub fn dimension(&self) -> usize {
        self.matrix.dim().0
    }
}

impl<T: FeatureValue> Comparator<T> for MatrixComparator {
    fn apply(&self, left: &Sequence<T>, right: &Sequence<T>, i: usize, j: usize) -> f64 {
        let differences: Vec<_> = feature_differences(&left[i], &right[j]).collect();
        let dimension = self.dimension().min(differences.len());

        let mut result = 0.0;
        for a in 0..dimension {
            for b in 0..dimension {
                result += self.matrix[[a, b]] * differences[a] * differences[b];
            }
        }
        result
    }

    fn name(&self) -> &'static str {
        "matrix"
    }
}
