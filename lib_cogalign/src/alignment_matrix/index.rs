use std::ops::{Index, IndexMut};

use ndarray::Array2;

use super::BaseAlignmentType;

/// A cell of the alignment matrix, counted in consumed left and right segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentMatrixIndex {
    pub(in crate::alignment_matrix) left_index: usize,
    pub(in crate::alignment_matrix) right_index: usize,
}

impl AlignmentMatrixIndex {
    pub fn new(left_index: usize, right_index: usize) -> Self {
        Self {
            left_index,
            right_index,
        }
    }

    pub fn left_index(&self) -> usize {
        self.left_index
    }

    pub fn right_index(&self) -> usize {
        self.right_index
    }

    pub fn is_origin(&self) -> bool {
        self.left_index == 0 && self.right_index == 0
    }

    pub fn insertion_predecessor(&self) -> Self {
        debug_assert!(self.right_index > 0);

        Self {
            left_index: self.left_index,
            right_index: self.right_index - 1,
        }
    }

    pub fn deletion_predecessor(&self) -> Self {
        debug_assert!(self.left_index > 0);

        Self {
            left_index: self.left_index - 1,
            right_index: self.right_index,
        }
    }

    pub fn substitution_predecessor(&self) -> Self {
        debug_assert!(self.left_index > 0);
        debug_assert!(self.right_index > 0);

        Self {
            left_index: self.left_index - 1,
            right_index: self.right_index - 1,
        }
    }

    /// The cell from which a move of the given type leads into this cell.
    pub fn predecessor(&self, alignment_type: BaseAlignmentType) -> Self {
        match alignment_type {
            BaseAlignmentType::Substitution => self.substitution_predecessor(),
            BaseAlignmentType::Deletion => self.deletion_predecessor(),
            BaseAlignmentType::Insertion => self.insertion_predecessor(),
        }
    }
}

impl<T> Index<AlignmentMatrixIndex> for Array2<T> {
    type Output = <Array2<T> as Index<[usize; 2]>>::Output;

    fn index(&self, index: AlignmentMatrixIndex) -> &Self::Output {
        &self[[index.left_index, index.right_index]]
    }
}

impl<T> IndexMut<AlignmentMatrixIndex> for Array2<T> {
    fn index_mut(&mut self, index: AlignmentMatrixIndex) -> &mut Self::Output {
        &mut self[[index.left_index, index.right_index]]
    }
}
