use crate::{
    alignment_result::AlignmentResult,
    error::{Error, Result},
    segment::Sequence,
};

/// A pairwise alignment algorithm.
pub trait AlignmentAlgorithm<T>: Send + Sync {
    fn align_pair(&self, left: &Sequence<T>, right: &Sequence<T>) -> Result<AlignmentResult<T>>;

    /// Aligns exactly two sequences.
    fn align(&self, sequences: &[Sequence<T>]) -> Result<AlignmentResult<T>> {
        match sequences {
            [left, right] => self.align_pair(left, right),
            _ => Err(Error::WrongSequenceCount {
                expected: 2,
                actual: sequences.len(),
            }),
        }
    }

    fn name(&self) -> &'static str;
}
