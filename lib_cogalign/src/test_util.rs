use std::sync::Arc;

use crate::segment::{FeatureModel, SegmentDefinition, Sequence, SequenceFactory};

pub const LETTERS: &str = "abcd";

/// A factory over a single integer feature that gives every letter of [`LETTERS`] its own value.
pub fn letter_factory() -> SequenceFactory<i64> {
    let model = Arc::new(FeatureModel::new("letters", vec!["id".to_string()]));
    SequenceFactory::new(
        model,
        LETTERS
            .chars()
            .zip(1..)
            .map(|(letter, id)| SegmentDefinition::new(letter.to_string(), vec![id])),
        SegmentDefinition::new("_", vec![0]),
        SegmentDefinition::new("#", vec![-1]),
    )
    .unwrap()
}

/// A factory with three real-valued features, for comparators that weigh feature differences.
pub fn phonetic_factory() -> SequenceFactory<f64> {
    let model = Arc::new(FeatureModel::new(
        "phonetic",
        vec![
            "voice".to_string(),
            "place".to_string(),
            "manner".to_string(),
        ],
    ));
    SequenceFactory::new(
        model,
        [
            ("p", vec![0.0, 1.0, 0.0]),
            ("b", vec![1.0, 1.0, 0.0]),
            ("t", vec![0.0, 2.0, 0.0]),
            ("d", vec![1.0, 2.0, 0.0]),
            ("s", vec![0.0, 2.0, 1.0]),
            ("a", vec![1.0, 0.0, 3.0]),
            ("i", vec![1.0, 0.5, 3.0]),
        ]
        .into_iter()
        .map(|(symbol, features)| SegmentDefinition::new(symbol, features)),
        SegmentDefinition::new("-", vec![0.0, 0.0, -2.0]),
        SegmentDefinition::new("#", vec![0.0, 0.0, -4.0]),
    )
    .unwrap()
}

pub fn word(factory: &SequenceFactory<i64>, word: &str) -> Sequence<i64> {
    factory.parse_word(word).unwrap()
}

/// Deterministic xorshift generator for property tests.
pub struct Xorshift(u64);

impl Xorshift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }

    pub fn below(&mut self, limit: usize) -> usize {
        (self.next_u64() % limit as u64) as usize
    }

    /// A random word over the first `alphabet_size` letters of [`LETTERS`].
    pub fn word(&mut self, max_length: usize, alphabet_size: usize) -> String {
        let length = self.below(max_length + 1);
        (0..length)
            .map(|_| LETTERS.as_bytes()[self.below(alphabet_size)] as char)
            .collect()
    }
}
