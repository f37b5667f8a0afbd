//! Segments, sequences and the feature model they are defined over.

use std::{fmt::Display, ops::Index, sync::Arc};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use feature_value::{FeatureValue, Ternary};
pub use sequence_factory::{SegmentDefinition, SequenceFactory};

pub mod feature_value;
pub mod sequence_factory;


/// Names the features every segment of a sequence carries, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureModel {
    name: String,
    feature_names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Regular,
    /// Stands for an elided position.
    Gap,
    /// Anchors the start of a word form.
    Boundary,
}

/// A symbol together with its feature vector.
///
/// Two segments are equal if their feature vectors are equal, regardless of their symbols.
#[derive(Debug, Clone)]
pub struct Segment<T> {
    symbol: String,
    features: Vec<T>,
    kind: SegmentKind,
}

/// An ordered list of segments over one feature model.
#[derive(Debug, Clone)]
pub struct Sequence<T> {
    model: Arc<FeatureModel>,
    segments: Vec<Segment<T>>,
}

impl FeatureModel {
    pub fn new(name: impl Into<String>, feature_names: Vec<String>) -> Self {
        Self {
            name: name.into(),
            feature_names,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Returns the position of the feature with the given name.
    pub fn feature_index(&self, feature_name: &str) -> Option<usize> {
        self.feature_names
            .iter()
            .position(|name| name == feature_name)
    }

    pub(crate) fn check_segment<T>(&self, segment: &Segment<T>) -> Result<()> {
        if segment.features.len() == self.feature_count() {
            Ok(())
        } else {
            Err(Error::FeatureCountMismatch {
                symbol: segment.symbol.clone(),
                expected: self.feature_count(),
                actual: segment.features.len(),
            })
        }
    }
}

impl<T> Segment<T> {
    pub fn new(symbol: impl Into<String>, features: Vec<T>) -> Self {
        Self::with_kind(symbol, features, SegmentKind::Regular)
    }

    pub fn new_gap(symbol: impl Into<String>, features: Vec<T>) -> Self {
        Self::with_kind(symbol, features, SegmentKind::Gap)
    }

    pub fn new_boundary(symbol: impl Into<String>, features: Vec<T>) -> Self {
        Self::with_kind(symbol, features, SegmentKind::Boundary)
    }

    fn with_kind(symbol: impl Into<String>, features: Vec<T>, kind: SegmentKind) -> Self {
        Self {
            symbol: symbol.into(),
            features,
            kind,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn features(&self) -> &[T] {
        &self.features
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_gap(&self) -> bool {
        self.kind == SegmentKind::Gap
    }

    pub fn is_boundary(&self) -> bool {
        self.kind == SegmentKind::Boundary
    }

    /// Replaces the display symbol, keeping features and kind.
    pub fn relabeled(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }
}

impl<T: PartialEq> PartialEq for Segment<T> {
    fn eq(&self, other: &Self) -> bool {
        self.features == other.features
    }
}

impl<T> Display for Segment<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

impl<T> Sequence<T> {
    /// Creates a sequence, checking that every segment matches the feature model.
    pub fn new(model: Arc<FeatureModel>, segments: Vec<Segment<T>>) -> Result<Self> {
        for segment in &segments {
            model.check_segment(segment)?;
        }

        Ok(Self { model, segments })
    }

    pub fn empty(model: Arc<FeatureModel>) -> Self {
        Self {
            model,
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, segment: Segment<T>) -> Result<()> {
        self.model.check_segment(&segment)?;
        self.segments.push(segment);
        Ok(())
    }

    pub fn model(&self) -> &Arc<FeatureModel> {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment<T>> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment<T>> {
        self.segments.iter()
    }

    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    /// True if the first segment is a boundary segment.
    pub fn starts_with_boundary(&self) -> bool {
        self.segments.first().is_some_and(Segment::is_boundary)
    }

    /// Returns the symbols of all segments joined without separator.
    pub fn symbols(&self) -> String {
        self.segments.iter().map(Segment::symbol).join("")
    }

    /// Checks that both sequences are defined over the same feature model.
    pub fn check_same_model(&self, other: &Self) -> Result<()> {
        if Arc::ptr_eq(&self.model, &other.model) || self.model == other.model {
            Ok(())
        } else {
            Err(Error::FeatureModelMismatch {
                left: self.model.name.clone(),
                right: other.model.name.clone(),
            })
        }
    }
}

impl<T: Clone> Sequence<T> {
    pub fn reversed(&self) -> Self {
        Self {
            model: self.model.clone(),
            segments: self.segments.iter().rev().cloned().collect(),
        }
    }

    /// Returns a copy of this sequence starting with `boundary`, unless it already starts with a boundary segment.
    pub fn with_boundary(&self, boundary: &Segment<T>) -> Result<Self> {
        if self.starts_with_boundary() {
            Ok(self.clone())
        } else {
            Self::new(
                self.model.clone(),
                std::iter::once(boundary.clone())
                    .chain(self.segments.iter().cloned())
                    .collect(),
            )
        }
    }
}

impl<T> Index<usize> for Sequence<T> {
    type Output = Segment<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.segments[index]
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.segments == other.segments
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a Segment<T>;
    type IntoIter = std::slice::Iter<'a, Segment<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl<T> Display for Sequence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbols())
    }
}
