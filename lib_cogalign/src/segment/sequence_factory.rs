use std::{cmp::Reverse, collections::BTreeMap, sync::Arc};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    io::parse_segment_symbols,
};

use super::{FeatureModel, FeatureValue, Segment, Sequence};

/// A symbol with its feature vector, as written in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDefinition<T> {
    pub symbol: String,
    pub features: Vec<T>,
}

/// Turns word forms into sequences and provides the canonical gap and boundary segments.
#[derive(Debug, Clone)]
pub struct SequenceFactory<T> {
    model: Arc<FeatureModel>,
    symbols: BTreeMap<String, Vec<T>>,
    /// All parseable symbols including the boundary, longest first.
    symbols_by_length: Vec<String>,
    gap: Segment<T>,
    boundary: Segment<T>,
    gap_sequence: Sequence<T>,
}

impl<T> SegmentDefinition<T> {
    pub fn new(symbol: impl Into<String>, features: Vec<T>) -> Self {
        Self {
            symbol: symbol.into(),
            features,
        }
    }
}

impl<T: FeatureValue> SequenceFactory<T> {
    pub fn new(
        model: Arc<FeatureModel>,
        symbols: impl IntoIterator<Item = SegmentDefinition<T>>,
        gap: SegmentDefinition<T>,
        boundary: SegmentDefinition<T>,
    ) -> Result<Self> {
        let gap = Segment::new_gap(gap.symbol, gap.features);
        let boundary = Segment::new_boundary(boundary.symbol, boundary.features);
        model.check_segment(&gap)?;
        model.check_segment(&boundary)?;

        if gap.symbol.is_empty() || boundary.symbol.is_empty() {
            return Err(Error::InvalidConfiguration(
                "the gap and boundary symbols must not be empty".to_string(),
            ));
        }
        if gap.symbol == boundary.symbol || gap == boundary {
            return Err(Error::InvalidConfiguration(
                "the gap and boundary segments must differ in symbol and features".to_string(),
            ));
        }

        let mut symbol_map = BTreeMap::new();
        for SegmentDefinition { symbol, features } in symbols {
            let segment = Segment::new(symbol, features);
            model.check_segment(&segment)?;

            if segment.symbol.is_empty() {
                return Err(Error::InvalidConfiguration(
                    "segment symbols must not be empty".to_string(),
                ));
            }
            if segment.symbol == gap.symbol || segment.symbol == boundary.symbol {
                return Err(Error::InvalidConfiguration(format!(
                    "the symbol '{}' is reserved for the gap or boundary segment",
                    segment.symbol
                )));
            }
            if segment == gap {
                return Err(Error::InvalidConfiguration(format!(
                    "the segment '{}' has the same features as the gap segment",
                    segment.symbol
                )));
            }
            if symbol_map
                .insert(segment.symbol, segment.features)
                .is_some()
            {
                return Err(Error::InvalidConfiguration(
                    "a segment symbol was defined twice".to_string(),
                ));
            }
        }

        let mut symbols_by_length: Vec<_> = symbol_map
            .keys()
            .cloned()
            .chain(std::iter::once(boundary.symbol.clone()))
            .collect();
        symbols_by_length.sort_by(|a, b| Reverse(a.len()).cmp(&Reverse(b.len())).then(a.cmp(b)));

        let gap_sequence = Sequence::new(model.clone(), vec![gap.clone()])?;
        trace!(
            "Created sequence factory for model '{}' with {} symbols",
            model.name(),
            symbol_map.len()
        );

        Ok(Self {
            model,
            symbols: symbol_map,
            symbols_by_length,
            gap,
            boundary,
            gap_sequence,
        })
    }

    pub fn model(&self) -> &Arc<FeatureModel> {
        &self.model
    }

    pub fn gap(&self) -> &Segment<T> {
        &self.gap
    }

    pub fn boundary(&self) -> &Segment<T> {
        &self.boundary
    }

    /// A sequence consisting of the gap segment only, as passed to comparators when scoring gap columns.
    pub fn gap_sequence(&self) -> &Sequence<T> {
        &self.gap_sequence
    }

    pub fn symbols(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.symbols
            .iter()
            .map(|(symbol, features)| (symbol.as_str(), features.as_slice()))
    }

    /// Looks up the segment for a symbol, including the gap and boundary symbols.
    pub fn segment(&self, symbol: &str) -> Result<Segment<T>> {
        if symbol == self.boundary.symbol {
            Ok(self.boundary.clone())
        } else if symbol == self.gap.symbol {
            Ok(self.gap.clone())
        } else {
            self.symbols
                .get(symbol)
                .map(|features| Segment::new(symbol, features.clone()))
                .ok_or_else(|| Error::UnknownSymbol(symbol.to_string()))
        }
    }

    /// Builds a sequence from already separated symbols.
    pub fn sequence_from_symbols<'symbol>(
        &self,
        symbols: impl IntoIterator<Item = &'symbol str>,
    ) -> Result<Sequence<T>> {
        let segments = symbols
            .into_iter()
            .map(|symbol| self.segment(symbol))
            .collect::<Result<_>>()?;
        Sequence::new(self.model.clone(), segments)
    }

    /// Tokenises a word form into segments without adding a boundary segment.
    pub fn parse_word_without_boundary(&self, word: &str) -> Result<Sequence<T>> {
        let segments = parse_segment_symbols(word, &self.symbols_by_length)?
            .into_iter()
            .map(|(base, full)| Ok(self.segment(base)?.relabeled(full)))
            .collect::<Result<_>>()?;
        Sequence::new(self.model.clone(), segments)
    }

    /// Tokenises a word form into segments, prepending the boundary segment unless the word starts with it.
    pub fn parse_word(&self, word: &str) -> Result<Sequence<T>> {
        self.parse_word_without_boundary(word)?
            .with_boundary(&self.boundary)
    }
}
