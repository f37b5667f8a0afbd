//! Aligners described in TOML.

use std::{collections::BTreeMap, sync::Arc};

use log::{debug, warn};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    alignment_algorithm::AlignmentAlgorithm,
    alignment_result::AlignmentResult,
    comparator::{
        Comparator, ContextComparator, FeatureInteraction, MatrixComparator, MismatchComparator,
        ReinforcementComparator, SparseComparator, SymbolPairFactor, WeightedComparator,
    },
    error::{Error, Result},
    gap_penalty::{
        AffineGapPenalty, ConstantGapPenalty, ConvexGapPenalty, GapPenalty, NullGapPenalty,
    },
    hirschberg::HirschbergAlgorithm,
    needleman_wunsch::{DEFAULT_MAX_ALIGNMENTS, NeedlemanWunschAlgorithm, TieMode},
    optimization::Optimization,
    segment::{FeatureModel, FeatureValue, SegmentDefinition, SequenceFactory},
};

#[cfg(test)]
mod tests;

/// The value type of all features of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureDomain {
    Integer,
    Boolean,
    Ternary,
    Real,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    #[default]
    NeedlemanWunsch,
    Hirschberg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GapPenaltyConfig {
    #[default]
    Null,
    Constant {
        cost: f64,
    },
    Convex {
        open: f64,
        extend: f64,
    },
    Affine {
        open: f64,
        extend: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ComparatorConfig {
    Mismatch {
        #[serde(default)]
        match_score: f64,
        #[serde(default = "default_mismatch_score")]
        mismatch_score: f64,
    },
    /// Without weights, every feature is weighted with one.
    Weighted {
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
    Sparse {
        weights: Vec<f64>,
        #[serde(default)]
        interactions: Vec<FeatureInteraction>,
    },
    Matrix {
        matrix: Vec<Vec<f64>>,
    },
}

/// The complete description of an aligner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignerConfig<T> {
    pub name: String,
    pub feature_domain: FeatureDomain,
    pub features: Vec<String>,
    pub gap: SegmentDefinition<T>,
    pub boundary: SegmentDefinition<T>,
    #[serde(default)]
    pub optimization: Optimization,
    #[serde(default)]
    pub algorithm: AlgorithmKind,
    #[serde(default)]
    pub ties: TieMode,
    #[serde(default = "default_max_alignments")]
    pub max_alignments: usize,
    #[serde(default)]
    pub parallel: bool,
    /// Reweights comparator scores by the scores of the neighbouring segment pairs.
    #[serde(default)]
    pub context_weight: Option<f64>,
    #[serde(default)]
    pub reinforcement: Vec<SymbolPairFactor>,
    pub symbols: BTreeMap<String, Vec<T>>,
    #[serde(default)]
    pub gap_penalty: GapPenaltyConfig,
    #[serde(default)]
    pub comparator: ComparatorConfig,
}

#[derive(Deserialize)]
struct FeatureDomainProbe {
    feature_domain: FeatureDomain,
}

/// A configured aligner that turns word forms into sequences and aligns them.
pub struct Aligner<T> {
    name: String,
    factory: SequenceFactory<T>,
    algorithm: Box<dyn AlignmentAlgorithm<T>>,
}

fn default_mismatch_score() -> f64 {
    1.0
}

fn default_max_alignments() -> usize {
    DEFAULT_MAX_ALIGNMENTS
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        Self::Mismatch {
            match_score: 0.0,
            mismatch_score: default_mismatch_score(),
        }
    }
}

/// Reads only the feature domain of a configuration, to decide which feature type to deserialise it with.
pub fn read_feature_domain(input: &str) -> Result<FeatureDomain> {
    let probe: FeatureDomainProbe = toml::from_str(input)?;
    Ok(probe.feature_domain)
}

impl GapPenaltyConfig {
    pub fn build(&self) -> Result<Box<dyn GapPenalty>> {
        Ok(match *self {
            Self::Null => Box::new(NullGapPenalty),
            Self::Constant { cost } => Box::new(ConstantGapPenalty::new(cost)?),
            Self::Convex { open, extend } => Box::new(ConvexGapPenalty::new(open, extend)?),
            Self::Affine { open, extend } => Box::new(AffineGapPenalty::new(open, extend)?),
        })
    }
}

impl ComparatorConfig {
    /// Builds the comparator for segments with `feature_count` features.
    pub fn build<T: FeatureValue>(&self, feature_count: usize) -> Result<Box<dyn Comparator<T>>> {
        let check_length = |what: &str, length: usize| {
            if length == feature_count {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration(format!(
                    "the comparator has {length} {what}, but there are {feature_count} features"
                )))
            }
        };

        Ok(match self {
            Self::Mismatch {
                match_score,
                mismatch_score,
            } => Box::new(MismatchComparator::new(*match_score, *mismatch_score)?),
            Self::Weighted { weights: None } => {
                Box::new(WeightedComparator::uniform(feature_count))
            }
            Self::Weighted {
                weights: Some(weights),
            } => {
                check_length("weights", weights.len())?;
                Box::new(WeightedComparator::new(weights.clone())?)
            }
            Self::Sparse {
                weights,
                interactions,
            } => {
                check_length("weights", weights.len())?;
                Box::new(SparseComparator::new(
                    weights.clone(),
                    interactions.clone(),
                )?)
            }
            Self::Matrix { matrix } => {
                let comparator = MatrixComparator::new(matrix.clone())?;
                check_length("matrix rows", comparator.dimension())?;
                Box::new(comparator)
            }
        })
    }
}

impl<T: FeatureValue + DeserializeOwned> AlignerConfig<T> {
    pub fn read_toml(mut reader: impl std::io::Read) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::from_toml_str(&input)
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

impl<T: FeatureValue> AlignerConfig<T> {
    /// Validates the configuration and builds the aligner it describes.
    pub fn build(self) -> Result<Aligner<T>> {
        if self.max_alignments == 0 {
            return Err(Error::InvalidConfiguration(
                "max_alignments must be at least one".to_string(),
            ));
        }

        let model = Arc::new(FeatureModel::new(self.name.clone(), self.features));
        let factory = SequenceFactory::new(
            model,
            self.symbols
                .into_iter()
                .map(|(symbol, features)| SegmentDefinition::new(symbol, features)),
            self.gap,
            self.boundary,
        )?;
        let feature_count = factory.model().feature_count();

        let mut comparator = self.comparator.build(feature_count)?;
        if let Some(context_weight) = self.context_weight {
            comparator = Box::new(ContextComparator::new(comparator, context_weight)?);
        }
        if !self.reinforcement.is_empty() {
            for factor in &self.reinforcement {
                factory.segment(&factor.left)?;
                factory.segment(&factor.right)?;
            }
            comparator = Box::new(ReinforcementComparator::new(
                comparator,
                self.reinforcement,
            )?);
        }
        let gap_penalty = self.gap_penalty.build()?;

        if self.algorithm == AlgorithmKind::Hirschberg {
            if self.ties == TieMode::All {
                debug!("Hirschberg reports a single alignment, ignoring ties = \"all\"");
            }
            if gap_penalty.depends_on_run_length() {
                warn!(
                    "Gap penalty '{}' depends on the run length, Hirschberg may report a suboptimal alignment",
                    gap_penalty.name()
                );
            }
        }

        let needleman_wunsch = NeedlemanWunschAlgorithm::new(
            comparator,
            gap_penalty,
            self.optimization,
            factory.gap_sequence().clone(),
        )
        .with_tie_mode(self.ties)
        .with_max_alignments(self.max_alignments);
        let algorithm: Box<dyn AlignmentAlgorithm<T>> = match self.algorithm {
            AlgorithmKind::NeedlemanWunsch => Box::new(needleman_wunsch),
            AlgorithmKind::Hirschberg => {
                Box::new(HirschbergAlgorithm::new(needleman_wunsch).with_parallel(self.parallel))
            }
        };

        debug!(
            "Built aligner '{}' with {} features using {}",
            self.name,
            feature_count,
            algorithm.name()
        );
        Ok(Aligner {
            name: self.name,
            factory,
            algorithm,
        })
    }
}

impl<T: FeatureValue> Aligner<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn factory(&self) -> &SequenceFactory<T> {
        &self.factory
    }

    pub fn algorithm(&self) -> &dyn AlignmentAlgorithm<T> {
        self.algorithm.as_ref()
    }

    /// Parses both word forms and aligns them.
    pub fn align_words(&self, left: &str, right: &str) -> Result<AlignmentResult<T>> {
        let left = self.factory.parse_word(left)?;
        let right = self.factory.parse_word(right)?;
        self.algorithm.align_pair(&left, &right)
    }
}
