use crate::{
    error::Error,
    needleman_wunsch::TieMode,
    segment::Ternary,
};

use super::{
    AlgorithmKind, AlignerConfig, ComparatorConfig, FeatureDomain, GapPenaltyConfig,
    read_feature_domain,
};

const LETTERS: &str = r##"
name = "letters"
feature_domain = "integer"
features = ["id"]
gap = { symbol = "_", features = [0] }
boundary = { symbol = "#", features = [-1] }

[symbols]
a = [1]
b = [2]
c = [3]
"##;

const TERNARY: &str = r##"
name = "ternary"
feature_domain = "ternary"
features = ["voice", "nasal"]
gap = { symbol = "-", features = ["0", "0"] }
boundary = { symbol = "#", features = ["-", "+"] }
optimization = "min"
algorithm = "hirschberg"
ties = "single"

[symbols]
p = ["-", "-"]
b = ["+", "-"]
m = ["+", "+"]

[gap_penalty]
type = "convex"
open = 2.0
extend = 1.0

[comparator]
type = "weighted"
weights = [1.0, 2.0]
"##;

#[test]
fn defaults() {
    let config = AlignerConfig::<i64>::from_toml_str(LETTERS).unwrap();
    assert_eq!(config.feature_domain, FeatureDomain::Integer);
    assert_eq!(config.algorithm, AlgorithmKind::NeedlemanWunsch);
    assert_eq!(config.ties, TieMode::All);
    assert_eq!(config.max_alignments, 100);
    assert_eq!(config.gap_penalty, GapPenaltyConfig::Null);
    assert_eq!(config.comparator, ComparatorConfig::default());
    assert_eq!(config.symbols["b"], vec![2]);

    let aligner = config.build().unwrap();
    assert_eq!(aligner.name(), "letters");
    assert_eq!(aligner.algorithm().name(), "needleman-wunsch");
    let result = aligner.align_words("aba", "baba").unwrap();
    assert_eq!(result.score().as_f64(), 1.0);
    assert_eq!(result.alignments().len(), 1);
}

#[test]
fn ternary_hirschberg() {
    assert_eq!(read_feature_domain(TERNARY).unwrap(), FeatureDomain::Ternary);
    let config = AlignerConfig::<Ternary>::read_toml(TERNARY.as_bytes()).unwrap();
    assert_eq!(config.gap.features, vec![Ternary::Unspecified; 2]);
    assert_eq!(
        config.gap_penalty,
        GapPenaltyConfig::Convex {
            open: 2.0,
            extend: 1.0
        }
    );

    let aligner = config.build().unwrap();
    assert_eq!(aligner.algorithm().name(), "hirschberg");
    let result = aligner.align_words("pm", "bm").unwrap();
    // Only the voice feature differs, by two steps.
    assert_eq!(result.score().as_f64(), 2.0);
    assert!(result.best_alignment().unwrap().is_gap_free());
}

#[test]
fn weights_must_match_features() {
    let input = format!("{LETTERS}\n[comparator]\ntype = \"weighted\"\nweights = [1.0, 2.0]\n");
    let config = AlignerConfig::<i64>::from_toml_str(&input).unwrap();
    assert!(matches!(
        config.build(),
        Err(Error::InvalidConfiguration(_))
    ));

    let input = format!(
        "{LETTERS}\n[comparator]\ntype = \"matrix\"\nmatrix = [[1.0, 0.0], [0.0, 1.0]]\n"
    );
    let config = AlignerConfig::<i64>::from_toml_str(&input).unwrap();
    assert!(matches!(
        config.build(),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn invalid_configurations() {
    let input = LETTERS.replace("[symbols]", "max_alignments = 0\n\n[symbols]");
    let config = AlignerConfig::<i64>::from_toml_str(&input).unwrap();
    assert!(matches!(
        config.build(),
        Err(Error::InvalidConfiguration(_))
    ));

    let input = format!("{LETTERS}\n[gap_penalty]\ntype = \"quadratic\"\n");
    assert!(matches!(
        AlignerConfig::<i64>::from_toml_str(&input),
        Err(Error::Toml(_))
    ));

    let input = format!("{LETTERS}\n[gap_penalty]\ntype = \"convex\"\nopen = nan\nextend = 1.0\n");
    let config = AlignerConfig::<i64>::from_toml_str(&input).unwrap();
    assert!(config.build().is_err());

    let input = LETTERS.replace(
        "[symbols]",
        "[[reinforcement]]\nleft = \"a\"\nright = \"x\"\nfactor = 0.5\n\n[symbols]",
    );
    let config = AlignerConfig::<i64>::from_toml_str(&input).unwrap();
    assert!(matches!(config.build(), Err(Error::UnknownSymbol(_))));

    let input = LETTERS.replace("features = [\"id\"]", "features = [\"id\"]\ncolour = \"blue\"");
    assert!(matches!(
        AlignerConfig::<i64>::from_toml_str(&input),
        Err(Error::Toml(_))
    ));
}

#[test]
fn decorated_comparator() {
    let input = LETTERS.replace(
        "[symbols]",
        "context_weight = 0.5\n\n[[reinforcement]]\nleft = \"a\"\nright = \"b\"\nfactor = 0.25\n\n[symbols]",
    );
    let aligner = AlignerConfig::<i64>::from_toml_str(&input)
        .unwrap()
        .build()
        .unwrap();
    let result = aligner.align_words("a", "b").unwrap();
    // The boundaries add half of the a/b mismatch as context, and the a/b column is reinforced to a quarter.
    assert_eq!(result.score().as_f64(), 0.75);
}
