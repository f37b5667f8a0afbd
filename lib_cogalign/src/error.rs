use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}.")]
    Io(#[from] std::io::Error),

    #[error("The configuration could not be deserialised: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("A parsing error of kind '{kind:?}' occurred when the remaining input was '{input}'.")]
    Parser {
        input: String,
        kind: nom::error::ErrorKind,
    },

    #[error("Parsing was unsuccessful due to incomplete input: {0:?}.")]
    ParserIncomplete(nom::Needed),

    #[error("The symbol '{0}' is not defined by the feature model.")]
    UnknownSymbol(String),

    #[error("Expected exactly {expected} sequences, but got {actual}.")]
    WrongSequenceCount { expected: usize, actual: usize },

    #[error("The sequences were built from different feature models '{left}' and '{right}'.")]
    FeatureModelMismatch { left: String, right: String },

    #[error("Segment '{symbol}' has {actual} features, but the feature model defines {expected}.")]
    FeatureCountMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    #[error("Alignment row {row} has {actual} columns, but the first row has {expected}.")]
    UnequalRowLengths {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Row {row} of the alignment does not spell the sequence it is scored against.")]
    AlignmentSequenceMismatch { row: usize },

    #[error("The {context} produced the non-finite score {value}.")]
    NonFiniteScore { context: &'static str, value: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
