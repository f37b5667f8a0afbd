use std::{fmt::Debug, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A value of a single phonetic feature.
///
/// Comparators only ever look at the numeric projection of a feature value.
pub trait FeatureValue: Clone + PartialEq + Debug + Send + Sync + 'static {
    fn as_f64(&self) -> f64;
}

impl FeatureValue for i64 {
    fn as_f64(&self) -> f64 {
        *self as f64
    }
}

impl FeatureValue for bool {
    fn as_f64(&self) -> f64 {
        if *self { 1.0 } else { 0.0 }
    }
}

impl FeatureValue for f64 {
    fn as_f64(&self) -> f64 {
        *self
    }
}

/// A feature value in the classic `-`/`0`/`+` notation of distinctive feature theory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TernaryRepresentation", into = "String")]
pub enum Ternary {
    Negative,
    Unspecified,
    Positive,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TernaryRepresentation {
    Text(String),
    Number(i64),
}

impl FeatureValue for Ternary {
    fn as_f64(&self) -> f64 {
        match self {
            Self::Negative => -1.0,
            Self::Unspecified => 0.0,
            Self::Positive => 1.0,
        }
    }
}

impl FromStr for Ternary {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "-1" => Ok(Self::Negative),
            "0" => Ok(Self::Unspecified),
            "+" | "1" | "+1" => Ok(Self::Positive),
            other => Err(Error::InvalidConfiguration(format!(
                "'{other}' is not a ternary feature value, expected one of '-', '0' or '+'"
            ))),
        }
    }
}

impl TryFrom<TernaryRepresentation> for Ternary {
    type Error = String;

    fn try_from(value: TernaryRepresentation) -> Result<Self, Self::Error> {
        match value {
            TernaryRepresentation::Text(text) => {
                text.parse().map_err(|error: Error| error.to_string())
            }
            TernaryRepresentation::Number(-1) => Ok(Self::Negative),
            TernaryRepresentation::Number(0) => Ok(Self::Unspecified),
            TernaryRepresentation::Number(1) => Ok(Self::Positive),
            TernaryRepresentation::Number(other) => Err(format!(
                "{other} is not a ternary feature value, expected one of -1, 0 or 1"
            )),
        }
    }
}

impl From<Ternary> for String {
    fn from(value: Ternary) -> Self {
        match value {
            Ternary::Negative => "-",
            Ternary::Unspecified => "0",
            Ternary::Positive => "+",
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{FeatureValue, Ternary};

    #[test]
    fn ternary_parsing() {
        assert_eq!("+".parse::<Ternary>().unwrap(), Ternary::Positive);
        assert_eq!(" 0 ".parse::<Ternary>().unwrap(), Ternary::Unspecified);
        assert_eq!("-".parse::<Ternary>().unwrap(), Ternary::Negative);
        assert!("x".parse::<Ternary>().is_err());
    }

    #[test]
    fn numeric_projection() {
        assert_eq!(Ternary::Negative.as_f64(), -1.0);
        assert_eq!(true.as_f64(), 1.0);
        assert_eq!(false.as_f64(), 0.0);
        assert_eq!(7i64.as_f64(), 7.0);
        assert_eq!(0.25f64.as_f64(), 0.25);
    }
}
