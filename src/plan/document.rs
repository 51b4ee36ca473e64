//! clingo JSON result documents (`clingo --outf=2`).
//!
//! Only the parts needed to pull one answer set out are modelled:
//! `Call[0].Witnesses[k].Value`. Everything else clingo emits (timing,
//! statistics, `Result`) is ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InputError, ValidationError};

/// Which answer set of a multi-model result to replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WitnessSelector {
    /// The first model clingo reported.
    #[default]
    First,
    /// The last model (the best one under optimization).
    Last,
    /// A zero-based model index.
    Index(usize),
}

impl WitnessSelector {
    fn resolve(self, available: usize) -> Result<usize, InputError> {
        let index = match self {
            Self::First => 0,
            Self::Last => available.saturating_sub(1),
            Self::Index(i) => i,
        };
        if index < available {
            Ok(index)
        } else {
            Err(InputError::WitnessOutOfRange { index, available })
        }
    }
}

impl fmt::Display for WitnessSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl FromStr for WitnessSelector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            other => other
                .parse()
                .map(Self::Index)
                .map_err(|_| ValidationError::InvalidWitness {
                    value: s.to_string(),
                }),
        }
    }
}

impl TryFrom<String> for WitnessSelector {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WitnessSelector> for String {
    fn from(value: WitnessSelector) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct ClingoOutput {
    #[serde(rename = "Call")]
    call: Option<Vec<Call>>,
}

#[derive(Debug, Deserialize)]
struct Call {
    #[serde(rename = "Witnesses")]
    witnesses: Option<Vec<Witness>>,
}

#[derive(Debug, Deserialize)]
struct Witness {
    #[serde(rename = "Value", default)]
    value: Vec<String>,
}

/// Drops `//` comment lines clingo sometimes prepends to its JSON output.
#[must_use]
pub fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracts the atoms of the selected witness of the first call.
pub fn extract_atoms(text: &str, selector: WitnessSelector) -> Result<Vec<String>, InputError> {
    let cleaned = strip_comment_lines(text);
    let output: ClingoOutput =
        serde_json::from_str(&cleaned).map_err(|e| InputError::MalformedPlan {
            reason: e.to_string(),
        })?;

    let call = output
        .call
        .and_then(|calls| calls.into_iter().next())
        .ok_or_else(|| InputError::MissingField {
            field: "Call".to_string(),
        })?;
    let mut witnesses = call
        .witnesses
        .filter(|w| !w.is_empty())
        .ok_or_else(|| InputError::MissingField {
            field: "Call[0].Witnesses".to_string(),
        })?;

    let index = selector.resolve(witnesses.len())?;
    Ok(witnesses.swap_remove(index).value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MODELS: &str = r#"// clingo version 5.6.2
{
  "Solver": "clingo version 5.6.2",
  "Call": [
    {
      "Witnesses": [
        { "Value": ["occurs(object(robot,1),pickup,1)"] },
        { "Value": ["occurs(object(robot,1),putdown,1)"], "Costs": [1] }
      ]
    }
  ],
  "Result": "OPTIMUM FOUND"
}"#;

    #[test]
    fn strips_comments_and_selects_witness() {
        let first = extract_atoms(TWO_MODELS, WitnessSelector::First).unwrap();
        assert_eq!(first, vec!["occurs(object(robot,1),pickup,1)".to_string()]);
        let last = extract_atoms(TWO_MODELS, WitnessSelector::Last).unwrap();
        assert_eq!(last, vec!["occurs(object(robot,1),putdown,1)".to_string()]);
        let second = extract_atoms(TWO_MODELS, WitnessSelector::Index(1)).unwrap();
        assert_eq!(second, last);
    }

    #[test]
    fn witness_out_of_range_is_fatal() {
        let err = extract_atoms(TWO_MODELS, WitnessSelector::Index(5)).unwrap_err();
        assert!(matches!(
            err,
            InputError::WitnessOutOfRange {
                index: 5,
                available: 2
            }
        ));
    }

    #[test]
    fn structural_problems_are_fatal() {
        assert!(matches!(
            extract_atoms("not json", WitnessSelector::First),
            Err(InputError::MalformedPlan { .. })
        ));
        assert!(matches!(
            extract_atoms("{}", WitnessSelector::First),
            Err(InputError::MissingField { .. })
        ));
        assert!(matches!(
            extract_atoms(r#"{"Call": []}"#, WitnessSelector::First),
            Err(InputError::MissingField { .. })
        ));
        assert!(matches!(
            extract_atoms(r#"{"Call": [{}]}"#, WitnessSelector::First),
            Err(InputError::MissingField { .. })
        ));
        assert!(matches!(
            extract_atoms(r#"{"Call": [{"Witnesses": []}]}"#, WitnessSelector::First),
            Err(InputError::MissingField { .. })
        ));
    }

    #[test]
    fn witness_without_value_is_empty() {
        let atoms =
            extract_atoms(r#"{"Call": [{"Witnesses": [{}]}]}"#, WitnessSelector::First).unwrap();
        assert!(atoms.is_empty());
    }

    #[test]
    fn selector_parses_and_displays() {
        assert_eq!("first".parse::<WitnessSelector>().unwrap(), WitnessSelector::First);
        assert_eq!("last".parse::<WitnessSelector>().unwrap(), WitnessSelector::Last);
        assert_eq!("3".parse::<WitnessSelector>().unwrap(), WitnessSelector::Index(3));
        assert!("best".parse::<WitnessSelector>().is_err());
        assert_eq!(WitnessSelector::Index(2).to_string(), "2");
    }
}
