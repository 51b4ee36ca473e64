//! Robot actions and their textual grammar.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::warehouse::{OrderId, ProductId};

const MOVE_PATTERN: &str = r"^move\(\s*(-?\d+)\s*,\s*(-?\d+)\s*\)$";
const DELIVER_PATTERN: &str = r"^deliver\(\s*(\w+)\s*,\s*(\w+)\s*,\s*(\d+)\s*\)$";

/// One thing a robot does during one timestep.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Displace the robot by `(dx, dy)`.
    Move {
        /// Column displacement.
        dx: i32,
        /// Row displacement.
        dy: i32,
    },
    /// Lift the shelf under the robot.
    Pickup,
    /// Set the carried shelf down under the robot.
    Putdown,
    /// Hand units of a product from the carried shelf to an order.
    Deliver {
        /// Order being served.
        order: OrderId,
        /// Product handed over.
        product: ProductId,
        /// Units handed over.
        units: u32,
    },
}

impl Action {
    /// Short lowercase name of the action kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Pickup => "pickup",
            Self::Putdown => "putdown",
            Self::Deliver { .. } => "deliver",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { dx, dy } => write!(f, "move ({dx},{dy})"),
            Self::Pickup | Self::Putdown => f.write_str(self.kind()),
            Self::Deliver {
                order,
                product,
                units,
            } => write!(f, "deliver (Order: {order}, Product: {product}, Units: {units})"),
        }
    }
}

/// Error returned when an action string does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("unrecognized action '{text}'")]
    Unrecognized {
        text: String,
    },

    #[error("number out of range in action '{text}'")]
    OutOfRange {
        text: String,
    },
}

/// Compiled action grammar, reused for every atom of a plan.
#[derive(Debug, Clone)]
pub struct ActionGrammar {
    move_re: Regex,
    deliver_re: Regex,
}

impl ActionGrammar {
    /// Compiles the grammar.
    pub fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            move_re: Regex::new(MOVE_PATTERN)?,
            deliver_re: Regex::new(DELIVER_PATTERN)?,
        })
    }

    /// Parses an action string; surrounding whitespace is ignored.
    pub fn parse(&self, text: &str) -> Result<Action, ActionParseError> {
        let text = text.trim();
        let out_of_range = || ActionParseError::OutOfRange {
            text: text.to_string(),
        };

        match text {
            "pickup" => return Ok(Action::Pickup),
            "putdown" => return Ok(Action::Putdown),
            _ => {}
        }

        if let Some(caps) = self.move_re.captures(text) {
            let dx = caps[1].parse().map_err(|_| out_of_range())?;
            let dy = caps[2].parse().map_err(|_| out_of_range())?;
            return Ok(Action::Move { dx, dy });
        }

        if let Some(caps) = self.deliver_re.captures(text) {
            return Ok(Action::Deliver {
                order: OrderId::from(&caps[1]),
                product: ProductId::from(&caps[2]),
                units: caps[3].parse().map_err(|_| out_of_range())?,
            });
        }

        Err(ActionParseError::Unrecognized {
            text: text.to_string(),
        })
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    /// Parses with a freshly compiled grammar; prefer [`ActionGrammar`] in loops.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let grammar = ActionGrammar::compile().map_err(|_| ActionParseError::Unrecognized {
            text: s.to_string(),
        })?;
        grammar.parse(s)
    }
}
