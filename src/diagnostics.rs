//! Recoverable diagnostics.
//!
//! Parsing and state transitions never fail on a single bad unit of work.
//! Instead, each skipped fact line, atom or action is described by a
//! [`Diagnostic`] and collected into a [`Diagnostics`] list that is returned
//! next to the result. Recording a diagnostic also emits a `tracing` warning.

use thiserror::Error;
use tracing::warn;

use crate::warehouse::{Coord, OrderId, ProductId, RobotId, ShelfId, StationId};

fn describe_position(pos: &Option<Coord>) -> String {
    match pos {
        Some(c) => c.to_string(),
        None => "an unknown location".to_string(),
    }
}

/// A recoverable problem. The offending fact, atom or action was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    // Fact input.
    #[error("Unmatched init line {line}: {text}")]
    UnmatchedFactLine {
        line: usize,
        text: String,
    },

    #[error("Product quantity defined for non-existent shelf {shelf} (product {product})")]
    OrphanedQuantity {
        shelf: ShelfId,
        product: ProductId,
    },

    #[error("Order lines defined for order without picking station: {order}")]
    OrderWithoutStation {
        order: OrderId,
    },

    // Plan input.
    #[error("Unmatched plan atom: {atom}")]
    UnmatchedAtom {
        atom: String,
    },

    #[error("Could not parse action '{action}' for robot {robot} at time {time}")]
    UnparseableAction {
        time: u32,
        robot: RobotId,
        action: String,
    },

    #[error(
        "{count} action(s) scheduled at time 0 were ignored; \
         time 0 is the initial configuration"
    )]
    IgnoredInitialActions {
        count: usize,
    },

    // State transitions.
    #[error("Action specified for unknown robot {robot}")]
    UnknownRobot {
        robot: RobotId,
    },

    #[error("Robot {robot} tried to pickup while already carrying {carrying}")]
    PickupWhileCarrying {
        robot: RobotId,
        carrying: ShelfId,
    },

    #[error("Robot {robot} tried to pickup at {at}, but no shelf is there")]
    NoShelfToPickup {
        robot: RobotId,
        at: Coord,
    },

    #[error(
        "Robot {robot} tried to pickup shelf {shelf} at {at}, \
         but another robot already lifted it this timestep"
    )]
    ShelfTaken {
        robot: RobotId,
        shelf: ShelfId,
        at: Coord,
    },

    #[error("Robot {robot} tried to putdown while carrying nothing")]
    PutdownWithoutShelf {
        robot: RobotId,
    },

    #[error("Robot {robot} tried to putdown shelf {shelf} on highway {at}")]
    PutdownOnHighway {
        robot: RobotId,
        shelf: ShelfId,
        at: Coord,
    },

    #[error(
        "Robot {robot} tried to putdown shelf {shelf} at {at}, \
         but shelf {occupant} is already there"
    )]
    PutdownOccupied {
        robot: RobotId,
        shelf: ShelfId,
        at: Coord,
        occupant: ShelfId,
    },

    #[error("Robot {robot} tried to deliver while carrying nothing")]
    DeliverWithoutShelf {
        robot: RobotId,
    },

    #[error("Robot {robot} is carrying unknown shelf {shelf}")]
    UnknownCarriedShelf {
        robot: RobotId,
        shelf: ShelfId,
    },

    #[error("Robot {robot} tried to deliver for unknown order {order}")]
    UnknownOrder {
        robot: RobotId,
        order: OrderId,
    },

    #[error("Robot {robot} tried to deliver unknown product {product} from shelf {shelf}")]
    ProductNotOnShelf {
        robot: RobotId,
        shelf: ShelfId,
        product: ProductId,
    },

    #[error(
        "Robot {robot} tried to deliver for order {order} at {at}, but station {station} is at {}",
        describe_position(.station_at)
    )]
    WrongStation {
        robot: RobotId,
        order: OrderId,
        at: Coord,
        station: StationId,
        station_at: Option<Coord>,
    },

    #[error(
        "Robot {robot} tried to deliver {requested} of {product} from shelf {shelf}, \
         but it only has {available}"
    )]
    InsufficientStock {
        robot: RobotId,
        shelf: ShelfId,
        product: ProductId,
        requested: u32,
        available: u32,
    },

    #[error(
        "Order {order} has no requirement entry for product {product}; \
         only the shelf was debited"
    )]
    RequirementMissing {
        order: OrderId,
        product: ProductId,
    },
}

impl Diagnostic {
    /// Stable short code naming the kind of diagnostic.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnmatchedFactLine { .. } => "unmatched_fact_line",
            Self::OrphanedQuantity { .. } => "orphaned_quantity",
            Self::OrderWithoutStation { .. } => "order_without_station",
            Self::UnmatchedAtom { .. } => "unmatched_atom",
            Self::UnparseableAction { .. } => "unparseable_action",
            Self::IgnoredInitialActions { .. } => "ignored_initial_actions",
            Self::UnknownRobot { .. } => "unknown_robot",
            Self::PickupWhileCarrying { .. } => "pickup_while_carrying",
            Self::NoShelfToPickup { .. } => "no_shelf_to_pickup",
            Self::ShelfTaken { .. } => "shelf_taken",
            Self::PutdownWithoutShelf { .. } => "putdown_without_shelf",
            Self::PutdownOnHighway { .. } => "putdown_on_highway",
            Self::PutdownOccupied { .. } => "putdown_occupied",
            Self::DeliverWithoutShelf { .. } => "deliver_without_shelf",
            Self::UnknownCarriedShelf { .. } => "unknown_carried_shelf",
            Self::UnknownOrder { .. } => "unknown_order",
            Self::ProductNotOnShelf { .. } => "product_not_on_shelf",
            Self::WrongStation { .. } => "wrong_station",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::RequirementMissing { .. } => "requirement_missing",
        }
    }

    /// Returns true if this diagnostic rejected a plan action.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::UnmatchedFactLine { .. }
                | Self::OrphanedQuantity { .. }
                | Self::OrderWithoutStation { .. }
                | Self::UnmatchedAtom { .. }
                | Self::UnparseableAction { .. }
                | Self::IgnoredInitialActions { .. }
                | Self::RequirementMissing { .. }
        )
    }
}

/// Ordered collection of diagnostics produced by one parse or one transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a diagnostic and logs it.
    pub fn record(&mut self, diagnostic: Diagnostic) {
        warn!(code = diagnostic.code(), "{diagnostic}");
        self.entries.push(diagnostic);
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates diagnostics in recording order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Counts diagnostics with the given [`Diagnostic::code`].
    #[must_use]
    pub fn count_of(&self, code: &str) -> usize {
        self.entries.iter().filter(|d| d.code() == code).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_station_message_handles_missing_station() {
        let d = Diagnostic::WrongStation {
            robot: RobotId::from("1"),
            order: OrderId::from("o1"),
            at: Coord::new(1, 1),
            station: StationId::from("p9"),
            station_at: None,
        };
        let msg = d.to_string();
        assert!(msg.contains("p9"));
        assert!(msg.contains("unknown location"));
        assert!(d.is_rejection());
    }

    #[test]
    fn record_and_count() {
        let mut diags = Diagnostics::new();
        diags.record(Diagnostic::UnknownRobot {
            robot: RobotId::from("ghost"),
        });
        diags.record(Diagnostic::UnmatchedAtom {
            atom: "foo".to_string(),
        });
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.count_of("unknown_robot"), 1);
        assert_eq!(diags.iter().filter(|d| d.is_rejection()).count(), 1);
    }

    #[test]
    fn owned_iteration_preserves_order() {
        let mut diags = Diagnostics::new();
        diags.record(Diagnostic::OrderWithoutStation {
            order: OrderId::from("o1"),
        });
        diags.record(Diagnostic::PutdownWithoutShelf {
            robot: RobotId::from("1"),
        });
        let codes: Vec<&str> = diags.into_iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec!["order_without_station", "putdown_without_shelf"]);
    }
}
