//! Line grammar for `init/2` warehouse facts.
//!
//! A fact line looks like `init(object(KIND,ID),value(ATTR,ARGS)).` where
//! `ARGS` is either a bare identifier or `pair(A,B)`. The outer shape is
//! matched first, then the `(KIND, ATTR)` combination decides how the
//! arguments are read. A `%` comment may follow the closing period.

use regex::Regex;

use crate::error::{ReplayError, ReplayResult};
use crate::warehouse::{Coord, OrderId, ProductId, RobotId, ShelfId, StationId};

const FACT_PATTERN: &str = concat!(
    r"^init\(\s*object\(\s*(\w+)\s*,\s*(\w+)\s*\)\s*,",
    r"\s*value\(\s*(\w+)\s*,\s*(.+?)\s*\)\s*\)\s*\.",
    r"\s*(?:%.*)?$",
);
const PAIR_PATTERN: &str = r"^pair\(\s*(\w+)\s*,\s*(\w+)\s*\)$";
const IDENT_PATTERN: &str = r"^\w+$";

/// One recognized fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fact {
    /// `object(node, _)` at a cell.
    Node(Coord),
    /// `object(highway, _)` at a cell.
    Highway(Coord),
    /// `object(pickingStation, id)` at a cell.
    Station {
        /// Station identity.
        id: StationId,
        /// Location.
        at: Coord,
    },
    /// `object(robot, id)` at a cell.
    Robot {
        /// Robot identity.
        id: RobotId,
        /// Location.
        at: Coord,
    },
    /// `object(shelf, id)` at a cell.
    Shelf {
        /// Shelf identity.
        id: ShelfId,
        /// Location.
        at: Coord,
    },
    /// `object(product, id)` on a shelf with a quantity.
    Quantity {
        /// Product identity.
        product: ProductId,
        /// Shelf holding the product.
        shelf: ShelfId,
        /// Units on the shelf.
        units: u32,
    },
    /// `object(order, id)` served at a picking station.
    OrderStation {
        /// Order identity.
        order: OrderId,
        /// Station identity.
        station: StationId,
    },
    /// `object(order, id)` requiring units of a product.
    OrderLine {
        /// Order identity.
        order: OrderId,
        /// Required product.
        product: ProductId,
        /// Required units.
        units: u32,
    },
}

/// Value arguments of a fact.
enum Args<'a> {
    Ident(&'a str),
    Pair(&'a str, &'a str),
}

/// Compiled fact grammar.
#[derive(Debug, Clone)]
pub struct FactGrammar {
    fact: Regex,
    pair: Regex,
    ident: Regex,
}

fn compile(pattern: &str) -> ReplayResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| ReplayError::internal(format!("invalid fact grammar '{pattern}': {e}")))
}

impl FactGrammar {
    /// Compiles the grammar.
    pub fn compile() -> ReplayResult<Self> {
        Ok(Self {
            fact: compile(FACT_PATTERN)?,
            pair: compile(PAIR_PATTERN)?,
            ident: compile(IDENT_PATTERN)?,
        })
    }

    /// Parses one trimmed, non-comment line. Returns `None` if the line is not a known fact.
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<Fact> {
        let caps = self.fact.captures(line)?;
        let kind = caps.get(1)?.as_str();
        let id = caps.get(2)?.as_str();
        let attr = caps.get(3)?.as_str();
        let args = self.args(caps.get(4)?.as_str())?;

        match (kind, attr, args) {
            ("node", "at", Args::Pair(x, y)) => Some(Fact::Node(coord(x, y)?)),
            ("highway", "at", Args::Pair(x, y)) => Some(Fact::Highway(coord(x, y)?)),
            ("pickingStation", "at", Args::Pair(x, y)) => Some(Fact::Station {
                id: id.into(),
                at: coord(x, y)?,
            }),
            ("robot", "at", Args::Pair(x, y)) => Some(Fact::Robot {
                id: id.into(),
                at: coord(x, y)?,
            }),
            ("shelf", "at", Args::Pair(x, y)) => Some(Fact::Shelf {
                id: id.into(),
                at: coord(x, y)?,
            }),
            ("product", "on", Args::Pair(shelf, units)) => Some(Fact::Quantity {
                product: id.into(),
                shelf: shelf.into(),
                units: units.parse().ok()?,
            }),
            ("order", "pickingStation", Args::Ident(station)) => Some(Fact::OrderStation {
                order: id.into(),
                station: station.into(),
            }),
            ("order", "line", Args::Pair(product, units)) => Some(Fact::OrderLine {
                order: id.into(),
                product: product.into(),
                units: units.parse().ok()?,
            }),
            _ => None,
        }
    }

    fn args<'a>(&self, raw: &'a str) -> Option<Args<'a>> {
        if let Some(caps) = self.pair.captures(raw) {
            return Some(Args::Pair(caps.get(1)?.as_str(), caps.get(2)?.as_str()));
        }
        self.ident.is_match(raw).then_some(Args::Ident(raw))
    }
}

fn coord(x: &str, y: &str) -> Option<Coord> {
    Some(Coord::new(x.parse().ok()?, y.parse().ok()?))
}
