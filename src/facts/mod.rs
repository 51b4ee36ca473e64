//! Fact store: builds the timestep-0 warehouse from `init/2` facts.
//!
//! Facts are order-independent. Shelf quantities and order lines are held
//! aside until every line has been read, then linked to their shelf/order,
//! and finally every shelf and order is padded with a zero entry for each
//! product in the universe so later lookups never miss.

pub mod grammar;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{InputError, ReplayResult};
use crate::warehouse::{
    GridBounds, Layout, Order, OrderId, ProductId, Robot, RobotId, Shelf, ShelfId, StationId,
    WarehouseState,
};

pub use grammar::{Fact, FactGrammar};

/// Marker that starts a comment line.
pub const COMMENT_MARKER: char = '%';

/// Result of reading the fact input.
#[derive(Debug, Clone)]
pub struct InitialFacts {
    /// Warehouse at timestep 0.
    pub state: WarehouseState,
    /// Grid extent derived from node facts.
    pub bounds: GridBounds,
    /// Skipped lines and dropped facts.
    pub diagnostics: Diagnostics,
}

/// Reads and parses a fact file. A missing or unreadable file is fatal.
pub fn load_facts(path: impl AsRef<Path>) -> ReplayResult<InitialFacts> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| InputError::from_io(path, e))?;
    info!(path = %path.display(), bytes = text.len(), "loaded fact file");
    parse_facts(&text)
}

/// Parses fact text. Individual bad lines become diagnostics.
pub fn parse_facts(text: &str) -> ReplayResult<InitialFacts> {
    let grammar = FactGrammar::compile()?;
    let mut builder = FactSetBuilder::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        match grammar.parse_line(line) {
            Some(fact) => builder.add(fact),
            None => builder.diagnostics.record(Diagnostic::UnmatchedFactLine {
                line: idx + 1,
                text: line.to_string(),
            }),
        }
    }

    let facts = builder.finish();
    info!(
        robots = facts.state.robots().len(),
        shelves = facts.state.shelves().len(),
        orders = facts.state.orders().len(),
        products = facts.state.layout().products.len(),
        max_x = facts.bounds.max_x,
        max_y = facts.bounds.max_y,
        warnings = facts.diagnostics.len(),
        "parsed initial facts"
    );
    Ok(facts)
}

/// Accumulates facts in any order and resolves them in [`finish`](Self::finish).
#[derive(Debug, Default)]
struct FactSetBuilder {
    layout: Layout,
    bounds: GridBounds,
    robots: BTreeMap<RobotId, Robot>,
    shelves: BTreeMap<ShelfId, Shelf>,
    quantities: BTreeMap<ShelfId, BTreeMap<ProductId, u32>>,
    order_stations: BTreeMap<OrderId, StationId>,
    order_lines: BTreeMap<OrderId, BTreeMap<ProductId, u32>>,
    diagnostics: Diagnostics,
}

impl FactSetBuilder {
    fn add(&mut self, fact: Fact) {
        match fact {
            Fact::Node(at) => {
                self.layout.nodes.insert(at);
                self.bounds.include(at);
            }
            Fact::Highway(at) => {
                self.layout.highways.insert(at);
            }
            Fact::Station { id, at } => {
                self.layout.stations.insert(id, at);
            }
            Fact::Robot { id, at } => {
                self.robots.insert(id, Robot::at(at));
            }
            Fact::Shelf { id, at } => {
                self.shelves.entry(id).or_default().position = Some(at);
            }
            Fact::Quantity {
                product,
                shelf,
                units,
            } => {
                self.layout.products.insert(product.clone());
                self.quantities.entry(shelf).or_default().insert(product, units);
            }
            Fact::OrderStation { order, station } => {
                self.order_stations.insert(order, station);
            }
            Fact::OrderLine {
                order,
                product,
                units,
            } => {
                self.layout.products.insert(product.clone());
                self.order_lines.entry(order).or_default().insert(product, units);
            }
        }
    }

    fn finish(mut self) -> InitialFacts {
        for (shelf_id, quantities) in std::mem::take(&mut self.quantities) {
            match self.shelves.get_mut(&shelf_id) {
                Some(shelf) => shelf.quantities = quantities,
                None => {
                    for product in quantities.into_keys() {
                        self.diagnostics.record(Diagnostic::OrphanedQuantity {
                            shelf: shelf_id.clone(),
                            product,
                        });
                    }
                }
            }
        }

        let mut orders: BTreeMap<OrderId, Order> = self
            .order_stations
            .into_iter()
            .map(|(id, station)| (id, Order::new(station)))
            .collect();
        for (order_id, lines) in self.order_lines {
            match orders.get_mut(&order_id) {
                Some(order) => order.requirements = lines,
                None => self
                    .diagnostics
                    .record(Diagnostic::OrderWithoutStation { order: order_id }),
            }
        }

        for shelf in self.shelves.values_mut() {
            for product in &self.layout.products {
                shelf.quantities.entry(product.clone()).or_insert(0);
            }
        }
        for order in orders.values_mut() {
            for product in &self.layout.products {
                order.requirements.entry(product.clone()).or_insert(0);
            }
        }
        debug!(products = self.layout.products.len(), "normalized shelf and order products");

        let mut state = WarehouseState::new(self.layout);
        state.robots = self.robots;
        state.shelves = self.shelves;
        state.orders = orders;

        InitialFacts {
            state,
            bounds: self.bounds,
            diagnostics: self.diagnostics,
        }
    }
}
