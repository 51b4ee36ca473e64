//! Warehouse snapshot types.
//!
//! A [`WarehouseState`] is an immutable value. The static part of the
//! warehouse (nodes, highways, stations, product universe) lives in a shared
//! [`Layout`]; robots, shelves and orders are owned per snapshot, so producing
//! the next timestep copies the dynamic maps and never touches a snapshot that
//! someone else may still be looking at.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::digest::StateDigest;
use super::ids::{OrderId, ProductId, RobotId, ShelfId, StationId};

/// Static terrain of the warehouse. Never changes during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Traversable cells.
    pub nodes: BTreeSet<Coord>,
    /// Cells where shelves may not be set down.
    pub highways: BTreeSet<Coord>,
    /// Picking station locations.
    pub stations: BTreeMap<StationId, Coord>,
    /// Every product mentioned by any shelf quantity or order line.
    pub products: BTreeSet<ProductId>,
}

impl Layout {
    /// Returns true if shelves may not be set down at `coord`.
    #[must_use]
    pub fn is_highway(&self, coord: Coord) -> bool {
        self.highways.contains(&coord)
    }

    /// Looks up the location of a picking station.
    #[must_use]
    pub fn station(&self, id: &StationId) -> Option<Coord> {
        self.stations.get(id).copied()
    }
}

/// A robot and the shelf it carries, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    /// Current cell.
    pub position: Coord,
    /// Shelf being carried.
    pub carrying: Option<ShelfId>,
}

impl Robot {
    /// Creates an empty-handed robot at `position`.
    #[must_use]
    pub const fn at(position: Coord) -> Self {
        Self {
            position,
            carrying: None,
        }
    }
}

/// A shelf and its stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    /// Where the shelf stands; `None` while a robot carries it.
    pub position: Option<Coord>,
    /// Units per product. Holds an entry for every product after normalization.
    pub quantities: BTreeMap<ProductId, u32>,
}

impl Shelf {
    /// Creates an empty shelf standing at `position`.
    #[must_use]
    pub fn at(position: Coord) -> Self {
        Self {
            position: Some(position),
            quantities: BTreeMap::new(),
        }
    }

    /// Products with a non-zero quantity, in product order.
    pub fn stock(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.quantities
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(product, qty)| (product, *qty))
    }
}

/// A customer order bound to a picking station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Station where deliveries for this order must happen.
    pub station: StationId,
    /// Units still required per product. Never negative.
    pub requirements: BTreeMap<ProductId, u32>,
}

impl Order {
    /// Creates an order with no requirements yet.
    #[must_use]
    pub fn new(station: StationId) -> Self {
        Self {
            station,
            requirements: BTreeMap::new(),
        }
    }

    /// Products still required, in product order.
    pub fn open_requirements(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        self.requirements
            .iter()
            .filter(|(_, qty)| **qty > 0)
            .map(|(product, qty)| (product, *qty))
    }

    /// Returns true once no product is required any more.
    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.requirements.values().all(|qty| *qty == 0)
    }
}

/// Static background of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain<'a> {
    /// Not part of the warehouse.
    Void,
    /// An ordinary node.
    Node,
    /// A highway node.
    Highway,
    /// A picking station.
    Station(&'a StationId),
}

/// Movable occupant of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant<'a> {
    /// A robot, possibly carrying a shelf.
    Robot {
        /// Robot identity.
        id: &'a RobotId,
        /// Carried shelf, if any.
        carrying: Option<&'a ShelfId>,
    },
    /// A shelf standing on its own.
    Shelf(&'a ShelfId),
}

/// Immutable snapshot of the warehouse at one timestep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseState {
    layout: Arc<Layout>,
    pub(crate) robots: BTreeMap<RobotId, Robot>,
    pub(crate) shelves: BTreeMap<ShelfId, Shelf>,
    pub(crate) orders: BTreeMap<OrderId, Order>,
}

impl WarehouseState {
    /// Creates a snapshot with the given layout and no movable objects.
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout: Arc::new(layout),
            robots: BTreeMap::new(),
            shelves: BTreeMap::new(),
            orders: BTreeMap::new(),
        }
    }

    /// Adds or replaces a robot (builder pattern).
    #[must_use]
    pub fn with_robot(mut self, id: impl Into<RobotId>, robot: Robot) -> Self {
        self.robots.insert(id.into(), robot);
        self
    }

    /// Adds or replaces a shelf (builder pattern).
    #[must_use]
    pub fn with_shelf(mut self, id: impl Into<ShelfId>, shelf: Shelf) -> Self {
        self.shelves.insert(id.into(), shelf);
        self
    }

    /// Adds or replaces an order (builder pattern).
    #[must_use]
    pub fn with_order(mut self, id: impl Into<OrderId>, order: Order) -> Self {
        self.orders.insert(id.into(), order);
        self
    }

    /// Static terrain shared by every snapshot of the run.
    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// All robots, by identity.
    #[must_use]
    pub fn robots(&self) -> &BTreeMap<RobotId, Robot> {
        &self.robots
    }

    /// All shelves, by identity.
    #[must_use]
    pub fn shelves(&self) -> &BTreeMap<ShelfId, Shelf> {
        &self.shelves
    }

    /// All orders, by identity.
    #[must_use]
    pub fn orders(&self) -> &BTreeMap<OrderId, Order> {
        &self.orders
    }

    /// Looks up a robot.
    #[must_use]
    pub fn robot(&self, id: &RobotId) -> Option<&Robot> {
        self.robots.get(id)
    }

    /// Looks up a shelf.
    #[must_use]
    pub fn shelf(&self, id: &ShelfId) -> Option<&Shelf> {
        self.shelves.get(id)
    }

    /// Looks up an order.
    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// The standing shelf at `coord`. If several stand there, the smallest identity wins.
    #[must_use]
    pub fn shelf_at(&self, coord: Coord) -> Option<&ShelfId> {
        self.shelves
            .iter()
            .find(|(_, shelf)| shelf.position == Some(coord))
            .map(|(id, _)| id)
    }

    /// Static background of `coord`. Stations take precedence over highways, highways over nodes.
    #[must_use]
    pub fn terrain_at(&self, coord: Coord) -> Terrain<'_> {
        if let Some((id, _)) = self.layout.stations.iter().find(|(_, pos)| **pos == coord) {
            return Terrain::Station(id);
        }
        if self.layout.highways.contains(&coord) {
            Terrain::Highway
        } else if self.layout.nodes.contains(&coord) {
            Terrain::Node
        } else {
            Terrain::Void
        }
    }

    /// Movable occupant of `coord`. Robots hide the shelves beneath them; ties go to the
    /// smallest identity.
    #[must_use]
    pub fn occupant_at(&self, coord: Coord) -> Option<Occupant<'_>> {
        if let Some((id, robot)) = self.robots.iter().find(|(_, r)| r.position == coord) {
            return Some(Occupant::Robot {
                id,
                carrying: robot.carrying.as_ref(),
            });
        }
        self.shelf_at(coord).map(Occupant::Shelf)
    }

    /// Returns true when every order is fulfilled (vacuously true without orders).
    #[must_use]
    pub fn all_orders_fulfilled(&self) -> bool {
        self.orders.values().all(Order::is_fulfilled)
    }

    /// Content digest of the dynamic part of the snapshot.
    #[must_use]
    pub fn digest(&self) -> StateDigest {
        StateDigest::of(self)
    }
}
