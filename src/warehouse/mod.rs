//! Warehouse data model: identities, coordinates and immutable snapshots.

pub mod coord;
pub mod digest;
pub mod ids;
pub mod state;

pub use coord::{Coord, GridBounds};
pub use digest::StateDigest;
pub use ids::{OrderId, ProductId, RobotId, ShelfId, StationId};
pub use state::{Layout, Occupant, Order, Robot, Shelf, Terrain, WarehouseState};
