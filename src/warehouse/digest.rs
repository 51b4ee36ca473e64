//! Content digests of warehouse snapshots.
//!
//! The digest covers robots, shelves and orders (the layout never changes
//! within a run). Every string is length-prefixed and every map is walked in
//! identity order, so equal snapshots always hash equal.

use std::fmt;

use blake3::Hasher;

use super::coord::Coord;
use super::state::WarehouseState;

/// BLAKE3 digest of the dynamic part of a [`WarehouseState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateDigest(blake3::Hash);

impl StateDigest {
    pub(crate) fn of(state: &WarehouseState) -> Self {
        let mut h = Hasher::new();

        h.update(b"robots");
        put_len(&mut h, state.robots().len());
        for (id, robot) in state.robots() {
            put_str(&mut h, id.as_str());
            put_coord(&mut h, Some(robot.position));
            put_opt_str(&mut h, robot.carrying.as_ref().map(|s| s.as_str()));
        }

        h.update(b"shelves");
        put_len(&mut h, state.shelves().len());
        for (id, shelf) in state.shelves() {
            put_str(&mut h, id.as_str());
            put_coord(&mut h, shelf.position);
            put_len(&mut h, shelf.quantities.len());
            for (product, qty) in &shelf.quantities {
                put_str(&mut h, product.as_str());
                h.update(&qty.to_le_bytes());
            }
        }

        h.update(b"orders");
        put_len(&mut h, state.orders().len());
        for (id, order) in state.orders() {
            put_str(&mut h, id.as_str());
            put_str(&mut h, order.station.as_str());
            put_len(&mut h, order.requirements.len());
            for (product, qty) in &order.requirements {
                put_str(&mut h, product.as_str());
                h.update(&qty.to_le_bytes());
            }
        }

        Self(h.finalize())
    }

    /// Abbreviated hex form for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        let hex = self.0.to_hex();
        hex.as_str()[..12].to_string()
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.to_hex().as_str())
    }
}

fn put_len(h: &mut Hasher, len: usize) {
    h.update(&(len as u64).to_le_bytes());
}

fn put_str(h: &mut Hasher, s: &str) {
    put_len(h, s.len());
    h.update(s.as_bytes());
}

fn put_opt_str(h: &mut Hasher, s: Option<&str>) {
    match s {
        Some(s) => {
            h.update(&[1]);
            put_str(h, s);
        }
        None => {
            h.update(&[0]);
        }
    }
}

fn put_coord(h: &mut Hasher, coord: Option<Coord>) {
    match coord {
        Some(c) => {
            h.update(&[1]);
            h.update(&c.x.to_le_bytes());
            h.update(&c.y.to_le_bytes());
        }
        None => {
            h.update(&[0]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::{Layout, Robot, Shelf};

    #[test]
    fn equal_states_hash_equal() {
        let a =
            WarehouseState::new(Layout::default()).with_robot("r1", Robot::at(Coord::new(1, 1)));
        let b =
            WarehouseState::new(Layout::default()).with_robot("r1", Robot::at(Coord::new(1, 1)));
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().to_string().len(), 64);
        assert_eq!(a.digest().short().len(), 12);
    }

    #[test]
    fn position_change_changes_digest() {
        let a =
            WarehouseState::new(Layout::default()).with_shelf("s1", Shelf::at(Coord::new(1, 1)));
        let b = WarehouseState::new(Layout::default()).with_shelf("s1", Shelf::default());
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn id_boundaries_are_unambiguous() {
        let a = WarehouseState::new(Layout::default())
            .with_robot("r1", Robot::at(Coord::new(1, 1)))
            .with_robot("r12", Robot::at(Coord::new(1, 1)));
        let b = WarehouseState::new(Layout::default())
            .with_robot("r11", Robot::at(Coord::new(1, 1)))
            .with_robot("r2", Robot::at(Coord::new(1, 1)));
        assert_ne!(a.digest(), b.digest());
    }
}
