//! Grid coordinates and bounds.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// A grid cell `(x, y)`. The rendered grid is 1-based.
///
/// Coordinates are signed: moves are applied without bounds checks, so a robot
/// may end up outside the declared grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this coordinate displaced by `(dx, dy)`, saturating at the `i32` range.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl Add<(i32, i32)> for Coord {
    type Output = Self;

    fn add(self, (dx, dy): (i32, i32)) -> Self {
        self.offset(dx, dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Extent of the rendered grid: the largest `x` and `y` seen among node facts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    /// Largest column index.
    pub max_x: i32,
    /// Largest row index.
    pub max_y: i32,
}

impl GridBounds {
    /// Grows the bounds so that `coord` is included.
    pub fn include(&mut self, coord: Coord) {
        self.max_x = self.max_x.max(coord.x);
        self.max_y = self.max_y.max(coord.y);
    }

    /// Iterates the rendered cells row by row (`y` outer, `x` inner).
    pub fn cells(self) -> impl Iterator<Item = Coord> {
        let max_x = self.max_x;
        (1..=self.max_y).flat_map(move |y| (1..=max_x).map(move |x| Coord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displacement_adds_componentwise() {
        assert_eq!(Coord::new(1, 1) + (1, -1), Coord::new(2, 0));
        assert_eq!(Coord::new(i32::MAX, 0).offset(1, 0).x, i32::MAX);
    }

    #[test]
    fn bounds_grow() {
        let mut bounds = GridBounds::default();
        bounds.include(Coord::new(3, 1));
        bounds.include(Coord::new(2, 4));
        assert_eq!(bounds, GridBounds { max_x: 3, max_y: 4 });
    }

    #[test]
    fn cells_are_row_major() {
        let bounds = GridBounds { max_x: 2, max_y: 2 };
        let cells: Vec<Coord> = bounds.cells().collect();
        assert_eq!(
            cells,
            vec![Coord::new(1, 1), Coord::new(2, 1), Coord::new(1, 2), Coord::new(2, 2)]
        );
    }
}
