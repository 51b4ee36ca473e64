//! Text rendering of replay frames.
//!
//! Every frame is drawn as a box grid with a fixed cell width, followed by
//! the actions of the timestep and the remaining shelf stock and order
//! requirements. The cell width is meant to be computed once over the whole
//! run (see [`Renderer::fit`]) so the grid does not reflow between frames.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::replay::Frame;
use crate::warehouse::{Coord, GridBounds, Occupant, Terrain, WarehouseState};

/// ANSI sequence that clears the terminal.
pub const CLEAR_SCREEN: &str = "\x1b[2J";
/// ANSI sequence that moves the cursor to the top-left corner.
pub const CURSOR_HOME: &str = "\x1b[H";

/// Glyphs used to draw grid cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSymbols {
    /// Ordinary node.
    pub empty: String,
    /// Highway node.
    pub highway: String,
    /// Prefix of a picking station label.
    pub station: String,
    /// Prefix of a robot label.
    pub robot: String,
    /// Prefix of a shelf label.
    pub shelf: String,
    /// Opens the carried-shelf label after a robot.
    pub carried_prefix: String,
    /// Closes the carried-shelf label.
    pub carried_suffix: String,
}

impl Default for GridSymbols {
    fn default() -> Self {
        Self {
            empty: ".".to_string(),
            highway: "#".to_string(),
            station: "P".to_string(),
            robot: "R".to_string(),
            shelf: "S".to_string(),
            carried_prefix: "[".to_string(),
            carried_suffix: "]".to_string(),
        }
    }
}

impl GridSymbols {
    /// Rejects empty symbols and symbols containing whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let symbols = [
            ("empty", &self.empty),
            ("highway", &self.highway),
            ("station", &self.station),
            ("robot", &self.robot),
            ("shelf", &self.shelf),
            ("carried_prefix", &self.carried_prefix),
            ("carried_suffix", &self.carried_suffix),
        ];
        for (name, value) in symbols {
            if value.is_empty() {
                return Err(ValidationError::InvalidSymbol {
                    name: name.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            if value.chars().any(char::is_whitespace) {
                return Err(ValidationError::InvalidSymbol {
                    name: name.to_string(),
                    reason: "must not contain whitespace".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Draws frames for one grid.
#[derive(Debug, Clone)]
pub struct Renderer {
    symbols: GridSymbols,
    bounds: GridBounds,
    cell_width: usize,
}

impl Renderer {
    /// Creates a renderer with the narrowest possible cells.
    #[must_use]
    pub const fn new(symbols: GridSymbols, bounds: GridBounds) -> Self {
        Self {
            symbols,
            bounds,
            cell_width: 1,
        }
    }

    /// Grid extent being drawn.
    #[must_use]
    pub const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Current cell width in characters.
    #[must_use]
    pub const fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Widens cells so that every cell of `state` fits.
    pub fn fit(&mut self, state: &WarehouseState) {
        self.cell_width = self.cell_width.max(self.max_cell_width(state));
    }

    /// Widest cell content of `state`, at least 1.
    #[must_use]
    pub fn max_cell_width(&self, state: &WarehouseState) -> usize {
        self.bounds
            .cells()
            .map(|c| self.cell_content(state, c).chars().count())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Text shown in the cell at `coord`.
    #[must_use]
    pub fn cell_content(&self, state: &WarehouseState, coord: Coord) -> String {
        let s = &self.symbols;
        match state.occupant_at(coord) {
            Some(Occupant::Robot { id, carrying: None }) => format!("{}{id}", s.robot),
            Some(Occupant::Robot {
                id,
                carrying: Some(shelf),
            }) => format!(
                "{}{id}{}{}{shelf}{}",
                s.robot, s.carried_prefix, s.shelf, s.carried_suffix
            ),
            Some(Occupant::Shelf(id)) => format!("{}{id}", s.shelf),
            None => match state.terrain_at(coord) {
                Terrain::Station(id) => format!("{}{id}", s.station),
                Terrain::Highway => s.highway.clone(),
                Terrain::Node => s.empty.clone(),
                Terrain::Void => String::new(),
            },
        }
    }

    /// Renders a full frame: header, grid, actions and summaries.
    #[must_use]
    pub fn render_frame(&self, frame: &Frame<'_>) -> String {
        FrameView {
            renderer: self,
            frame,
        }
        .to_string()
    }

    /// Renders the closing report after the last frame.
    #[must_use]
    pub fn final_summary(&self, state: &WarehouseState, final_time: u32) -> String {
        SummaryView {
            renderer: self,
            state,
            final_time,
        }
        .to_string()
    }

    fn write_grid(&self, f: &mut fmt::Formatter<'_>, state: &WarehouseState) -> fmt::Result {
        let (Ok(cols), Ok(rows)) = (
            usize::try_from(self.bounds.max_x),
            usize::try_from(self.bounds.max_y),
        ) else {
            return Ok(());
        };
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        let segment = "─".repeat(self.cell_width);
        let border = |left: &str, joint: &str, right: &str| {
            format!("{left}{}{right}", vec![segment.as_str(); cols].join(joint))
        };

        writeln!(f, "{}", border("┌", "┬", "┐"))?;
        for y in 1..=self.bounds.max_y {
            let cells: Vec<String> = (1..=self.bounds.max_x)
                .map(|x| {
                    let content = self.cell_content(state, Coord::new(x, y));
                    format!("{content:<width$}", width = self.cell_width)
                })
                .collect();
            writeln!(f, "│{}│", cells.join("│"))?;
            if y < self.bounds.max_y {
                writeln!(f, "{}", border("├", "┼", "┤"))?;
            } else {
                writeln!(f, "{}", border("└", "┴", "┘"))?;
            }
        }
        Ok(())
    }

    fn write_shelves(f: &mut fmt::Formatter<'_>, state: &WarehouseState) -> fmt::Result {
        writeln!(f, "Shelf Quantities:")?;
        if state.shelves().is_empty() {
            return writeln!(f, "  No shelves defined.");
        }
        let mut any = false;
        for (id, shelf) in state.shelves() {
            let stock: Vec<String> = shelf
                .stock()
                .map(|(product, qty)| format!("Product {product}: Qty {qty}"))
                .collect();
            if !stock.is_empty() {
                writeln!(f, "  Shelf {id}: {}", stock.join(", "))?;
                any = true;
            }
        }
        if !any {
            writeln!(f, "  All shelves appear empty.")?;
        }
        Ok(())
    }

    fn write_orders(&self, f: &mut fmt::Formatter<'_>, state: &WarehouseState) -> fmt::Result {
        writeln!(f, "Order Requirements:")?;
        if state.orders().is_empty() {
            return writeln!(f, "  No orders defined in the input.");
        }
        let mut any = false;
        for (id, order) in state.orders() {
            let open: Vec<String> = order
                .open_requirements()
                .map(|(product, qty)| format!("Product {product}: Qty {qty}"))
                .collect();
            if !open.is_empty() {
                writeln!(
                    f,
                    "  Order {id} (at {}{}) Req: {}",
                    self.symbols.station,
                    order.station,
                    open.join(", ")
                )?;
                any = true;
            }
        }
        if !any {
            writeln!(f, "  All defined orders fulfilled!")?;
        }
        Ok(())
    }
}

struct FrameView<'a, 'p> {
    renderer: &'a Renderer,
    frame: &'a Frame<'p>,
}

impl fmt::Display for FrameView<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame;
        writeln!(f, "--- Time: {} ---", frame.time)?;
        self.renderer.write_grid(f, &frame.state)?;

        if !frame.actions.is_empty() {
            writeln!(f, "Actions Occurring:")?;
            for planned in frame.actions {
                writeln!(f, "  Robot {}: {}", planned.robot, planned.action)?;
            }
        } else if frame.time > 0 {
            writeln!(f, "No actions occurred.")?;
        }

        writeln!(f)?;
        Renderer::write_shelves(f, &frame.state)?;
        writeln!(f)?;
        self.renderer.write_orders(f, &frame.state)
    }
}

struct SummaryView<'a> {
    renderer: &'a Renderer,
    state: &'a WarehouseState,
    final_time: u32,
}

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n--- Simulation Complete (Reached Time {}) ---", self.final_time)?;
        writeln!(f, "\nFinal Order Requirements:")?;
        if self.state.orders().is_empty() {
            return writeln!(f, "  No orders defined.");
        }
        for (id, order) in self.state.orders() {
            let open: Vec<String> = order
                .open_requirements()
                .map(|(product, qty)| format!("P{product}:{qty}"))
                .collect();
            if !open.is_empty() {
                writeln!(
                    f,
                    "  Order {id} (at {}{}) Req: {} --> NOT FULFILLED",
                    self.renderer.symbols.station,
                    order.station,
                    open.join(", ")
                )?;
            }
        }
        if self.state.all_orders_fulfilled() {
            writeln!(f, "  All defined orders fulfilled!")?;
        }
        Ok(())
    }
}
