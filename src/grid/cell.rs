use std::collections::HashMap;

use crate::foundation::core::{GridSize, Rgb8};
use crate::foundation::error::{PixelflowError, PixelflowResult};

/// One filled board position.
///
/// `row == 0` is the bottom of the board. `id` only gives list renderers a stable identity; it
/// carries no meaning.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    /// Column, `0..side`, left to right.
    #[serde(rename = "x")]
    pub column: u32,
    /// Row, `0..side`, bottom to top.
    #[serde(rename = "y")]
    pub row: u32,
    /// Bead color.
    pub color: Rgb8,
    /// Identity for list rendering.
    pub id: String,
}

impl Cell {
    /// Build a cell with the canonical `px-<column>-<row>` id.
    pub fn new(column: u32, row: u32, color: Rgb8) -> Self {
        Self {
            column,
            row,
            color,
            id: format!("px-{column}-{row}"),
        }
    }
}

/// Sparse set of cells on one board, keyed by `(column, row)`.
///
/// Absent coordinates are empty sockets. Insertion order is preserved for serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSet {
    grid_size: GridSize,
    cells: Vec<Cell>,
    by_coord: HashMap<(u32, u32), usize>,
}

impl CellSet {
    /// Empty board.
    pub fn new(grid_size: GridSize) -> Self {
        Self {
            grid_size,
            cells: Vec::new(),
            by_coord: HashMap::new(),
        }
    }

    /// Build from an existing list, validating bounds and coordinate uniqueness.
    pub fn from_cells(grid_size: GridSize, cells: Vec<Cell>) -> PixelflowResult<Self> {
        let mut set = Self::new(grid_size);
        set.cells.reserve(cells.len());
        for cell in cells {
            set.insert(cell)?;
        }
        Ok(set)
    }

    /// Board resolution.
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// Add a cell. Out-of-range or already-occupied coordinates are rejected.
    pub fn insert(&mut self, cell: Cell) -> PixelflowResult<()> {
        let side = self.grid_size.side();
        if cell.column >= side || cell.row >= side {
            return Err(PixelflowError::validation(format!(
                "cell ({}, {}) is outside a {side}x{side} grid",
                cell.column, cell.row
            )));
        }
        let key = (cell.column, cell.row);
        if self.by_coord.contains_key(&key) {
            return Err(PixelflowError::validation(format!(
                "duplicate cell at ({}, {})",
                cell.column, cell.row
            )));
        }
        self.by_coord.insert(key, self.cells.len());
        self.cells.push(cell);
        Ok(())
    }

    /// Color at a coordinate, or `None` for an empty socket.
    pub fn color_at(&self, column: u32, row: u32) -> Option<Rgb8> {
        self.by_coord
            .get(&(column, row))
            .map(|&i| self.cells[i].color)
    }

    /// Cell at a coordinate.
    pub fn get(&self, column: u32, row: u32) -> Option<&Cell> {
        self.by_coord.get(&(column, row)).map(|&i| &self.cells[i])
    }

    /// Number of filled positions.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when every socket is empty.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in insertion order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate cells in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Consume into the plain list.
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/cell.rs"]
mod tests;
