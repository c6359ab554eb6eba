//! Boustrophedon ("snake") ordering of board positions.
//!
//! Step 0 is the bottom-left socket. Even rows run left to right, odd rows right to left, and
//! rows are consumed bottom to top. Visibility during a reveal is derived from this order and a
//! progress counter; nothing per-cell is ever stored.

use crate::foundation::core::GridSize;

/// Linear reveal step of `(column, row)`.
///
/// Callers must pass in-range coordinates; that is checked in debug builds only.
pub fn step_index(column: u32, row: u32, grid_size: GridSize) -> u32 {
    snake_step(column, row, grid_size.side())
}

/// Inverse of [`step_index`]. `None` for steps past the end of the board.
pub fn cell_at_step(step: u32, grid_size: GridSize) -> Option<(u32, u32)> {
    snake_cell(step, grid_size.side())
}

pub(crate) fn snake_step(column: u32, row: u32, side: u32) -> u32 {
    debug_assert!(column < side && row < side, "coordinate outside grid");
    let position_in_row = if row % 2 == 0 {
        column
    } else {
        side - 1 - column
    };
    row * side + position_in_row
}

pub(crate) fn snake_cell(step: u32, side: u32) -> Option<(u32, u32)> {
    if side == 0 || step >= side * side {
        return None;
    }
    let row = step / side;
    let offset = step % side;
    let column = if row % 2 == 0 { offset } else { side - 1 - offset };
    Some((column, row))
}

/// A socket is visible once the reveal counter has moved past its step.
pub fn is_visible(column: u32, row: u32, progress: u32, grid_size: GridSize) -> bool {
    step_index(column, row, grid_size) < progress
}

/// The most recently revealed socket while a reveal is still running.
///
/// Always `false` at `progress == 0` and once the board is complete.
pub fn is_head(column: u32, row: u32, progress: u32, grid_size: GridSize) -> bool {
    progress > 0
        && progress < grid_size.cell_count()
        && step_index(column, row, grid_size) == progress - 1
}

/// Iterator over `(column, row)` in reveal order.
#[derive(Clone, Debug)]
pub struct SnakePath {
    grid_size: GridSize,
    next: u32,
}

impl SnakePath {
    /// Path over the full board.
    pub fn new(grid_size: GridSize) -> Self {
        Self { grid_size, next: 0 }
    }
}

impl Iterator for SnakePath {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let out = cell_at_step(self.next, self.grid_size)?;
        self.next += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.grid_size.cell_count().saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for SnakePath {}

#[cfg(test)]
#[path = "../../tests/unit/grid/traversal.rs"]
mod tests;
