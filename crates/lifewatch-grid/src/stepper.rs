//! Generation stepper: wrapping neighbor counts and the B3/S23 rule.
//!
//! The board is a torus. The neighbors of `(row, col)` are the eight cells at
//! `((row + dr + rows) % rows, (col + dc + cols) % cols)` for
//! `dr, dc` in `{-1, 0, 1}` excluding `(0, 0)`. On boards narrower than three
//! cells the same wrapped cell can be counted more than once, exactly as the
//! formula says.
//!
//! [`step`] reads one grid and writes another. Taking `&Grid` and `&mut Grid`
//! means the two buffers can never alias, so every neighbor read observes the
//! previous generation.

use crate::error::GridError;
use crate::grid::Grid;

/// Index one step before `i` on a ring of length `len`.
const fn wrap_prev(i: usize, len: usize) -> usize {
    match i.checked_sub(1) {
        Some(prev) => prev,
        None => len.saturating_sub(1),
    }
}

/// Index one step after `i` on a ring of length `len`.
const fn wrap_next(i: usize, len: usize) -> usize {
    let next = i.saturating_add(1);
    if next >= len { 0 } else { next }
}

/// Count live neighbors on a row-major slice without bounds checks on the
/// coordinate (callers guarantee `row < rows`, `col < cols`).
fn live_neighbors(cells: &[bool], rows: usize, cols: usize, row: usize, col: usize) -> u8 {
    let row_ring = [wrap_prev(row, rows), row, wrap_next(row, rows)];
    let col_ring = [wrap_prev(col, cols), col, wrap_next(col, cols)];

    let mut count: u8 = 0;
    for (dr, &r) in row_ring.iter().enumerate() {
        for (dc, &c) in col_ring.iter().enumerate() {
            if dr == 1 && dc == 1 {
                continue;
            }
            let alive = r
                .checked_mul(cols)
                .and_then(|base| base.checked_add(c))
                .and_then(|idx| cells.get(idx))
                .copied()
                .unwrap_or(false);
            if alive {
                count = count.saturating_add(1);
            }
        }
    }
    count
}

/// Conway's rule: survive on 2 or 3, birth on exactly 3.
const fn next_state(alive: bool, neighbors: u8) -> bool {
    matches!((alive, neighbors), (true, 2 | 3) | (false, 3))
}

/// Count the live neighbors of `(row, col)` with toroidal wrapping.
///
/// # Errors
///
/// Returns [`GridError::OutOfBounds`] if the coordinate is off the board.
pub fn count_neighbors(grid: &Grid, row: usize, col: usize) -> Result<u8, GridError> {
    if row >= grid.rows() || col >= grid.cols() {
        return Err(GridError::OutOfBounds {
            row,
            col,
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    Ok(live_neighbors(grid.cells(), grid.rows(), grid.cols(), row, col))
}

/// Write the generation following `current` into `next`.
///
/// Every cell of `next` is overwritten; `current` is only read.
///
/// # Errors
///
/// Returns [`GridError::DimensionMismatch`] if the grids are not compatible.
/// `next` is left untouched in that case.
pub fn step(current: &Grid, next: &mut Grid) -> Result<(), GridError> {
    current.ensure_compatible(next)?;

    let rows = current.rows();
    let cols = current.cols();
    let source = current.cells();

    let source_rows = source.chunks_exact(cols);
    let target_rows = next.cells_mut().chunks_exact_mut(cols);
    for (row, (source_row, target_row)) in source_rows.zip(target_rows).enumerate() {
        for (col, (&alive, target)) in source_row.iter().zip(target_row.iter_mut()).enumerate() {
            let neighbors = live_neighbors(source, rows, cols, row, col);
            *target = next_state(alive, neighbors);
        }
    }
    Ok(())
}
