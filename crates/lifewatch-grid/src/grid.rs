//! The simulation board: a flat, row-major buffer of live/dead cells.
//!
//! A [`Grid`] owns `rows * cols` cells stored as a single `Vec<bool>`;
//! cell `(row, col)` lives at index `row * cols + col`. The dimensions are
//! fixed at construction and are always at least 1x1.
//!
//! Operations that involve two grids (copy, equality, stepping) require the
//! grids to be *compatible* -- identical rows and cols -- and return
//! [`GridError::DimensionMismatch`] otherwise. Coordinates are bounds-checked
//! and return [`GridError::OutOfBounds`] rather than wrapping; only the
//! stepper's neighbor count treats the board as a torus.

use rand::Rng;

use crate::error::GridError;
use crate::fingerprint::{self, Fingerprint};

/// A rectangular grid of cells, alive (`true`) or dead (`false`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows (at least 1).
    rows: usize,
    /// Number of columns (at least 1).
    cols: usize,
    /// Row-major cell states, `rows * cols` long.
    cells: Vec<bool>,
}

impl Grid {
    /// Create a grid with every cell dead.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] if either dimension is zero
    /// or `rows * cols` overflows `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(GridError::InvalidDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![false; len],
        })
    }

    /// Create a grid whose only live cells are the listed coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for a zero dimension, or
    /// [`GridError::OutOfBounds`] if any coordinate is off the board.
    pub fn from_live_cells(
        rows: usize,
        cols: usize,
        live: &[(usize, usize)],
    ) -> Result<Self, GridError> {
        let mut grid = Self::new(rows, cols)?;
        for &(row, col) in live {
            grid.set(row, col, true)?;
        }
        Ok(grid)
    }

    /// Return the number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Return the total number of cells (`rows * cols`).
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Return the row-major cell slice.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Mutable row-major cell slice, for the stepper.
    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }

    /// Whether `other` has the same dimensions as this grid.
    pub const fn is_compatible(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Fail with [`GridError::DimensionMismatch`] unless `other` is
    /// compatible with this grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DimensionMismatch`] naming `self` as expected.
    pub fn ensure_compatible(&self, other: &Self) -> Result<(), GridError> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(GridError::DimensionMismatch {
                expected_rows: self.rows,
                expected_cols: self.cols,
                found_rows: other.rows,
                found_cols: other.cols,
            })
        }
    }

    /// Row-major index of `(row, col)`, bounds-checked.
    fn index(&self, row: usize, col: usize) -> Result<usize, GridError> {
        let out_of_bounds = GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        };
        if row >= self.rows || col >= self.cols {
            return Err(out_of_bounds);
        }
        row.checked_mul(self.cols)
            .and_then(|base| base.checked_add(col))
            .ok_or(out_of_bounds)
    }

    /// Return whether the cell at `(row, col)` is alive.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinate is off the board.
    pub fn get(&self, row: usize, col: usize) -> Result<bool, GridError> {
        let idx = self.index(row, col)?;
        Ok(self.cells.get(idx).copied().unwrap_or(false))
    }

    /// Set the cell at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinate is off the board.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) -> Result<(), GridError> {
        let idx = self.index(row, col)?;
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = alive;
        }
        Ok(())
    }

    /// Flip the cell at `(row, col)` and return its new state.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the coordinate is off the board.
    pub fn toggle(&mut self, row: usize, col: usize) -> Result<bool, GridError> {
        let idx = self.index(row, col)?;
        let cell = self.cells.get_mut(idx).ok_or(GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })?;
        *cell = !*cell;
        Ok(*cell)
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Set every cell independently alive or dead with equal probability.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = rng.random_bool(0.5);
        }
    }

    /// Set every cell independently alive with probability `density`.
    ///
    /// Values at or below 0 leave the grid empty, values at or above 1 fill
    /// it; NaN is treated as 0.
    pub fn randomize_with_density<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) {
        for cell in &mut self.cells {
            *cell = rng.random::<f64>() < density;
        }
    }

    /// Overwrite this grid's cells with those of `src`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DimensionMismatch`] if the grids are not
    /// compatible. Nothing is written in that case.
    pub fn copy_from(&mut self, src: &Self) -> Result<(), GridError> {
        self.ensure_compatible(src)?;
        self.cells.copy_from_slice(&src.cells);
        Ok(())
    }

    /// Exact cell-by-cell comparison with a compatible grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DimensionMismatch`] if the grids are not
    /// compatible; comparing boards of different sizes is a caller bug.
    pub fn equals(&self, other: &Self) -> Result<bool, GridError> {
        self.ensure_compatible(other)?;
        Ok(self.cells == other.cells)
    }

    /// Return the number of live cells.
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Compute this grid's [`Fingerprint`].
    pub fn fingerprint(&self) -> Fingerprint {
        fingerprint::fingerprint(self)
    }
}
