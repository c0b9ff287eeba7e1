//! Error types for the `lifewatch-grid` crate.
//!
//! Every variant is a caller precondition violation: mismatched grid sizes,
//! coordinates off the board, or a seed pattern that cannot be placed. None
//! of them are produced by the simulation arithmetic itself.

/// Errors that can occur during grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A grid was requested with a zero (or overflowing) dimension.
    #[error("invalid grid dimensions {rows}x{cols}: both must be at least 1")]
    InvalidDimensions {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Two grids that must share dimensions do not.
    #[error(
        "grid dimensions differ: expected {expected_rows}x{expected_cols}, \
         found {found_rows}x{found_cols}"
    )]
    DimensionMismatch {
        /// Rows of the grid the operation was anchored on.
        expected_rows: usize,
        /// Columns of the grid the operation was anchored on.
        expected_cols: usize,
        /// Rows of the offending grid.
        found_rows: usize,
        /// Columns of the offending grid.
        found_cols: usize,
    },

    /// A cell coordinate lies outside the grid.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },

    /// No seed pattern is registered under the given name.
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),

    /// A seed pattern is larger than the space available for it.
    #[error("pattern {name} ({height}x{width}) does not fit a {rows}x{cols} grid at ({row}, {col})")]
    PatternDoesNotFit {
        /// Pattern name.
        name: &'static str,
        /// Pattern bounding-box height.
        height: usize,
        /// Pattern bounding-box width.
        width: usize,
        /// Requested top-left row.
        row: usize,
        /// Requested top-left column.
        col: usize,
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },
}
