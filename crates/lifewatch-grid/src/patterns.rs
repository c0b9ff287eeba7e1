//! Named seed patterns for starting a simulation from a known shape.
//!
//! Each [`Pattern`] is a list of live-cell offsets relative to the top-left
//! corner of its bounding box. [`place`] clears a grid and stamps a pattern
//! at an explicit position; [`place_centered`] centers it.

use crate::error::GridError;
use crate::grid::Grid;

/// A named arrangement of live cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    /// Lookup name (lowercase, hyphenated).
    pub name: &'static str,
    /// Live-cell offsets `(row, col)` from the bounding box's top-left.
    pub cells: &'static [(usize, usize)],
}

impl Pattern {
    /// Bounding-box height.
    pub fn height(&self) -> usize {
        self.cells
            .iter()
            .map(|&(row, _)| row.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Bounding-box width.
    pub fn width(&self) -> usize {
        self.cells
            .iter()
            .map(|&(_, col)| col.saturating_add(1))
            .max()
            .unwrap_or(0)
    }
}

/// Built-in seed patterns.
pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "block",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (0, 1), (0, 2)],
    },
    Pattern {
        name: "toad",
        cells: &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 2), (2, 3), (3, 2), (3, 3)],
    },
    Pattern {
        name: "glider",
        cells: &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
    },
];

/// Look up a built-in pattern by name (case-insensitive).
///
/// # Errors
///
/// Returns [`GridError::UnknownPattern`] if no pattern has that name.
pub fn find(name: &str) -> Result<&'static Pattern, GridError> {
    PATTERNS
        .iter()
        .find(|pattern| pattern.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| GridError::UnknownPattern(name.to_owned()))
}

/// Clear `grid` and stamp `pattern` with its top-left corner at `(row, col)`.
///
/// # Errors
///
/// Returns [`GridError::PatternDoesNotFit`] if the bounding box would leave
/// the grid. The grid is not modified in that case.
pub fn place(grid: &mut Grid, pattern: &Pattern, row: usize, col: usize) -> Result<(), GridError> {
    let fits_rows = row
        .checked_add(pattern.height())
        .is_some_and(|bottom| bottom <= grid.rows());
    let fits_cols = col
        .checked_add(pattern.width())
        .is_some_and(|right| right <= grid.cols());
    if !fits_rows || !fits_cols {
        return Err(GridError::PatternDoesNotFit {
            name: pattern.name,
            height: pattern.height(),
            width: pattern.width(),
            row,
            col,
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }

    grid.clear();
    for &(dr, dc) in pattern.cells {
        // Both sums are bounded by the fit check above.
        grid.set(row.saturating_add(dr), col.saturating_add(dc), true)?;
    }
    Ok(())
}

/// Clear `grid` and stamp `pattern` in its center.
///
/// # Errors
///
/// Returns [`GridError::PatternDoesNotFit`] if the grid is smaller than the
/// pattern's bounding box.
pub fn place_centered(grid: &mut Grid, pattern: &Pattern) -> Result<(), GridError> {
    let row = grid.rows().saturating_sub(pattern.height()) / 2;
    let col = grid.cols().saturating_sub(pattern.width()) / 2;
    place(grid, pattern, row, col)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(find("Glider").unwrap().name, "glider");
        assert_eq!(find("R-PENTOMINO").unwrap().name, "r-pentomino");
    }

    #[test]
    fn find_unknown_pattern() {
        assert_eq!(
            find("gosper-gun"),
            Err(GridError::UnknownPattern("gosper-gun".to_owned()))
        );
    }

    #[test]
    fn bounding_boxes() {
        let glider = find("glider").unwrap();
        assert_eq!((glider.height(), glider.width()), (3, 3));
        let toad = find("toad").unwrap();
        assert_eq!((toad.height(), toad.width()), (2, 4));
    }

    #[test]
    fn place_clears_then_stamps() {
        let mut grid = Grid::from_live_cells(6, 6, &[(5, 5)]).unwrap();
        place(&mut grid, find("block").unwrap(), 1, 2).unwrap();
        let expected = Grid::from_live_cells(6, 6, &[(1, 2), (1, 3), (2, 2), (2, 3)]).unwrap();
        assert_eq!(grid, expected);
    }

    #[test]
    fn place_rejects_overflowing_position() {
        let mut grid = Grid::from_live_cells(5, 5, &[(0, 0)]).unwrap();
        let err = place(&mut grid, find("glider").unwrap(), 3, 0).unwrap_err();
        assert!(matches!(err, GridError::PatternDoesNotFit { name: "glider", .. }));
        // Untouched on failure.
        assert!(grid.get(0, 0).unwrap());
    }

    #[test]
    fn place_centered_on_small_grid() {
        let mut grid = Grid::new(5, 5).unwrap();
        place_centered(&mut grid, find("blinker").unwrap()).unwrap();
        let expected = Grid::from_live_cells(5, 5, &[(2, 1), (2, 2), (2, 3)]).unwrap();
        assert_eq!(grid, expected);

        let mut tiny = Grid::new(2, 2).unwrap();
        assert!(place_centered(&mut tiny, find("glider").unwrap()).is_err());
    }

    #[test]
    fn every_pattern_fits_a_ten_by_ten_grid() {
        let mut grid = Grid::new(10, 10).unwrap();
        for pattern in PATTERNS {
            place_centered(&mut grid, pattern).unwrap();
            assert_eq!(grid.live_count(), pattern.cells.len());
        }
    }
}
