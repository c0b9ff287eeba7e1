//! Isolated glider search.
//!
//! A glider match is a 3x3 block equal to one of the four
//! [`GLIDER_VARIANTS`] whose surrounding one-cell ring (the 5x5 window minus
//! the inner 3x3) is entirely dead. Anchors `(row, col)` name the top-left
//! cell of the 3x3 block and range over `1..=rows-4` and `1..=cols-4`, so the
//! 5x5 window always lies fully on the board.
//!
//! The scan does not wrap. A glider touching the grid edge, or straddling the
//! toroidal seam, is never reported even though the stepper moves it across
//! the seam normally. Boards smaller than 5x5 never match.

use lifewatch_grid::Grid;
use serde::{Deserialize, Serialize};

/// A 3x3 live/dead template, indexed `[row][col]`.
pub type Template = [[bool; 3]; 3];

const X: bool = true;
const O: bool = false;

/// The four glider templates checked at every anchor, in scan order.
pub const GLIDER_VARIANTS: [Template; 4] = [
    [[O, X, O], [O, O, X], [X, X, X]],
    [[X, O, X], [X, O, O], [X, X, O]],
    [[X, X, X], [X, O, O], [O, X, O]],
    [[O, X, X], [X, X, O], [O, O, X]],
];

/// Where a glider was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GliderMatch {
    /// Row of the 3x3 block's top-left cell.
    pub row: usize,
    /// Column of the 3x3 block's top-left cell.
    pub col: usize,
    /// Index into [`GLIDER_VARIANTS`].
    pub variant: usize,
}

/// Whether any isolated glider variant appears on the grid.
pub fn scan(grid: &Grid) -> bool {
    find_glider(grid).is_some()
}

/// Return the first isolated glider in row-major anchor order, trying the
/// variants in order at each anchor.
pub fn find_glider(grid: &Grid) -> Option<GliderMatch> {
    let row_end = grid.rows().saturating_sub(3);
    let col_end = grid.cols().saturating_sub(3);
    for row in 1..row_end {
        for col in 1..col_end {
            for (variant, template) in GLIDER_VARIANTS.iter().enumerate() {
                if matches_at(grid, row, col, template) {
                    return Some(GliderMatch { row, col, variant });
                }
            }
        }
    }
    None
}

/// Compare the 5x5 window centered on the 3x3 block at `(row, col)`.
fn matches_at(grid: &Grid, row: usize, col: usize, template: &Template) -> bool {
    let top = row.saturating_sub(1);
    let left = col.saturating_sub(1);
    for i in 0..5_usize {
        for j in 0..5_usize {
            let expected = i
                .checked_sub(1)
                .zip(j.checked_sub(1))
                .and_then(|(ti, tj)| template.get(ti).and_then(|line| line.get(tj)))
                .copied()
                .unwrap_or(false);
            let actual = grid
                .get(top.saturating_add(i), left.saturating_add(j))
                .unwrap_or(true);
            if actual != expected {
                return false;
            }
        }
    }
    true
}
