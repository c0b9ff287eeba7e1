//! 64-bit grid fingerprints.
//!
//! A fingerprint is an FNV-1a style hash over every cell value in row-major
//! order: starting from [`FNV_OFFSET_BASIS`], each cell's integer value
//! (0 or 1) is XORed into the accumulator, which is then multiplied by
//! [`FNV_PRIME`] with wrapping (modulo 2^64) arithmetic. The traversal order
//! is part of the contract -- permuting cells changes the result.
//!
//! Fingerprints are a cheap pre-filter. Equal fingerprints do not prove equal
//! grids, so callers always follow a match with [`Grid::equals`].
//!
//! [`Grid::equals`]: crate::Grid::equals

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 1_469_598_103_934_665_603;

/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 1_099_511_628_211;

/// Fingerprint of one grid snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Wrap a raw 64-bit hash value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Return the raw 64-bit hash value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<Fingerprint> for u64 {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Compute the fingerprint of a grid.
pub fn fingerprint(grid: &Grid) -> Fingerprint {
    Fingerprint(hash_cells(grid.cells()))
}

/// Hash a row-major cell slice.
pub fn hash_cells(cells: &[bool]) -> u64 {
    cells.iter().fold(FNV_OFFSET_BASIS, |hash, &alive| {
        (hash ^ u64::from(alive)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_slice_is_the_offset_basis() {
        assert_eq!(hash_cells(&[]), FNV_OFFSET_BASIS);
    }

    #[test]
    fn known_values() {
        let dead = Grid::new(1, 1).unwrap();
        assert_eq!(fingerprint(&dead).value(), 4_953_163_356_653_287_321);

        let single = Grid::from_live_cells(2, 2, &[(0, 0)]).unwrap();
        assert_eq!(single.fingerprint().value(), 10_473_572_386_864_919_714);

        let empty_2x2 = Grid::new(2, 2).unwrap();
        assert_eq!(empty_2x2.fingerprint().value(), 3_554_543_661_169_652_019);
    }

    #[test]
    fn wrapping_multiplication_is_exercised() {
        // A single step from the basis already overflows 64 bits.
        assert!(FNV_OFFSET_BASIS.checked_mul(FNV_PRIME).is_none());
        assert_eq!(hash_cells(&[true]), 4_953_162_257_141_659_110);
    }

    #[test]
    fn deterministic_for_an_unmodified_grid() {
        let grid = Grid::from_live_cells(5, 7, &[(0, 1), (2, 3), (4, 6)]).unwrap();
        assert_eq!(grid.fingerprint(), grid.fingerprint());
    }

    #[test]
    fn single_cell_change_changes_the_hash() {
        let mut grid = Grid::new(3, 3).unwrap();
        let before = grid.fingerprint();
        assert_eq!(before.value(), 16_357_866_887_873_635_513);
        grid.toggle(0, 1).unwrap();
        let after = grid.fingerprint();
        assert_ne!(before, after);
        assert_eq!(after.value(), 14_125_551_480_906_046_104);
    }

    #[test]
    fn order_matters() {
        let a = Grid::from_live_cells(1, 2, &[(0, 0)]).unwrap();
        let b = Grid::from_live_cells(1, 2, &[(0, 1)]).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn display_is_fixed_width_hex() {
        assert_eq!(Fingerprint::new(0xab).to_string(), "00000000000000ab");
    }

    #[test]
    fn serializes_as_a_bare_integer() {
        let json = serde_json::to_string(&Fingerprint::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
