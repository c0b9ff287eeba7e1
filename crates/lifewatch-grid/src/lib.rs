//! Cell grid, generation stepper, and fingerprints for the Lifewatch simulation.
//!
//! This crate models the board itself: a rectangular buffer of live/dead
//! cells on a torus, the B3/S23 rule that computes the next generation, and
//! the 64-bit fingerprint used to pre-filter full-grid comparisons.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid operations.
//! - [`fingerprint`] -- FNV-1a fingerprint over the row-major cell contents.
//! - [`grid`] -- The [`Grid`] buffer: creation, editing, copy, and equality.
//! - [`patterns`] -- Named seed patterns (block, blinker, glider, ...) and
//!   placement helpers.
//! - [`stepper`] -- Wrapping neighbor counts and the generation step.

pub mod error;
pub mod fingerprint;
pub mod grid;
pub mod patterns;
pub mod stepper;

// Re-export primary types at crate root.
pub use error::GridError;
pub use fingerprint::Fingerprint;
pub use grid::Grid;
pub use patterns::Pattern;
pub use stepper::{count_neighbors, step};
