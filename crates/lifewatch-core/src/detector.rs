//! Per-generation pattern classification.
//!
//! [`detect`] compares the current grid against the [`HistoryLog`] and
//! returns the first matching [`Detection`] in priority order:
//!
//! 1. **Static** -- always checked: the grid equals generation `g - 1`.
//! 2. **Looping** -- only with `stop_on_looping`: the grid equals some
//!    earlier generation in `0..g - 1`, scanned oldest first.
//! 3. **Glider** -- only with `stop_on_gliding`: an isolated glider is on
//!    the board (see [`glider`](crate::glider)).
//!
//! Every history comparison is pre-filtered by fingerprint and confirmed
//! with an exact cell comparison. The looping scan is O(g) per generation;
//! the fingerprint filter keeps the common case to one integer compare per
//! entry.
//!
//! Generation 0 has nothing to compare against and always yields
//! [`Detection::None`], as does any generation at or beyond the history
//! capacity: detection silently stops once the log is full.

use std::fmt;

use lifewatch_grid::{Fingerprint, Grid, GridError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::glider;
use crate::history::{HistoryEntry, HistoryLog};

/// Classification of a single generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detection {
    /// Nothing recognised.
    #[default]
    None,
    /// Identical to the immediately preceding generation.
    Static,
    /// Identical to an earlier, non-adjacent generation.
    Looping,
    /// An isolated glider is on the board.
    Glider,
}

impl Detection {
    /// Whether this result should halt the simulation.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Lowercase name for logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Static => "static",
            Self::Looping => "looping",
            Self::Glider => "glider",
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which optional checks run. The static check is unconditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOptions {
    /// Halt when the grid repeats an earlier generation.
    #[serde(default = "default_true")]
    pub stop_on_looping: bool,

    /// Halt when an isolated glider appears.
    #[serde(default)]
    pub stop_on_gliding: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            stop_on_looping: true,
            stop_on_gliding: false,
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Fingerprint pre-filter followed by the exact comparison.
fn same_as(entry: &HistoryEntry, current: &Grid, fingerprint: Fingerprint) -> Result<bool, GridError> {
    Ok(entry.fingerprint == fingerprint && entry.snapshot.equals(current)?)
}

/// Classify `current` as generation `generation`.
///
/// `fingerprint` must be the fingerprint of `current`; the caller usually
/// has it from [`HistoryLog::record`]. History slots that were never
/// recorded are skipped.
///
/// # Errors
///
/// Returns [`GridError::DimensionMismatch`] if `current` does not match the
/// recorded snapshots' dimensions.
pub fn detect(
    history: &HistoryLog,
    current: &Grid,
    fingerprint: Fingerprint,
    generation: u64,
    options: DetectionOptions,
) -> Result<Detection, GridError> {
    if generation == 0 || !history.within_window(generation) {
        return Ok(Detection::None);
    }
    let previous = generation.saturating_sub(1);

    if let Some(entry) = history.get(previous)
        && same_as(entry, current, fingerprint)?
    {
        debug!(generation, "Static pattern detected");
        return Ok(Detection::Static);
    }

    if options.stop_on_looping {
        for earlier in 0..previous {
            let Some(entry) = history.get(earlier) else {
                continue;
            };
            if same_as(entry, current, fingerprint)? {
                debug!(
                    generation,
                    first_seen = earlier,
                    period = generation.saturating_sub(earlier),
                    "Looping pattern detected"
                );
                return Ok(Detection::Looping);
            }
        }
    }

    if options.stop_on_gliding
        && let Some(found) = glider::find_glider(current)
    {
        debug!(
            generation,
            row = found.row,
            col = found.col,
            variant = found.variant,
            "Glider detected"
        );
        return Ok(Detection::Glider);
    }

    Ok(Detection::None)
}
