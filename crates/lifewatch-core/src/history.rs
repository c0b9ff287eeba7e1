//! Bounded simulation history indexed by generation.
//!
//! [`HistoryLog`] is a flat log, not a circular buffer: slot `g` holds the
//! snapshot and fingerprint of generation `g`, for `g < capacity`. Once a run
//! reaches `capacity` generations nothing further is recorded, and pattern
//! detection for those generations is skipped. This is an operational
//! ceiling, not an error: [`HistoryLog::record`] returns
//! [`RecordOutcome::Skipped`] and writes nothing.
//!
//! Snapshot buffers are kept across [`HistoryLog::clear`] so that a restarted
//! run reuses them instead of reallocating every generation.

use lifewatch_grid::{Fingerprint, Grid, GridError};
use tracing::debug;

/// Default number of generations kept in the history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10_000;

/// Errors that can occur while recording history.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The grid is incompatible with the snapshots already recorded.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },
}

/// One recorded generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Copy of the grid as it was at this generation.
    pub snapshot: Grid,
    /// Fingerprint of `snapshot`.
    pub fingerprint: Fingerprint,
}

/// What [`HistoryLog::record`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The generation was stored with this fingerprint.
    Recorded(Fingerprint),
    /// The generation is at or beyond capacity and was not stored.
    Skipped,
}

impl RecordOutcome {
    /// The stored fingerprint, if the generation was recorded.
    pub const fn fingerprint(self) -> Option<Fingerprint> {
        match self {
            Self::Recorded(fingerprint) => Some(fingerprint),
            Self::Skipped => None,
        }
    }
}

/// A pre-allocated buffer plus whether it holds a live record.
#[derive(Debug, Clone)]
struct Slot {
    entry: HistoryEntry,
    recorded: bool,
}

/// Flat, capacity-capped log of past generations.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    /// Maximum number of generations ever stored.
    capacity: usize,
    /// Slot buffers, indexed by generation. Never longer than `capacity`.
    slots: Vec<Slot>,
    /// Dimensions shared by every slot buffer.
    dims: Option<(usize, usize)>,
    /// Number of slots currently holding a record.
    recorded: usize,
    /// One past the highest recorded generation.
    end: usize,
}

impl HistoryLog {
    /// Create an empty log that records generations `0..capacity`.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            dims: None,
            recorded: 0,
            end: 0,
        }
    }

    /// Return the maximum number of generations this log stores.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return one past the highest recorded generation (0 when empty).
    pub const fn len(&self) -> usize {
        self.end
    }

    /// Whether nothing is recorded.
    pub const fn is_empty(&self) -> bool {
        self.recorded == 0
    }

    /// Whether `generation` falls inside the recordable window.
    pub fn within_window(&self, generation: u64) -> bool {
        self.slot_index(generation).is_some()
    }

    /// Slot index for `generation`, or `None` at or beyond capacity.
    fn slot_index(&self, generation: u64) -> Option<usize> {
        usize::try_from(generation)
            .ok()
            .filter(|&index| index < self.capacity)
    }

    /// Record `grid` as generation `generation`.
    ///
    /// Copies the cells into the slot's buffer (allocating it on first use)
    /// and stores the fingerprint. Generations at or beyond capacity are a
    /// silent no-op returning [`RecordOutcome::Skipped`].
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Grid`] if `grid` does not match the
    /// dimensions of the snapshots already recorded. Call [`clear`] first
    /// to switch dimensions.
    ///
    /// [`clear`]: Self::clear
    pub fn record(&mut self, generation: u64, grid: &Grid) -> Result<RecordOutcome, HistoryError> {
        let Some(index) = self.slot_index(generation) else {
            debug!(
                generation,
                capacity = self.capacity,
                "History capacity reached, generation not recorded"
            );
            return Ok(RecordOutcome::Skipped);
        };

        self.adopt_dimensions(grid)?;
        let fingerprint = grid.fingerprint();

        if index < self.slots.len() {
            if let Some(slot) = self.slots.get_mut(index) {
                slot.entry.snapshot.copy_from(grid)?;
                slot.entry.fingerprint = fingerprint;
                if !slot.recorded {
                    slot.recorded = true;
                    self.recorded = self.recorded.saturating_add(1);
                }
            }
        } else {
            // Pad any gap with blank, unrecorded buffers.
            while self.slots.len() < index {
                self.slots.push(Slot {
                    entry: HistoryEntry {
                        snapshot: Grid::new(grid.rows(), grid.cols())?,
                        fingerprint: Fingerprint::new(0),
                    },
                    recorded: false,
                });
            }
            self.slots.push(Slot {
                entry: HistoryEntry {
                    snapshot: grid.clone(),
                    fingerprint,
                },
                recorded: true,
            });
            self.recorded = self.recorded.saturating_add(1);
        }

        self.end = self.end.max(index.saturating_add(1));
        Ok(RecordOutcome::Recorded(fingerprint))
    }

    /// Lock in the grid dimensions, or check them against the locked ones.
    ///
    /// An empty log adopts new dimensions and drops buffers of the old size.
    fn adopt_dimensions(&mut self, grid: &Grid) -> Result<(), GridError> {
        let dims = (grid.rows(), grid.cols());
        match self.dims {
            Some(current) if current == dims => Ok(()),
            Some((rows, cols)) if self.recorded > 0 => Err(GridError::DimensionMismatch {
                expected_rows: rows,
                expected_cols: cols,
                found_rows: dims.0,
                found_cols: dims.1,
            }),
            _ => {
                self.slots.clear();
                self.dims = Some(dims);
                Ok(())
            }
        }
    }

    /// Return the entry for `generation`, or `None` if it was never
    /// recorded (or was cleared).
    pub fn get(&self, generation: u64) -> Option<&HistoryEntry> {
        let index = self.slot_index(generation)?;
        self.slots
            .get(index)
            .filter(|slot| slot.recorded)
            .map(|slot| &slot.entry)
    }

    /// Return the fingerprint recorded for `generation`.
    pub fn fingerprint(&self, generation: u64) -> Option<Fingerprint> {
        self.get(generation).map(|entry| entry.fingerprint)
    }

    /// Forget every record. Buffers are kept for reuse.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.recorded = false;
        }
        self.recorded = 0;
        self.end = 0;
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grid_with(live: &[(usize, usize)]) -> Grid {
        Grid::from_live_cells(4, 4, live).unwrap()
    }

    #[test]
    fn record_and_get() {
        let mut log = HistoryLog::new(8);
        let grid = grid_with(&[(1, 1)]);
        let outcome = log.record(0, &grid).unwrap();
        assert_eq!(outcome, RecordOutcome::Recorded(grid.fingerprint()));

        let entry = log.get(0).unwrap();
        assert_eq!(entry.snapshot, grid);
        assert_eq!(entry.fingerprint, grid.fingerprint());
        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut log = HistoryLog::new(8);
        let mut grid = grid_with(&[(0, 0)]);
        log.record(0, &grid).unwrap();
        grid.toggle(3, 3).unwrap();
        assert!(!log.get(0).unwrap().snapshot.get(3, 3).unwrap());
    }

    #[test]
    fn unrecorded_generation_is_none() {
        let mut log = HistoryLog::new(8);
        assert!(log.get(0).is_none());
        log.record(2, &grid_with(&[])).unwrap();
        assert!(log.get(0).is_none());
        assert!(log.get(1).is_none());
        assert!(log.get(2).is_some());
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn capacity_boundary_is_a_silent_no_op() {
        let capacity = 3;
        let mut log = HistoryLog::new(capacity);
        let grids: Vec<Grid> = (0..3).map(|i| grid_with(&[(i, i)])).collect();
        for (generation, grid) in (0_u64..).zip(&grids) {
            assert!(matches!(
                log.record(generation, grid).unwrap(),
                RecordOutcome::Recorded(_)
            ));
        }

        let overflow = grid_with(&[(3, 0), (3, 1)]);
        let outcome = log.record(3, &overflow).unwrap();
        assert_eq!(outcome, RecordOutcome::Skipped);
        assert_eq!(outcome.fingerprint(), None);
        assert!(log.get(3).is_none());
        assert_eq!(log.len(), 3);

        for (generation, grid) in (0_u64..).zip(&grids) {
            let entry = log.get(generation).unwrap();
            assert_eq!(&entry.snapshot, grid);
            assert_eq!(entry.fingerprint, grid.fingerprint());
        }
    }

    #[test]
    fn huge_generation_is_skipped() {
        let mut log = HistoryLog::new(4);
        assert_eq!(
            log.record(u64::MAX, &grid_with(&[])).unwrap(),
            RecordOutcome::Skipped
        );
        assert!(!log.within_window(u64::MAX));
        assert!(log.within_window(3));
        assert!(!log.within_window(4));
    }

    #[test]
    fn rerecording_overwrites_in_place() {
        let mut log = HistoryLog::new(4);
        log.record(0, &grid_with(&[(0, 0)])).unwrap();
        let replacement = grid_with(&[(2, 2)]);
        log.record(0, &replacement).unwrap();
        assert_eq!(log.get(0).unwrap().snapshot, replacement);
        assert_eq!(log.fingerprint(0), Some(replacement.fingerprint()));
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let mut log = HistoryLog::new(4);
        log.record(0, &grid_with(&[])).unwrap();
        let wide = Grid::new(4, 5).unwrap();
        let err = log.record(1, &wide).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::Grid {
                source: GridError::DimensionMismatch { .. }
            }
        ));
        assert!(log.get(1).is_none());
    }

    #[test]
    fn clear_forgets_records_and_allows_new_dimensions() {
        let mut log = HistoryLog::new(4);
        log.record(0, &grid_with(&[(1, 1)])).unwrap();
        log.record(1, &grid_with(&[(1, 2)])).unwrap();
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.get(0).is_none());

        let wide = Grid::from_live_cells(2, 6, &[(0, 5)]).unwrap();
        log.record(0, &wide).unwrap();
        assert_eq!(log.get(0).unwrap().snapshot, wide);
        assert!(log.get(1).is_none());
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut log = HistoryLog::new(0);
        assert_eq!(
            log.record(0, &grid_with(&[])).unwrap(),
            RecordOutcome::Skipped
        );
        assert!(log.is_empty());
    }
}
