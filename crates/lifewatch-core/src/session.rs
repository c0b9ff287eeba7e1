//! The simulation session: double-buffered grids, history, and run phase.
//!
//! A [`Session`] moves through three phases:
//!
//! - **Editing** -- cells may be toggled, randomized, cleared, or stamped
//!   with a pattern. Nothing ticks.
//! - **Running** -- [`Session::tick`] advances one generation at a time,
//!   and [`Session::advance`] converts elapsed frame time into ticks.
//! - **Halted** -- a detection stopped the run. The board stays on the
//!   generation that was classified; only [`Session::reset`] or
//!   [`Session::resize`] leave this phase.
//!
//! Each tick records the current generation, classifies it against the
//! history, and only steps the board when nothing was detected.
//!
//! The engine binary drives pause and option changes from its operator
//! controls. [`Session::reset`] and [`Session::resize`] serve interactive
//! front ends that restart a run or change the board size between runs.

use std::fmt;
use std::time::Duration;

use lifewatch_grid::{Fingerprint, Grid, GridError, Pattern, patterns, step};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::clock::StepClock;
use crate::config::LifewatchConfig;
use crate::detector::{self, Detection, DetectionOptions};
use crate::history::{HistoryError, HistoryLog};

/// Errors that can occur during session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// An edit was attempted outside the editing phase.
    #[error("cannot edit the board while {phase}")]
    NotEditable {
        /// The phase the session was in.
        phase: Phase,
    },

    /// A tick was requested before the run started.
    #[error("cannot tick while {phase}")]
    NotRunning {
        /// The phase the session was in.
        phase: Phase,
    },

    /// A tick was requested after a detection halted the run.
    #[error("run halted at generation {generation}: {detection} pattern detected")]
    Halted {
        /// The detection that halted the run.
        detection: Detection,
        /// The generation that was classified.
        generation: u64,
    },

    /// A grid operation failed.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: GridError,
    },

    /// Recording history failed.
    #[error("history error: {source}")]
    History {
        /// The underlying history error.
        #[from]
        source: HistoryError,
    },
}

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before the run: edits allowed, no ticks.
    Editing,
    /// Generations are advancing.
    Running,
    /// A non-`None` detection stopped the run.
    Halted(Detection),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editing => f.write_str("editing"),
            Self::Running => f.write_str("running"),
            Self::Halted(detection) => write!(f, "halted ({detection})"),
        }
    }
}

/// Result of a single [`Session::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The generation that was recorded and classified.
    pub generation: u64,
    /// Its fingerprint, when it was recorded.
    pub fingerprint: Option<Fingerprint>,
    /// The classification. Non-`None` means the run halted on this tick.
    pub detection: Detection,
    /// Live cells in the classified generation.
    pub live_cells: usize,
    /// Whether the generation fit in the history.
    pub recorded: bool,
}

/// Owner of the board, its history, and the run state.
#[derive(Debug, Clone)]
pub struct Session {
    /// The generation on display.
    current: Grid,
    /// Scratch buffer the stepper writes into; swapped with `current`.
    next: Grid,
    history: HistoryLog,
    options: DetectionOptions,
    generation: u64,
    phase: Phase,
    paused: bool,
}

impl Session {
    /// Create a session with an empty `rows` x `cols` board, in the editing
    /// phase.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Grid`] if either dimension is zero.
    pub fn new(
        rows: usize,
        cols: usize,
        history_capacity: usize,
        options: DetectionOptions,
    ) -> Result<Self, SessionError> {
        Ok(Self {
            current: Grid::new(rows, cols)?,
            next: Grid::new(rows, cols)?,
            history: HistoryLog::new(history_capacity),
            options,
            generation: 0,
            phase: Phase::Editing,
            paused: false,
        })
    }

    /// Create a session sized and configured from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Grid`] if the configured grid is empty.
    pub fn from_config(config: &LifewatchConfig) -> Result<Self, SessionError> {
        Self::new(
            config.grid.rows,
            config.grid.cols,
            config.history.capacity,
            config.detection,
        )
    }

    fn ensure_editable(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Editing => Ok(()),
            phase => Err(SessionError::NotEditable { phase }),
        }
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Flip one cell. Returns its new state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEditable`] outside the editing phase and
    /// [`SessionError::Grid`] for an out-of-bounds coordinate.
    pub fn toggle_cell(&mut self, row: usize, col: usize) -> Result<bool, SessionError> {
        self.ensure_editable()?;
        Ok(self.current.toggle(row, col)?)
    }

    /// Fill the board with independent fair coin flips.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEditable`] outside the editing phase.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.current.randomize(rng);
        Ok(())
    }

    /// Fill the board with cells alive at probability `density`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEditable`] outside the editing phase.
    pub fn randomize_with_density<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        density: f64,
    ) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.current.randomize_with_density(rng, density);
        Ok(())
    }

    /// Kill every cell.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEditable`] outside the editing phase.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.current.clear();
        Ok(())
    }

    /// Clear the board and stamp `pattern` with its top-left at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEditable`] outside the editing phase and
    /// [`SessionError::Grid`] if the pattern does not fit.
    pub fn place_pattern(
        &mut self,
        pattern: &Pattern,
        row: usize,
        col: usize,
    ) -> Result<(), SessionError> {
        self.ensure_editable()?;
        patterns::place(&mut self.current, pattern, row, col)?;
        Ok(())
    }

    /// Clear the board and stamp `pattern` in its center.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEditable`] outside the editing phase and
    /// [`SessionError::Grid`] if the pattern does not fit.
    pub fn center_pattern(&mut self, pattern: &Pattern) -> Result<(), SessionError> {
        self.ensure_editable()?;
        patterns::place_centered(&mut self.current, pattern)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Leave the editing phase and begin the run at generation 0.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotEditable`] if the run already started.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_editable()?;
        self.history.clear();
        self.generation = 0;
        self.phase = Phase::Running;
        self.paused = false;
        info!(
            rows = self.current.rows(),
            cols = self.current.cols(),
            live_cells = self.current.live_count(),
            history_capacity = self.history.capacity(),
            stop_on_looping = self.options.stop_on_looping,
            stop_on_gliding = self.options.stop_on_gliding,
            "Run started"
        );
        Ok(())
    }

    /// Run one generation.
    ///
    /// Records the current generation, classifies it, and halts on any
    /// detection without stepping the board. Otherwise the next generation
    /// is computed and becomes current. Ticking ignores the pause flag; use
    /// [`advance`](Self::advance) for paused-aware pacing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotRunning`] in the editing phase,
    /// [`SessionError::Halted`] after a detection, and
    /// [`SessionError::History`] / [`SessionError::Grid`] if the buffers
    /// disagree on dimensions.
    pub fn tick(&mut self) -> Result<TickSummary, SessionError> {
        match self.phase {
            Phase::Running => {}
            Phase::Editing => {
                return Err(SessionError::NotRunning { phase: self.phase });
            }
            Phase::Halted(detection) => {
                return Err(SessionError::Halted {
                    detection,
                    generation: self.generation,
                });
            }
        }

        let generation = self.generation;
        let fingerprint = self.history.record(generation, &self.current)?.fingerprint();
        let detection = match fingerprint {
            Some(fingerprint) => detector::detect(
                &self.history,
                &self.current,
                fingerprint,
                generation,
                self.options,
            )?,
            None => Detection::None,
        };
        let summary = TickSummary {
            generation,
            fingerprint,
            detection,
            live_cells: self.current.live_count(),
            recorded: fingerprint.is_some(),
        };

        if detection.is_terminal() {
            self.phase = Phase::Halted(detection);
            self.paused = true;
            info!(
                generation,
                %detection,
                live_cells = summary.live_cells,
                "Pattern detected, run halted"
            );
            return Ok(summary);
        }

        step(&self.current, &mut self.next)?;
        std::mem::swap(&mut self.current, &mut self.next);
        self.generation = generation.saturating_add(1);
        trace!(
            generation,
            live_cells = summary.live_cells,
            recorded = summary.recorded,
            "Tick complete"
        );
        Ok(summary)
    }

    /// Feed `elapsed` frame time into `clock` and run every tick that came
    /// due, stopping early if one halts the run.
    ///
    /// Does nothing (and accumulates nothing) while paused or not running.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`tick`](Self::tick).
    pub fn advance(
        &mut self,
        clock: &mut StepClock,
        elapsed: Duration,
    ) -> Result<Vec<TickSummary>, SessionError> {
        self.advance_until(clock, elapsed, |_| false)
    }

    /// Like [`advance`](Self::advance), but `stop` is consulted before each
    /// due tick and ends the frame as soon as it returns true.
    ///
    /// Time left in the clock when `stop` fires is kept.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`tick`](Self::tick).
    pub fn advance_until<F>(
        &mut self,
        clock: &mut StepClock,
        elapsed: Duration,
        mut stop: F,
    ) -> Result<Vec<TickSummary>, SessionError>
    where
        F: FnMut(&Self) -> bool,
    {
        let mut summaries = Vec::new();
        if self.paused || self.phase != Phase::Running {
            return Ok(summaries);
        }

        clock.accumulate(elapsed);
        while !stop(self) && clock.try_consume() {
            let summary = self.tick()?;
            summaries.push(summary);
            if summary.detection.is_terminal() {
                clock.reset();
                break;
            }
        }
        if summaries.len() > 1 {
            debug!(ticks = summaries.len(), speed = clock.speed(), "Multiple ticks in one frame");
        }
        Ok(summaries)
    }

    /// Recompute the classification of the current generation without
    /// changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Grid`] if the history and board disagree on
    /// dimensions.
    pub fn status(&self) -> Result<Detection, SessionError> {
        if self.phase == Phase::Editing {
            return Ok(Detection::None);
        }
        let fingerprint = self
            .history
            .fingerprint(self.generation)
            .unwrap_or_else(|| self.current.fingerprint());
        Ok(detector::detect(
            &self.history,
            &self.current,
            fingerprint,
            self.generation,
            self.options,
        )?)
    }

    /// Flip the pause flag while running. Returns the new flag.
    ///
    /// Has no effect outside the running phase.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase == Phase::Running {
            self.paused = !self.paused;
            debug!(paused = self.paused, generation = self.generation, "Pause toggled");
        }
        self.paused
    }

    /// Replace the detection options. Takes effect on the next tick.
    pub const fn set_options(&mut self, options: DetectionOptions) {
        self.options = options;
    }

    /// Clear the board and history and return to the editing phase.
    pub fn reset(&mut self) {
        self.current.clear();
        self.next.clear();
        self.history.clear();
        self.generation = 0;
        self.phase = Phase::Editing;
        self.paused = false;
        info!("Session reset");
    }

    /// Replace the board with an empty `rows` x `cols` one and return to the
    /// editing phase. The history keeps its capacity.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Grid`] if either dimension is zero. The
    /// session is unchanged in that case.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), SessionError> {
        let current = Grid::new(rows, cols)?;
        let next = Grid::new(rows, cols)?;
        self.current = current;
        self.next = next;
        self.history = HistoryLog::new(self.history.capacity());
        self.generation = 0;
        self.phase = Phase::Editing;
        self.paused = false;
        info!(rows, cols, "Session resized");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Return the detection options.
    pub const fn options(&self) -> DetectionOptions {
        self.options
    }

    /// Return the current generation number.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Return the board on display.
    pub const fn current(&self) -> &Grid {
        &self.current
    }

    /// Return the history log.
    pub const fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Return the lifecycle phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether paced advancement is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Return the number of live cells on the current board.
    pub fn live_cells(&self) -> usize {
        self.current.live_count()
    }
}
