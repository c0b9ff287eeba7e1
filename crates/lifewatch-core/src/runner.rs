//! Headless run loop.
//!
//! [`run_session`] ticks a started [`Session`] as fast as possible until
//! one of the end conditions holds:
//!
//! - **Pattern detected**: a tick halted the session.
//! - **Generation limit**: `max_generations` generations have been stepped
//!   (0 = unlimited).
//! - **History exhausted**: the next generation lies beyond the history
//!   capacity, so no further detection is possible.
//!
//! Paced, wall-clock driven runs go through [`Session::advance`] instead and
//! report [`EndReason::Interrupted`] when stopped from outside.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::detector::Detection;
use crate::session::{Session, SessionError, TickSummary};

/// Errors that can occur during the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: SessionError,
    },
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A detection halted the session.
    PatternDetected(Detection),
    /// The configured generation limit was reached.
    MaxGenerationsReached,
    /// The history is full; detection can no longer fire.
    HistoryExhausted,
    /// Stopped by a shutdown signal.
    Interrupted,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternDetected(detection) => write!(f, "{detection} pattern detected"),
            Self::MaxGenerationsReached => f.write_str("generation limit reached"),
            Self::HistoryExhausted => f.write_str("history exhausted"),
            Self::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// The reason the run ended.
    pub end_reason: EndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to render the board, collect statistics,
/// and so on.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, session: &Session);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _session: &Session) {}
}

/// Tick `session` until it halts or a limit is reached.
///
/// The session must already be started.
///
/// # Errors
///
/// Returns [`RunnerError::Session`] if a tick fails, including when the
/// session is not running.
pub fn run_session(
    session: &mut Session,
    max_generations: u64,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_generations,
        history_capacity = session.history().capacity(),
        "Batch run starting"
    );

    loop {
        // --- Check limits (before tick) ---
        if let Some(end_reason) = limit_reached(session, max_generations) {
            return Ok(SimulationResult {
                end_reason,
                final_summary: last_summary,
                total_ticks,
            });
        }

        // --- Execute tick ---
        let summary = session.tick()?;
        total_ticks = total_ticks.saturating_add(1);
        callback.on_tick(&summary, session);

        if summary.detection.is_terminal() {
            return Ok(SimulationResult {
                end_reason: EndReason::PatternDetected(summary.detection),
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);
    }
}

/// Check the end conditions that do not depend on a tick's detection.
///
/// Returns [`EndReason::MaxGenerationsReached`] once `max_generations`
/// generations have been stepped (0 = unlimited), or
/// [`EndReason::HistoryExhausted`] when the current generation can no longer
/// be recorded. Logs nothing; see [`limit_reached`].
pub fn check_limits(session: &Session, max_generations: u64) -> Option<EndReason> {
    let generation = session.generation();
    if max_generations > 0 && generation >= max_generations {
        Some(EndReason::MaxGenerationsReached)
    } else if !session.history().within_window(generation) {
        Some(EndReason::HistoryExhausted)
    } else {
        None
    }
}

/// [`check_limits`], logging the limit that ended the run.
pub fn limit_reached(session: &Session, max_generations: u64) -> Option<EndReason> {
    let end_reason = check_limits(session, max_generations)?;
    let generation = session.generation();
    if end_reason == EndReason::MaxGenerationsReached {
        info!(generation, max_generations, "Generation limit reached");
    } else {
        info!(
            generation,
            capacity = session.history().capacity(),
            "History exhausted, detection no longer possible"
        );
    }
    Some(end_reason)
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = %result.end_reason,
        total_ticks = result.total_ticks,
        final_generation = result.final_summary.as_ref().map(|s| s.generation),
        final_live_cells = result.final_summary.as_ref().map(|s| s.live_cells),
        "Simulation ended"
    );
}
