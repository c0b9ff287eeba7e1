//! Tick callback that logs progress and tracks run statistics.

use lifewatch_core::runner::TickCallback;
use lifewatch_core::session::{Session, TickSummary};
use tracing::{debug, info};

/// Generations between progress lines at info level.
const PROGRESS_INTERVAL: u64 = 1_000;

/// Callback that logs every tick at debug level, a progress line every
/// [`PROGRESS_INTERVAL`] generations, and keeps population statistics for
/// the run report.
#[derive(Debug, Default)]
pub struct ProgressCallback {
    peak_live_cells: usize,
}

impl ProgressCallback {
    /// Create a callback with empty statistics.
    pub const fn new() -> Self {
        Self { peak_live_cells: 0 }
    }

    /// Highest live-cell count seen in any classified generation.
    pub const fn peak_live_cells(&self) -> usize {
        self.peak_live_cells
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, summary: &TickSummary, session: &Session) {
        self.peak_live_cells = self.peak_live_cells.max(summary.live_cells);

        debug!(
            generation = summary.generation,
            live_cells = summary.live_cells,
            fingerprint = summary.fingerprint.map(|f| f.to_string()),
            detection = %summary.detection,
            "Generation classified"
        );

        if summary.generation > 0 && summary.generation.checked_rem(PROGRESS_INTERVAL) == Some(0) {
            info!(
                generation = summary.generation,
                live_cells = session.live_cells(),
                peak_live_cells = self.peak_live_cells,
                "Run progress"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifewatch_core::detector::DetectionOptions;
    use lifewatch_core::runner::{self, EndReason};

    use super::*;

    #[test]
    fn tracks_peak_population() {
        // An R-pentomino grows well past its initial five cells.
        let mut session = Session::new(20, 20, 200, DetectionOptions::default()).unwrap();
        session
            .center_pattern(lifewatch_grid::patterns::find("r-pentomino").unwrap())
            .unwrap();
        session.start().unwrap();

        let mut callback = ProgressCallback::new();
        let result = runner::run_session(&mut session, 30, &mut callback).unwrap();
        assert_eq!(result.end_reason, EndReason::MaxGenerationsReached);
        assert_eq!(result.total_ticks, 30);
        assert!(callback.peak_live_cells() > 5);
    }
}
