//! End-of-run JSON report.

use chrono::{DateTime, Utc};
use lifewatch_core::config::SeedMode;
use lifewatch_core::detector::Detection;
use lifewatch_core::runner::{EndReason, SimulationResult};
use lifewatch_core::session::Session;
use lifewatch_grid::Fingerprint;
use serde::Serialize;

/// Summary of a finished run, printed to stdout when `output.report_json`
/// is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Board rows.
    pub rows: usize,
    /// Board columns.
    pub cols: usize,
    /// How the board was seeded.
    pub seed_mode: SeedMode,
    /// RNG seed, for random boards.
    pub rng_seed: Option<u64>,
    /// Why the run ended.
    pub end_reason: EndReason,
    /// The halting detection, or `none`.
    pub detection: Detection,
    /// Ticks executed.
    pub total_ticks: u64,
    /// Generation the session ended on.
    pub final_generation: u64,
    /// Live cells on the final board.
    pub final_live_cells: usize,
    /// Fingerprint of the final board.
    pub final_fingerprint: Fingerprint,
    /// Highest live-cell count seen during the run.
    pub peak_live_cells: usize,
    /// Wall-clock run time in milliseconds.
    pub elapsed_ms: u64,
    /// When the run ended.
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Assemble a report from the finished session and run result.
    pub fn new(
        session: &Session,
        result: &SimulationResult,
        seed_mode: SeedMode,
        rng_seed: Option<u64>,
        peak_live_cells: usize,
        elapsed_ms: u64,
    ) -> Self {
        let detection = match result.end_reason {
            EndReason::PatternDetected(detection) => detection,
            _ => Detection::None,
        };
        Self {
            rows: session.current().rows(),
            cols: session.current().cols(),
            seed_mode,
            rng_seed,
            end_reason: result.end_reason,
            detection,
            total_ticks: result.total_ticks,
            final_generation: session.generation(),
            final_live_cells: session.live_cells(),
            final_fingerprint: session.current().fingerprint(),
            peak_live_cells,
            elapsed_ms,
            finished_at: Utc::now(),
        }
    }

    /// Render as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifewatch_core::detector::DetectionOptions;
    use lifewatch_core::runner::{self, NoOpCallback};

    use super::*;

    #[test]
    fn report_for_a_static_run() {
        let mut session = Session::new(6, 6, 50, DetectionOptions::default()).unwrap();
        for (row, col) in [(2, 2), (2, 3), (3, 2), (3, 3)] {
            session.toggle_cell(row, col).unwrap();
        }
        session.start().unwrap();
        let result = runner::run_session(&mut session, 0, &mut NoOpCallback).unwrap();

        let report = RunReport::new(&session, &result, SeedMode::Empty, None, 4, 1);
        assert_eq!(report.detection, Detection::Static);
        assert_eq!(report.final_generation, 1);
        assert_eq!(report.final_live_cells, 4);
        assert_eq!(report.final_fingerprint, session.current().fingerprint());

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["rows"], 6);
        assert_eq!(json["seed_mode"], "empty");
        assert_eq!(json["detection"], "static");
        assert_eq!(json["end_reason"]["pattern_detected"], "static");
        assert!(json["rng_seed"].is_null());
        assert!(json["finished_at"].is_string());
    }

    #[test]
    fn non_detection_end_reports_none() {
        let mut session = Session::new(5, 5, 2, DetectionOptions::default()).unwrap();
        session.toggle_cell(0, 0).unwrap();
        session.start().unwrap();
        let result = runner::run_session(&mut session, 0, &mut NoOpCallback).unwrap();
        assert_eq!(result.end_reason, EndReason::HistoryExhausted);

        let report = RunReport::new(&session, &result, SeedMode::Random, Some(9), 1, 0);
        assert_eq!(report.detection, Detection::None);
        assert_eq!(report.rng_seed, Some(9));
    }
}
