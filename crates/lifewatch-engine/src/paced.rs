//! Wall-clock paced run loop.
//!
//! A tokio interval fires once per frame. Each frame feeds the real time
//! since the previous frame into [`Session::advance`], which lets the
//! [`StepClock`] decide how many generations are due. The batch runner's
//! limits are checked before every tick, so both modes stop on the same
//! generation. The loop also ends on a detection or when `shutdown`
//! resolves. [`Control`]s received between frames adjust speed, pause and
//! detection options.

use std::future::Future;
use std::time::Duration;

use lifewatch_core::clock::StepClock;
use lifewatch_core::runner::{self, EndReason, SimulationResult, TickCallback};
use lifewatch_core::session::{Session, TickSummary};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use crate::control::Control;
use crate::error::EngineError;

/// Run `session` against the wall clock until it halts, hits a limit, or
/// `shutdown` completes.
///
/// # Errors
///
/// Returns [`EngineError::Session`] if a tick fails.
pub async fn run_paced<F>(
    session: &mut Session,
    clock: &mut StepClock,
    frame_interval: Duration,
    max_generations: u64,
    callback: &mut dyn TickCallback,
    controls: &mut mpsc::Receiver<Control>,
    shutdown: F,
) -> Result<SimulationResult, EngineError>
where
    F: Future<Output = ()>,
{
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    let mut frames = tokio::time::interval(frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(
        frame_interval_ms = frame_interval.as_millis(),
        step_ms = clock.step().as_millis(),
        speed = clock.speed(),
        max_generations,
        "Paced run starting"
    );

    let mut last_frame = Instant::now();
    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!(generation = session.generation(), "Shutdown requested");
                return Ok(SimulationResult {
                    end_reason: EndReason::Interrupted,
                    final_summary: last_summary,
                    total_ticks,
                });
            }
            Some(control) = controls.recv() => {
                control.apply(session, clock);
            }
            now = frames.tick() => {
                let elapsed = now.saturating_duration_since(last_frame);
                last_frame = now;

                let due = session.advance_until(clock, elapsed, |s| {
                    runner::check_limits(s, max_generations).is_some()
                })?;
                for summary in due {
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

                if let Some(end_reason) = runner::limit_reached(session, max_generations) {
                    return Ok(SimulationResult {
                        end_reason,
                        final_summary: last_summary,
                        total_ticks,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lifewatch_core::clock::TimingConfig;
    use lifewatch_core::detector::{Detection, DetectionOptions};
    use lifewatch_core::runner::NoOpCallback;
    use lifewatch_core::session::Phase;

    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    const NO_STOPS: DetectionOptions = DetectionOptions {
        stop_on_looping: false,
        stop_on_gliding: false,
    };

    fn started(live: &[(usize, usize)], options: DetectionOptions) -> Session {
        let mut session = Session::new(8, 8, 100, options).unwrap();
        for &(row, col) in live {
            session.toggle_cell(row, col).unwrap();
        }
        session.start().unwrap();
        session
    }

    fn blinker() -> Session {
        started(&[(3, 2), (3, 3), (3, 4)], NO_STOPS)
    }

    fn clock() -> StepClock {
        StepClock::new(&TimingConfig::default()).unwrap()
    }

    /// A control channel with nothing queued. The sender is returned so the
    /// channel stays open.
    fn no_controls() -> (mpsc::Sender<Control>, mpsc::Receiver<Control>) {
        mpsc::channel(4)
    }

    #[tokio::test(start_paused = true)]
    async fn block_halts_on_static() {
        let mut session = started(&[(3, 3), (3, 4), (4, 3), (4, 4)], DetectionOptions::default());
        let (_tx, mut rx) = no_controls();
        let result = run_paced(
            &mut session,
            &mut clock(),
            FRAME,
            0,
            &mut NoOpCallback,
            &mut rx,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(result.end_reason, EndReason::PatternDetected(Detection::Static));
        assert_eq!(result.total_ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn generation_limit_ends_the_run() {
        let mut session = blinker();
        let (_tx, mut rx) = no_controls();
        let result = run_paced(
            &mut session,
            &mut clock(),
            FRAME,
            5,
            &mut NoOpCallback,
            &mut rx,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(result.end_reason, EndReason::MaxGenerationsReached);
        assert_eq!(session.generation(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn generation_limit_holds_when_a_frame_covers_many_steps() {
        let timing = TimingConfig {
            speed: 8.0,
            ..TimingConfig::default()
        };
        let mut clock = StepClock::new(&timing).unwrap();
        let mut session = blinker();
        let (_tx, mut rx) = no_controls();
        let result = run_paced(
            &mut session,
            &mut clock,
            Duration::from_millis(100),
            5,
            &mut NoOpCallback,
            &mut rx,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(result.end_reason, EndReason::MaxGenerationsReached);
        assert_eq!(session.generation(), 5);
        assert_eq!(result.total_ticks, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_the_run() {
        let mut session = blinker();
        let (_tx, mut rx) = no_controls();
        let result = run_paced(
            &mut session,
            &mut clock(),
            FRAME,
            0,
            &mut NoOpCallback,
            &mut rx,
            tokio::time::sleep(Duration::from_millis(500)),
        )
        .await
        .unwrap();
        assert_eq!(result.end_reason, EndReason::Interrupted);
        assert!(result.total_ticks > 0);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_control_stops_ticking() {
        let mut session = blinker();
        let (tx, mut rx) = no_controls();
        tx.send(Control::TogglePause).await.unwrap();
        let result = run_paced(
            &mut session,
            &mut clock(),
            FRAME,
            0,
            &mut NoOpCallback,
            &mut rx,
            tokio::time::sleep(Duration::from_millis(500)),
        )
        .await
        .unwrap();
        assert_eq!(result.end_reason, EndReason::Interrupted);
        assert_eq!(result.total_ticks, 0);
        assert!(session.is_paused());
    }

    #[tokio::test(start_paused = true)]
    async fn faster_control_speeds_up_the_run() {
        let mut session = blinker();
        let mut clock = clock();
        let (tx, mut rx) = no_controls();
        tx.send(Control::Faster).await.unwrap();
        let result = run_paced(
            &mut session,
            &mut clock,
            FRAME,
            0,
            &mut NoOpCallback,
            &mut rx,
            tokio::time::sleep(Duration::from_millis(500)),
        )
        .await
        .unwrap();
        assert!((clock.speed() - 2.0).abs() < f64::EPSILON);
        // Ten steps fit in 500 ms at normal speed.
        assert!(result.total_ticks > 12);
    }

    #[tokio::test(start_paused = true)]
    async fn looping_control_enables_loop_detection() {
        let mut session = blinker();
        let (tx, mut rx) = no_controls();
        tx.send(Control::ToggleLooping).await.unwrap();
        let result = run_paced(
            &mut session,
            &mut clock(),
            FRAME,
            0,
            &mut NoOpCallback,
            &mut rx,
            std::future::pending(),
        )
        .await
        .unwrap();
        assert_eq!(result.end_reason, EndReason::PatternDetected(Detection::Looping));
    }
}
