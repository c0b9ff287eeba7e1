//! Operator controls for paced runs.
//!
//! One command per line on stdin:
//!
//! | Input            | Effect                          |
//! |------------------|---------------------------------|
//! | `+` / `faster`   | double the speed                |
//! | `-` / `slower`   | halve the speed                 |
//! | `p` / `pause`    | pause or resume                 |
//! | `1` / `gliding`  | toggle stop-on-gliding          |
//! | `2` / `looping`  | toggle stop-on-looping          |

use lifewatch_core::clock::StepClock;
use lifewatch_core::detector::DetectionOptions;
use lifewatch_core::session::Session;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Pending controls buffered between the reader and the run loop.
const CONTROL_BUFFER: usize = 16;

/// A runtime command for a paced run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Double the speed multiplier.
    Faster,
    /// Halve the speed multiplier.
    Slower,
    /// Pause or resume.
    TogglePause,
    /// Flip `stop_on_gliding`.
    ToggleGliding,
    /// Flip `stop_on_looping`.
    ToggleLooping,
}

impl Control {
    /// Parse one input line. Blank or unknown input yields `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "+" | "faster" => Some(Self::Faster),
            "-" | "slower" => Some(Self::Slower),
            "p" | "pause" => Some(Self::TogglePause),
            "1" | "gliding" => Some(Self::ToggleGliding),
            "2" | "looping" => Some(Self::ToggleLooping),
            _ => None,
        }
    }

    /// Apply the command to a running session and its clock.
    pub fn apply(self, session: &mut Session, clock: &mut StepClock) {
        match self {
            Self::Faster => {
                let speed = clock.faster();
                info!(speed, "Speed increased");
            }
            Self::Slower => {
                let speed = clock.slower();
                info!(speed, "Speed decreased");
            }
            Self::TogglePause => {
                let paused = session.toggle_pause();
                info!(paused, generation = session.generation(), "Pause toggled");
            }
            Self::ToggleGliding => {
                let options = session.options();
                session.set_options(DetectionOptions {
                    stop_on_gliding: !options.stop_on_gliding,
                    ..options
                });
                info!(stop_on_gliding = !options.stop_on_gliding, "Detection options changed");
            }
            Self::ToggleLooping => {
                let options = session.options();
                session.set_options(DetectionOptions {
                    stop_on_looping: !options.stop_on_looping,
                    ..options
                });
                info!(stop_on_looping = !options.stop_on_looping, "Detection options changed");
            }
        }
    }
}

/// Read controls from stdin on a dedicated thread.
///
/// The thread blocks on stdin, so it is detached rather than joined. The
/// channel closes when stdin reaches end of file.
pub fn spawn_stdin_reader() -> mpsc::Receiver<Control> {
    let (tx, rx) = mpsc::channel(CONTROL_BUFFER);
    let spawned = std::thread::Builder::new()
        .name("lifewatch-controls".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(error = %err, "Failed to read controls from stdin");
                        break;
                    }
                };
                match Control::parse(&line) {
                    Some(control) => {
                        if tx.blocking_send(control).is_err() {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!(input = line.trim(), "Unknown control"),
                }
            }
            debug!("Control reader finished");
        });
    if let Err(err) = spawned {
        warn!(error = %err, "Failed to start control reader, controls disabled");
    }
    rx
}
