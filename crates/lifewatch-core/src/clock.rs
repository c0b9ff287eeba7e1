//! Fixed-timestep step clock.
//!
//! Converts wall-clock frame time into a whole number of generation ticks.
//! Elapsed time, scaled by the speed multiplier, accumulates; every time
//! the accumulator holds at least one step interval, one tick is due and
//! the interval is subtracted. Under a high multiplier several ticks can
//! come due in a single frame.
//!
//! The speed multiplier moves in powers of two between the configured
//! bounds via [`StepClock::faster`] and [`StepClock::slower`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a step clock.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Invalid timing configuration (e.g. a zero step interval).
    #[error("invalid timing configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Timing parameters for the step clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Simulated seconds per generation at speed 1.0.
    #[serde(default = "default_step_seconds")]
    pub step_seconds: f64,

    /// Initial speed multiplier.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Lowest speed reachable with [`StepClock::slower`].
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,

    /// Highest speed reachable with [`StepClock::faster`].
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,

    /// Real-time milliseconds between frames in paced mode.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl TimingConfig {
    /// Check the bounds without building a clock.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), ClockError> {
        StepClock::new(self).map(|_| ())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_seconds: default_step_seconds(),
            speed: default_speed(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

const fn default_step_seconds() -> f64 {
    0.05
}

const fn default_speed() -> f64 {
    1.0
}

const fn default_min_speed() -> f64 {
    0.125
}

const fn default_max_speed() -> f64 {
    8.0
}

const fn default_frame_interval_ms() -> u64 {
    16
}

/// Fixed-timestep accumulator with a speed multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct StepClock {
    /// Time budget consumed by one tick.
    step: Duration,
    /// Current speed multiplier, within `[min_speed, max_speed]`.
    speed: f64,
    min_speed: f64,
    max_speed: f64,
    /// Scaled time not yet converted into ticks.
    accumulator: Duration,
}

impl StepClock {
    /// Build a clock from timing parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the step is not a positive
    /// finite duration, if either bound is not positive and finite, if
    /// `min_speed > max_speed`, or if `speed` lies outside the bounds.
    pub fn new(config: &TimingConfig) -> Result<Self, ClockError> {
        let step = Duration::try_from_secs_f64(config.step_seconds).map_err(|err| {
            ClockError::InvalidConfig {
                reason: format!("step_seconds {}: {err}", config.step_seconds),
            }
        })?;
        if step.is_zero() {
            return Err(ClockError::InvalidConfig {
                reason: "step_seconds must be greater than zero".to_owned(),
            });
        }
        for (name, value) in [
            ("speed", config.speed),
            ("min_speed", config.min_speed),
            ("max_speed", config.max_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ClockError::InvalidConfig {
                    reason: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }
        if config.min_speed > config.max_speed {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "min_speed {} exceeds max_speed {}",
                    config.min_speed, config.max_speed
                ),
            });
        }
        if config.speed < config.min_speed || config.speed > config.max_speed {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "speed {} outside [{}, {}]",
                    config.speed, config.min_speed, config.max_speed
                ),
            });
        }

        Ok(Self {
            step,
            speed: config.speed,
            min_speed: config.min_speed,
            max_speed: config.max_speed,
            accumulator: Duration::ZERO,
        })
    }

    /// Add `elapsed` real time, scaled by the current speed.
    pub fn accumulate(&mut self, elapsed: Duration) {
        // mul_f64 panics on overflow; saturate instead.
        let scaled = Duration::try_from_secs_f64(elapsed.as_secs_f64() * self.speed)
            .unwrap_or(Duration::MAX);
        self.accumulator = self.accumulator.saturating_add(scaled);
    }

    /// Consume one step if enough time has accumulated.
    pub fn try_consume(&mut self) -> bool {
        match self.accumulator.checked_sub(self.step) {
            Some(rest) => {
                self.accumulator = rest;
                true
            }
            None => false,
        }
    }

    /// Double the speed, capped at the maximum. Returns the new speed.
    pub fn faster(&mut self) -> f64 {
        self.speed = (self.speed * 2.0).min(self.max_speed);
        self.speed
    }

    /// Halve the speed, floored at the minimum. Returns the new speed.
    pub fn slower(&mut self) -> f64 {
        self.speed = (self.speed / 2.0).max(self.min_speed);
        self.speed
    }

    /// Return the current speed multiplier.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Return the step interval.
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Return the scaled time not yet converted into ticks.
    pub const fn pending(&self) -> Duration {
        self.accumulator
    }

    /// Drop any accumulated time.
    pub const fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
