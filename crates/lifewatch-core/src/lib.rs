//! History, pattern detection, and tick orchestration for the Lifewatch simulation.
//!
//! This crate owns everything that happens around a single generation step:
//! recording the board into a bounded history, classifying the current
//! generation as static, looping, or glider-bearing, pacing ticks against
//! wall-clock time, and driving a session until a pattern halts it.
//!
//! # Modules
//!
//! - [`clock`] -- Fixed-timestep accumulator with a speed multiplier.
//! - [`config`] -- Configuration loading from `lifewatch-config.yaml` into
//!   strongly-typed structs.
//! - [`detector`] -- [`Detection`] classification with static, looping, and
//!   glider checks in priority order.
//! - [`glider`] -- Isolated glider search over the four template variants.
//! - [`history`] -- [`HistoryLog`], the flat bounded log of snapshots and
//!   fingerprints indexed by generation.
//! - [`runner`] -- Headless loop that ticks a session to completion.
//! - [`session`] -- [`Session`], the owner of the double-buffered grids,
//!   history, options, and run phase.
//!
//! [`Detection`]: detector::Detection
//! [`HistoryLog`]: history::HistoryLog
//! [`Session`]: session::Session

pub mod clock;
pub mod config;
pub mod detector;
pub mod glider;
pub mod history;
pub mod runner;
pub mod session;
