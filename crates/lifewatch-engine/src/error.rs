//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the run itself, and report output.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Command-line arguments were malformed.
    #[error("usage: lifewatch-engine [rows cols]: {message}")]
    Args {
        /// What was wrong with the arguments.
        message: String,
    },

    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lifewatch_core::config::ConfigError,
    },

    /// Step clock construction failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: lifewatch_core::clock::ClockError,
    },

    /// A seed pattern could not be found or placed.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: lifewatch_grid::GridError,
    },

    /// A session operation failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: lifewatch_core::session::SessionError,
    },

    /// The batch runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: lifewatch_core::runner::RunnerError,
    },

    /// The run report could not be serialized.
    #[error("report error: {source}")]
    Report {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
