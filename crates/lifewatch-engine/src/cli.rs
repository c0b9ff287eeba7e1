//! Positional argument parsing.
//!
//! The engine accepts either no arguments or exactly two: `rows cols`,
//! overriding the configured grid size.

use crate::error::EngineError;

/// Parsed command-line arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Grid size override as `(rows, cols)`.
    pub dims: Option<(usize, usize)>,
}

impl CliArgs {
    /// Parse arguments, excluding the program name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Args`] for any count other than 0 or 2, or a
    /// value that is not a positive integer.
    pub fn parse<I>(args: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        match args.as_slice() {
            [] => Ok(Self::default()),
            [rows, cols] => Ok(Self {
                dims: Some((parse_dimension("rows", rows)?, parse_dimension("cols", cols)?)),
            }),
            other => Err(EngineError::Args {
                message: format!("expected 0 or 2 arguments, got {}", other.len()),
            }),
        }
    }
}

fn parse_dimension(name: &str, raw: &str) -> Result<usize, EngineError> {
    match raw.parse::<usize>() {
        Ok(0) => Err(EngineError::Args {
            message: format!("{name} must be at least 1"),
        }),
        Ok(value) => Ok(value),
        Err(err) => Err(EngineError::Args {
            message: format!("{name} {raw:?}: {err}"),
        }),
    }
}
