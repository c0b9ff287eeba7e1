//! Configuration loading and typed config structures for Lifewatch.
//!
//! The canonical configuration lives in `lifewatch-config.yaml` at the
//! project root (override the path with `LIFEWATCH_CONFIG`). This module
//! defines strongly-typed structs that mirror the YAML structure, and
//! provides a loader that reads and validates the file. Every field has a
//! default, so an empty file, or no file at all, yields a 10x10 board with
//! looping detection on and glider detection off.

use std::path::{Path, PathBuf};

use lifewatch_grid::patterns;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::clock::{ClockError, TimingConfig};
use crate::detector::DetectionOptions;
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Default configuration file name, relative to the working directory.
pub const CONFIG_FILE: &str = "lifewatch-config.yaml";

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "LIFEWATCH_CONFIG";

/// Environment variable overriding `seed.rng_seed`.
pub const SEED_ENV: &str = "LIFEWATCH_SEED";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The timing section is inconsistent.
    #[error("timing error: {source}")]
    Timing {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Lifewatch configuration.
///
/// Mirrors the structure of `lifewatch-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifewatchConfig {
    /// Board dimensions.
    #[serde(default)]
    pub grid: GridConfig,

    /// Which optional pattern checks halt the run.
    #[serde(default)]
    pub detection: DetectionOptions,

    /// History sizing.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Step clock and frame pacing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// How the board is populated before the run starts.
    #[serde(default)]
    pub seed: SeedConfig,

    /// Run boundaries and pacing mode.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// End-of-run output.
    #[serde(default)]
    pub output: OutputConfig,
}

impl LifewatchConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `LIFEWATCH_SEED` overrides `seed.rng_seed` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults with
    /// environment overrides applied.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file) when the file exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Resolve the configuration path: `LIFEWATCH_CONFIG` if set, else
    /// [`CONFIG_FILE`] in the working directory.
    pub fn resolve_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
    }

    /// Override values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        let seed = std::env::var(SEED_ENV).ok();
        self.seed.apply_seed_override(seed.as_deref());
    }

    /// Check ranges the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero grid dimensions, zero
    /// history capacity, a density outside `[0, 1]`, or an unknown seed
    /// pattern, and [`ConfigError::Timing`] for bad timing bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "grid must be at least 1x1, got {}x{}",
                    self.grid.rows, self.grid.cols
                ),
            });
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid {
                reason: "history.capacity must be at least 1".to_owned(),
            });
        }
        if !(0.0..=1.0).contains(&self.seed.density) {
            return Err(ConfigError::Invalid {
                reason: format!("seed.density must be within [0, 1], got {}", self.seed.density),
            });
        }
        if self.seed.mode == SeedMode::Pattern {
            patterns::find(&self.seed.pattern).map_err(|err| ConfigError::Invalid {
                reason: err.to_string(),
            })?;
        }
        self.timing.validate()?;
        Ok(())
    }
}

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of rows.
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Number of columns.
    #[serde(default = "default_cols")]
    pub cols: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

/// History sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of generations recorded; detection stops beyond this.
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

/// How the initial board is populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Each cell alive with probability `density`.
    #[default]
    Random,
    /// A named pattern, centered.
    Pattern,
    /// All cells dead.
    Empty,
}

/// Seeding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// How the board is populated.
    #[serde(default)]
    pub mode: SeedMode,

    /// RNG seed for random mode. `None` draws one from the OS.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Pattern name for pattern mode.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Probability that a cell starts alive in random mode.
    #[serde(default = "default_density")]
    pub density: f64,
}

impl SeedConfig {
    /// Apply a raw `LIFEWATCH_SEED` value. Unparsable values are ignored
    /// with a warning.
    pub fn apply_seed_override(&mut self, raw: Option<&str>) {
        let Some(raw) = raw else {
            return;
        };
        match raw.trim().parse::<u64>() {
            Ok(seed) => self.rng_seed = Some(seed),
            Err(err) => warn!(env = SEED_ENV, value = raw, error = %err, "Ignoring unparsable seed override"),
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            mode: SeedMode::default(),
            rng_seed: None,
            pattern: default_pattern(),
            density: default_density(),
        }
    }
}

/// Run boundaries.
///
/// A value of 0 for `max_generations` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Maximum number of generations before the run ends (0 = unlimited).
    #[serde(default)]
    pub max_generations: u64,

    /// Tick against wall-clock time through the step clock instead of
    /// running as fast as possible.
    #[serde(default)]
    pub paced: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// End-of-run output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print a JSON run report to stdout when the run ends.
    #[serde(default)]
    pub report_json: bool,
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_rows() -> usize {
    10
}

const fn default_cols() -> usize {
    10
}

const fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_pattern() -> String {
    "glider".to_owned()
}

const fn default_density() -> f64 {
    0.5
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_interactive_defaults() {
        let config = LifewatchConfig::default();
        assert_eq!((config.grid.rows, config.grid.cols), (10, 10));
        assert!(config.detection.stop_on_looping);
        assert!(!config.detection.stop_on_gliding);
        assert_eq!(config.history.capacity, 10_000);
        assert_eq!(config.seed.mode, SeedMode::Random);
        assert_eq!(config.seed.pattern, "glider");
        assert_eq!(config.simulation.max_generations, 0);
        assert!(!config.simulation.paced);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
grid:
  rows: 24
  cols: 40

detection:
  stop_on_looping: false
  stop_on_gliding: true

history:
  capacity: 500

timing:
  step_seconds: 0.1
  speed: 2.0
  min_speed: 0.25
  max_speed: 4.0
  frame_interval_ms: 33

seed:
  mode: pattern
  rng_seed: 99
  pattern: "r-pentomino"
  density: 0.3

simulation:
  max_generations: 2000
  paced: true

logging:
  level: "debug"
  json: true

output:
  report_json: true
"#;

        let config = LifewatchConfig::parse(yaml).unwrap();
        assert_eq!((config.grid.rows, config.grid.cols), (24, 40));
        assert!(!config.detection.stop_on_looping);
        assert!(config.detection.stop_on_gliding);
        assert_eq!(config.history.capacity, 500);
        assert_eq!(config.timing.frame_interval_ms, 33);
        assert_eq!(config.seed.mode, SeedMode::Pattern);
        assert_eq!(config.seed.pattern, "r-pentomino");
        assert_eq!(config.simulation.max_generations, 2000);
        assert!(config.simulation.paced);
        assert!(config.logging.json);
        assert!(config.output.report_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = LifewatchConfig::parse("grid:\n  rows: 7\n").unwrap();
        assert_eq!(config.grid.rows, 7);
        // Everything else uses defaults.
        assert_eq!(config.grid.cols, 10);
        assert_eq!(config.history.capacity, 10_000);
        assert!(config.detection.stop_on_looping);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(LifewatchConfig::parse("").is_ok());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = LifewatchConfig::parse("grid: [1, 2");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let mut zero_rows = LifewatchConfig::default();
        zero_rows.grid.rows = 0;
        assert!(matches!(zero_rows.validate(), Err(ConfigError::Invalid { .. })));

        let mut zero_capacity = LifewatchConfig::default();
        zero_capacity.history.capacity = 0;
        assert!(matches!(zero_capacity.validate(), Err(ConfigError::Invalid { .. })));

        let mut dense = LifewatchConfig::default();
        dense.seed.density = 1.5;
        assert!(matches!(dense.validate(), Err(ConfigError::Invalid { .. })));

        let mut unknown = LifewatchConfig::default();
        unknown.seed.mode = SeedMode::Pattern;
        unknown.seed.pattern = "spaceship".to_owned();
        assert!(matches!(unknown.validate(), Err(ConfigError::Invalid { .. })));

        let mut slow = LifewatchConfig::default();
        slow.timing.step_seconds = 0.0;
        assert!(matches!(slow.validate(), Err(ConfigError::Timing { .. })));
    }

    #[test]
    fn seed_override() {
        let mut seed = SeedConfig::default();
        seed.apply_seed_override(None);
        assert_eq!(seed.rng_seed, None);
        seed.apply_seed_override(Some(" 1234 "));
        assert_eq!(seed.rng_seed, Some(1234));
        seed.apply_seed_override(Some("not-a-number"));
        assert_eq!(seed.rng_seed, Some(1234));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("/definitely/not/here/lifewatch-config.yaml");
        let config = LifewatchConfig::load_or_default(path).unwrap();
        assert_eq!(config.grid, GridConfig::default());
        assert!(matches!(
            LifewatchConfig::from_file(path),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(CONFIG_FILE);
        if path.exists() {
            let config = LifewatchConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert!(config.unwrap().validate().is_ok());
        }
    }
}
