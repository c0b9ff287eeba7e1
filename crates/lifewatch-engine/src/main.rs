//! Engine binary for the Lifewatch simulation.
//!
//! Wires configuration, seeding, and the run loop together. The board is
//! populated once, the session is started, and the run continues until a
//! static, looping, or (optionally) glider pattern halts it, or a limit is
//! reached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lifewatch-config.yaml` (or `LIFEWATCH_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Apply the optional `rows cols` arguments and validate
//! 4. Build and seed the session, then start it
//! 5. Run in batch mode, or paced against the wall clock with operator
//!    controls read from stdin
//! 6. Log the result and optionally print a JSON report

mod cli;
mod control;
mod error;
mod paced;
mod progress;
mod report;
mod seed;

use std::time::{Duration, Instant};

use lifewatch_core::clock::StepClock;
use lifewatch_core::config::{LifewatchConfig, LoggingConfig};
use lifewatch_core::runner;
use lifewatch_core::session::Session;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::CliArgs;
use crate::error::EngineError;
use crate::progress::ProgressCallback;
use crate::report::RunReport;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, seeding, or the run itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run().await?;
    Ok(())
}

/// Load, seed, run, and report.
async fn run() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = LifewatchConfig::resolve_path();
    let mut config = LifewatchConfig::load_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(config = %config_path.display(), "lifewatch-engine starting");

    // 3. Command-line overrides.
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if let Some((rows, cols)) = args.dims {
        config.grid.rows = rows;
        config.grid.cols = cols;
    }
    config.validate()?;
    info!(
        rows = config.grid.rows,
        cols = config.grid.cols,
        history_capacity = config.history.capacity,
        stop_on_looping = config.detection.stop_on_looping,
        stop_on_gliding = config.detection.stop_on_gliding,
        paced = config.simulation.paced,
        "Configuration loaded"
    );

    // 4. Build, seed, and start the session.
    let mut session = Session::from_config(&config)?;
    let rng_seed = seed::seed_session(&mut session, &config.seed)?;
    session.start()?;

    // 5. Run.
    let mut callback = ProgressCallback::new();
    let started = Instant::now();
    let result = if config.simulation.paced {
        let mut clock = StepClock::new(&config.timing)?;
        let frame_interval = Duration::from_millis(config.timing.frame_interval_ms.max(1));
        let mut controls = control::spawn_stdin_reader();
        paced::run_paced(
            &mut session,
            &mut clock,
            frame_interval,
            config.simulation.max_generations,
            &mut callback,
            &mut controls,
            shutdown_signal(),
        )
        .await?
    } else {
        runner::run_session(&mut session, config.simulation.max_generations, &mut callback)?
    };
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    // 6. Log results.
    runner::log_simulation_end(&result);

    if config.output.report_json {
        let report = RunReport::new(
            &session,
            &result,
            config.seed.mode,
            rng_seed,
            callback.peak_live_cells(),
            elapsed_ms,
        );
        println!("{}", report.to_json()?);
    }

    info!(
        end_reason = %result.end_reason,
        total_ticks = result.total_ticks,
        elapsed_ms,
        "lifewatch-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr
/// so that stdout carries only the JSON report.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Resolve on Ctrl-C. If the handler cannot be installed, never resolve.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for Ctrl-C, shutdown signal disabled");
        std::future::pending::<()>().await;
    }
}
