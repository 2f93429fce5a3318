//! Engine binary for the Genesis simulation.
//!
//! Loads configuration, sets up structured logging, assembles the state
//! machine, stimulus generator and telemetry sink, then drives the run loop
//! until the step bound is hit or the state machine dies.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the first argument or `genesis-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Run the simulation
//! 4. Log the result
//!
//! # Usage
//!
//! ```text
//! genesis-engine [CONFIG_PATH]
//! ```
//!
//! `RUST_LOG` takes precedence over `logging.level`.

mod error;

use std::path::{Path, PathBuf};

use genesis_runtime::config::{GenesisConfig, LoggingConfig};
use genesis_runtime::runner::{self, ProgressLogger};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Config file read when no path is given on the command line.
const DEFAULT_CONFIG_PATH: &str = "genesis-config.yaml";

/// Where the configuration came from.
enum ConfigSource {
    /// Read from this file.
    File(PathBuf),
    /// No file found; built-in defaults (plus environment overrides).
    Defaults,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the telemetry sink
/// cannot be opened, or a record cannot be written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging settings live in it, so this runs first.
    let arg = std::env::args().nth(1);
    let (config, source) = load_config(arg.as_deref())?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("genesis-engine starting");

    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
        ConfigSource::Defaults => info!("Config file not found, using defaults"),
    }
    info!(
        core_seed = config.core.seed,
        world_seed = config.world.seed,
        max_steps = config.runtime.max_steps,
        pace_ms = config.runtime.pace_ms,
        out_path = %config.telemetry.out_path.display(),
        "Run parameters"
    );

    // 3. Run the simulation.
    let mut progress = ProgressLogger::new(config.runtime.progress_interval);
    let result = runner::run_configured(&config, &mut progress).map_err(EngineError::from)?;

    // 4. Log results.
    runner::log_run_end(&result);

    info!(
        end_reason = ?result.end_reason,
        steps_run = result.steps_run,
        "genesis-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load configuration from `arg`, or from [`DEFAULT_CONFIG_PATH`] if present.
///
/// An explicitly named file must exist. Without one, a missing default file
/// falls back to built-in defaults. Environment overrides apply either way.
fn load_config(arg: Option<&str>) -> Result<(GenesisConfig, ConfigSource), EngineError> {
    if let Some(path) = arg {
        let path = PathBuf::from(path);
        let config = GenesisConfig::from_file(&path)?;
        return Ok((config, ConfigSource::File(path)));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        let config = GenesisConfig::from_file(default_path)?;
        Ok((config, ConfigSource::File(default_path.to_path_buf())))
    } else {
        Ok((GenesisConfig::parse("")?, ConfigSource::Defaults))
    }
}
