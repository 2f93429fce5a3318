//! Configuration loading and typed config structures for the Genesis simulation.
//!
//! The configuration lives in `genesis-config.yaml`. This module defines
//! strongly-typed structs mirroring the YAML layout and a loader that reads
//! it. Every field has a default, so an empty file (or no file at all) is
//! a valid configuration.
//!
//! The evolution coefficients are deliberately absent: the update law is
//! fixed at compile time.

use std::path::{Path, PathBuf};

use genesis_telemetry::TelemetryConfig;
use genesis_types::InitialConditions;
use genesis_world::WorldConfig;
use serde::Deserialize;

/// Environment variable overriding `telemetry.out_path`.
pub const ENV_TELEMETRY_PATH: &str = "GENESIS_TELEMETRY_PATH";

/// Environment variable overriding `runtime.max_steps`.
pub const ENV_MAX_STEPS: &str = "GENESIS_MAX_STEPS";

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
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level run configuration.
///
/// Mirrors the structure of `genesis-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenesisConfig {
    /// State machine construction parameters.
    #[serde(default)]
    pub core: CoreConfig,

    /// Stimulus source settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Telemetry sink settings.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Step bound and pacing.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GenesisConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `GENESIS_TELEMETRY_PATH` overrides `telemetry.out_path`
    /// - `GENESIS_MAX_STEPS` overrides `runtime.max_steps` (ignored unless
    ///   it parses as an unsigned integer)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document carries no mapping at all.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_TELEMETRY_PATH)
            && !path.is_empty()
        {
            self.telemetry.out_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_MAX_STEPS)
            && let Ok(max_steps) = raw.trim().parse::<u64>()
        {
            self.runtime.max_steps = max_steps;
        }
    }
}

/// State machine construction parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoreConfig {
    /// Seed recorded with the state machine.
    #[serde(default)]
    pub seed: u64,
}

impl CoreConfig {
    /// Convert into the state machine's construction parameters.
    pub const fn initial_conditions(&self) -> InitialConditions {
        InitialConditions { seed: self.seed }
    }
}

/// Step bound and pacing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    /// Upper bound on executed steps. 0 runs nothing.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Delay between steps in milliseconds (0 = none).
    #[serde(default)]
    pub pace_ms: u64,

    /// Emit a progress log line every this many steps (0 = never).
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            pace_ms: 0,
            progress_interval: default_progress_interval(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit logs as JSON objects instead of human-readable lines.
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

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_max_steps() -> u64 {
    1000
}

const fn default_progress_interval() -> u64 {
    100_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
