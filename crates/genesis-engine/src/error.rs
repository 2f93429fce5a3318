//! Error types for the engine binary.

use genesis_runtime::config::ConfigError;
use genesis_runtime::runner::RunnerError;

/// Top-level error for the engine binary.
///
/// Wraps every failure `main` can hit so it can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The run loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: RunnerError,
    },
}
