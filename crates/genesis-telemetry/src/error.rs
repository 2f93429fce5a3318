//! Error types for the `genesis-telemetry` crate.

use std::path::PathBuf;

/// Errors that can occur while writing telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The destination could not be opened for appending.
    #[error("failed to open telemetry destination {}: {source}", path.display())]
    Open {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Writing or flushing a record failed.
    #[error("failed to write telemetry record: {source}")]
    Write {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A record could not be encoded.
    #[error("failed to encode telemetry record: {source}")]
    Encode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
