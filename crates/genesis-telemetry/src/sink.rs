//! Telemetry sinks.
//!
//! A sink only ever appends. [`JsonlSink`] opens its destination in append
//! mode and never truncates or rewrites prior content.

use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

use genesis_types::DiagnosticSnapshot;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::TelemetryError;
use crate::record::encode_line;

/// Destination for per-step diagnostic records.
pub trait TelemetrySink {
    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if the record cannot be encoded or written.
    fn emit(&mut self, snapshot: &DiagnosticSnapshot) -> Result<(), TelemetryError>;

    /// Push any buffered bytes to the destination.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Write`] if flushing fails.
    fn flush(&mut self) -> Result<(), TelemetryError>;
}

/// Telemetry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelemetryConfig {
    /// Path of the JSON Lines file records are appended to.
    #[serde(default = "default_out_path")]
    pub out_path: PathBuf,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            out_path: default_out_path(),
        }
    }
}

fn default_out_path() -> PathBuf {
    PathBuf::from("telemetry.jsonl")
}

/// Appends records to a JSON Lines file.
///
/// Writes go through a [`LineWriter`], so each completed record reaches the
/// file as soon as its trailing newline is written.
#[derive(Debug)]
pub struct JsonlSink {
    path: PathBuf,
    writer: LineWriter<File>,
    records: u64,
}

impl JsonlSink {
    /// Open (or create) the configured destination for appending.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Open`] if the file or its parent directory
    /// cannot be created.
    pub fn open(config: &TelemetryConfig) -> Result<Self, TelemetryError> {
        Self::open_path(&config.out_path)
    }

    /// Open (or create) `path` for appending.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Open`] if the file or its parent directory
    /// cannot be created.
    pub fn open_path(path: &Path) -> Result<Self, TelemetryError> {
        let open_err = |source| TelemetryError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;

        info!(path = %path.display(), "Telemetry sink opened");

        Ok(Self {
            path: path.to_path_buf(),
            writer: LineWriter::new(file),
            records: 0,
        })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records appended through this sink.
    pub const fn records_written(&self) -> u64 {
        self.records
    }
}

impl TelemetrySink for JsonlSink {
    fn emit(&mut self, snapshot: &DiagnosticSnapshot) -> Result<(), TelemetryError> {
        let line = encode_line(snapshot)?;
        self.writer.write_all(&line)?;
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TelemetryError> {
        self.writer.flush()?;
        debug!(path = %self.path.display(), records = self.records, "Telemetry sink flushed");
        Ok(())
    }
}

/// Collects encoded records in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    buffer: Vec<u8>,
    records: u64,
}

impl MemorySink {
    /// Create an empty sink.
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            records: 0,
        }
    }

    /// All bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the sink and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Number of records appended.
    pub const fn records_written(&self) -> u64 {
        self.records
    }
}

impl TelemetrySink for MemorySink {
    fn emit(&mut self, snapshot: &DiagnosticSnapshot) -> Result<(), TelemetryError> {
        let line = encode_line(snapshot)?;
        self.buffer.extend_from_slice(&line);
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TelemetryError> {
        Ok(())
    }
}
