//! Telemetry for the Genesis simulation.
//!
//! Each executed step produces one [`DiagnosticSnapshot`], which a
//! [`TelemetrySink`] appends to a record stream as a single JSON line.
//!
//! # Modules
//!
//! - [`error`] -- [`TelemetryError`].
//! - [`record`] -- The wire record and its byte-stable encoding.
//! - [`sink`] -- The [`TelemetrySink`] trait, the file-backed
//!   [`JsonlSink`], and the in-memory [`MemorySink`].
//!
//! [`DiagnosticSnapshot`]: genesis_types::DiagnosticSnapshot

pub mod error;
pub mod record;
pub mod sink;

pub use error::TelemetryError;
pub use record::{TelemetryRecord, encode_line};
pub use sink::{JsonlSink, MemorySink, TelemetryConfig, TelemetrySink};
