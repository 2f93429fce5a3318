//! Telemetry wire record.
//!
//! One record per line, keys in this exact order:
//!
//! ```text
//! {"step":1,"kappa":0.99,"phi":0.0003,"dmag":0.0005,"mmag":3.7e-7,"alive":true,"death_reason":0}
//! ```
//!
//! Floats are written by `serde_json` in shortest round-trip form, so equal
//! snapshots always encode to equal bytes. Snapshot fields are finite by
//! construction of the evolution law; `serde_json` would write `null` for
//! a non-finite value.

use genesis_types::DiagnosticSnapshot;
use serde::Serialize;

use crate::error::TelemetryError;

/// Serialized form of a [`DiagnosticSnapshot`].
///
/// Field declaration order is the on-disk key order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetryRecord {
    /// Executed step count.
    pub step: u64,
    /// Integrity.
    pub kappa: f64,
    /// Potential.
    pub phi: f64,
    /// `|delta|`.
    pub dmag: f64,
    /// Memory magnitude.
    pub mmag: f64,
    /// Alive flag.
    pub alive: bool,
    /// Integer death reason code (0-3).
    pub death_reason: u8,
}

impl From<&DiagnosticSnapshot> for TelemetryRecord {
    fn from(snap: &DiagnosticSnapshot) -> Self {
        Self {
            step: snap.step,
            kappa: snap.kappa,
            phi: snap.phi,
            dmag: snap.dmag,
            mmag: snap.mmag,
            alive: snap.alive,
            death_reason: snap.death_reason.code(),
        }
    }
}

/// Encode a snapshot as one newline-terminated JSON line.
///
/// # Errors
///
/// Returns [`TelemetryError::Encode`] if serialization fails.
pub fn encode_line(snapshot: &DiagnosticSnapshot) -> Result<Vec<u8>, TelemetryError> {
    let mut line = serde_json::to_vec(&TelemetryRecord::from(snapshot))?;
    line.push(b'\n');
    Ok(line)
}
