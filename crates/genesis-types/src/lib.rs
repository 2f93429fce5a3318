//! Shared type definitions for the Genesis structural-state simulation.
//!
//! These are the plain value types that cross crate boundaries: the
//! stimulus fed into each step, the closed set of death reasons, and the
//! diagnostic snapshot handed to telemetry.
//!
//! # Modules
//!
//! - [`enums`] -- [`DeathReason`] and its stable integer codes
//! - [`structs`] -- [`Stimulus`], [`DiagnosticSnapshot`], [`InitialConditions`]

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::DeathReason;
pub use structs::{DiagnosticSnapshot, InitialConditions, Stimulus};
