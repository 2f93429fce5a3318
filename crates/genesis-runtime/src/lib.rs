//! Configuration and run loop for the Genesis simulation.
//!
//! This crate wires the pure core to its external collaborators: it loads
//! the run configuration, pulls stimuli from a [`StimulusSource`], steps a
//! [`GenesisCore`], and forwards every diagnostic snapshot to a
//! [`TelemetrySink`].
//!
//! # Modules
//!
//! - [`config`] -- Loading `genesis-config.yaml` into typed structs.
//! - [`runner`] -- The sequential run loop with step bound and pacing.
//!
//! [`StimulusSource`]: genesis_world::StimulusSource
//! [`GenesisCore`]: genesis_core::GenesisCore
//! [`TelemetrySink`]: genesis_telemetry::TelemetrySink

pub mod config;
pub mod runner;
