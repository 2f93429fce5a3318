//! Value structs shared by the core, the world, and telemetry.

use crate::enums::DeathReason;

/// External input for a single step: a pair of real values.
///
/// No invariant is enforced at construction. The evolution operator
/// rejects non-finite components itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stimulus {
    /// First channel.
    pub a: f64,
    /// Second channel.
    pub b: f64,
}

impl Stimulus {
    /// Build a stimulus from its two channels.
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Whether both channels are finite.
    pub const fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

/// Construction parameters for a state machine.
///
/// The seed is retained for reporting. The update law is fixed, so every
/// state machine starts from the same initial structural state regardless
/// of seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitialConditions {
    /// Seed recorded alongside the run.
    pub seed: u64,
}

/// Immutable external view of a state machine at one point in time.
///
/// Produced fresh by every diagnostics query. Field order matches the
/// telemetry record layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticSnapshot {
    /// Number of executed steps (0 before the first step).
    pub step: u64,
    /// Integrity in `[0, 1]`.
    pub kappa: f64,
    /// Potential.
    pub phi: f64,
    /// Absolute magnitude of the directional error term.
    pub dmag: f64,
    /// Accumulated memory magnitude.
    pub mmag: f64,
    /// Whether the state machine is still alive.
    pub alive: bool,
    /// Cause of death, or [`DeathReason::None`] while alive.
    pub death_reason: DeathReason,
}
