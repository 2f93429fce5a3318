//! The structural state evolved by the update law.

/// The evolving numeric tuple `(delta, phi, m, kappa)`.
///
/// Held by value inside [`GenesisCore`](crate::GenesisCore). Fields are
/// private; the only writer is [`evolve`](crate::evolve), which commits all
/// four fields in a single assignment or forces `kappa` to zero.
///
/// # Invariants (for states reached through `evolve`)
///
/// - `kappa` is in `[0, 1]`.
/// - `m` never decreases.
/// - Once `kappa == 0.0`, no field changes again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructuralState {
    pub(crate) delta: f64,
    pub(crate) phi: f64,
    pub(crate) m: f64,
    pub(crate) kappa: f64,
}

impl StructuralState {
    /// Fresh state: zero error, zero potential, zero memory, full integrity.
    pub const fn new() -> Self {
        Self {
            delta: 0.0,
            phi: 0.0,
            m: 0.0,
            kappa: 1.0,
        }
    }

    /// Build a state from explicit parts (useful for testing the operator
    /// at specific points of the state space).
    ///
    /// No invariant is checked here.
    pub const fn from_parts(delta: f64, phi: f64, m: f64, kappa: f64) -> Self {
        Self {
            delta,
            phi,
            m,
            kappa,
        }
    }

    /// Signed directional error term.
    pub const fn delta(&self) -> f64 {
        self.delta
    }

    /// Accumulated potential.
    pub const fn phi(&self) -> f64 {
        self.phi
    }

    /// Cumulative memory magnitude.
    pub const fn m(&self) -> f64 {
        self.m
    }

    /// Integrity.
    pub const fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Whether integrity has been forced to exactly zero.
    #[allow(clippy::float_cmp)]
    pub const fn is_terminal(&self) -> bool {
        self.kappa == 0.0
    }
}

impl Default for StructuralState {
    fn default() -> Self {
        Self::new()
    }
}
