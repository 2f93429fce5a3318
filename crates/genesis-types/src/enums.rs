//! Enumeration types for the Genesis simulation.

/// Why a structural state stopped evolving.
///
/// `None` is the only value observed while the state is alive. Exactly one
/// of the other variants is recorded at the moment of death and it never
/// changes afterward.
///
/// The integer codes returned by [`DeathReason::code`] are part of the
/// telemetry wire format and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DeathReason {
    /// Still alive.
    #[default]
    None,
    /// An input or computed quantity was NaN or infinite.
    NonFinite,
    /// The potential exceeded its fixed ceiling.
    PhiOverflow,
    /// Integrity decayed to (or below) the near-zero epsilon.
    KappaZero,
}

impl DeathReason {
    /// Stable wire code: 0 = None, 1 = `NonFinite`, 2 = `PhiOverflow`, 3 = `KappaZero`.
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::NonFinite => 1,
            Self::PhiOverflow => 2,
            Self::KappaZero => 3,
        }
    }

    /// Whether this reason marks a dead state.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl core::fmt::Display for DeathReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::NonFinite => write!(f, "non_finite"),
            Self::PhiOverflow => write!(f, "phi_overflow"),
            Self::KappaZero => write!(f, "kappa_zero"),
        }
    }
}
