//! Evolution operator and alive/dead state machine for the Genesis simulation.
//!
//! This crate owns the only nontrivial numeric content of the workspace:
//! the fixed update law that advances a [`StructuralState`] under a
//! [`Stimulus`], and the [`GenesisCore`] wrapper that sequences steps and
//! freezes the state once it dies.
//!
//! # Modules
//!
//! - [`state`] -- The four-field structural state and its invariants.
//! - [`evolution`] -- The fixed update law and death classification.
//! - [`machine`] -- Step sequencing, alive/dead tracking, diagnostics.
//!
//! Nothing in this crate performs I/O.
//!
//! [`Stimulus`]: genesis_types::Stimulus

pub mod evolution;
pub mod machine;
pub mod state;

pub use evolution::evolve;
pub use machine::{GenesisCore, StepOutcome, Vitality};
pub use state::StructuralState;
