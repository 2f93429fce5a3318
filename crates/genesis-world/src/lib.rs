//! Stimulus sources for the Genesis simulation.
//!
//! The world is the only place randomness enters a run. Every source here
//! is deterministic: constructing two sources from the same configuration
//! yields identical stimulus sequences.
//!
//! # Modules
//!
//! - [`stimulus`] -- The [`StimulusSource`] trait, the seeded
//!   [`WorldInterface`], and the replaying [`ScriptedStimulus`].

pub mod stimulus;

pub use stimulus::{
    DEFAULT_NONZERO_SEED, ScriptedStimulus, StimulusError, StimulusSource, WorldConfig,
    WorldInterface,
};
