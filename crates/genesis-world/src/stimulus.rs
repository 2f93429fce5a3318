//! Deterministic stimulus generation.
//!
//! # Determinism
//!
//! [`WorldInterface`] runs a plain `xorshift64` generator. Each stimulus
//! consumes two draws `r1, r2` and maps them to
//! `a = (r1 % 1000) / 1000` and `b = (r2 % 1000) / 1000`, so both channels
//! lie in `[0.0, 0.999]`. The same seed always produces the same sequence
//! for the life of the process.
//!
//! A seed of 0 would lock `xorshift64` at zero forever, so it is replaced
//! by [`DEFAULT_NONZERO_SEED`].

use genesis_types::Stimulus;
use serde::Deserialize;
use tracing::debug;

/// Generator state substituted for a configured seed of 0.
pub const DEFAULT_NONZERO_SEED: u64 = 1;

/// Resolution of each stimulus channel.
const CHANNEL_STEPS: u64 = 1000;

/// Errors that can occur when building a stimulus source.
#[derive(Debug, thiserror::Error)]
pub enum StimulusError {
    /// A scripted source needs at least one stimulus to replay.
    #[error("scripted stimulus source requires at least one entry")]
    EmptyScript,
}

/// A source of per-step stimuli.
///
/// The run loop pulls exactly one stimulus per executed step.
pub trait StimulusSource {
    /// Produce the next stimulus in the sequence.
    fn next_stimulus(&mut self) -> Stimulus;
}

/// World configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Seed for the stimulus generator. 0 is replaced by a fixed non-zero
    /// default.
    #[serde(default = "default_world_seed")]
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_world_seed(),
        }
    }
}

const fn default_world_seed() -> u64 {
    1
}

/// Seeded `xorshift64` stimulus generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldInterface {
    /// Current generator state. Never zero.
    state: u64,
}

impl WorldInterface {
    /// Create a generator from the world configuration.
    pub fn new(config: &WorldConfig) -> Self {
        let state = if config.seed == 0 {
            debug!(
                substitute = DEFAULT_NONZERO_SEED,
                "World seed 0 replaced with non-zero default"
            );
            DEFAULT_NONZERO_SEED
        } else {
            config.seed
        };
        Self { state }
    }

    /// Current raw generator state.
    pub const fn state(&self) -> u64 {
        self.state
    }

    fn draw(&mut self) -> u64 {
        self.state = xorshift64(self.state);
        self.state
    }
}

impl StimulusSource for WorldInterface {
    fn next_stimulus(&mut self) -> Stimulus {
        let r1 = self.draw();
        let r2 = self.draw();
        Stimulus::new(to_channel(r1), to_channel(r2))
    }
}

/// One `xorshift64` round (shifts 13, 7, 17).
const fn xorshift64(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

/// Map a raw draw to `[0.0, 0.999]` in steps of 0.001.
fn to_channel(raw: u64) -> f64 {
    let bucket = raw.checked_rem(CHANNEL_STEPS).unwrap_or(0);
    // bucket < 1000, so the conversion cannot fail.
    let bucket = u32::try_from(bucket).unwrap_or(0);
    f64::from(bucket) / 1000.0
}

/// Replays a fixed list of stimuli, cycling back to the start when the list
/// is exhausted.
///
/// Useful for boundary scenarios (non-finite inputs, overload) that the
/// seeded generator never produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedStimulus {
    script: Vec<Stimulus>,
    cursor: usize,
}

impl ScriptedStimulus {
    /// Build a replaying source.
    ///
    /// # Errors
    ///
    /// Returns [`StimulusError::EmptyScript`] if `script` is empty.
    pub fn new(script: Vec<Stimulus>) -> Result<Self, StimulusError> {
        if script.is_empty() {
            return Err(StimulusError::EmptyScript);
        }
        Ok(Self { script, cursor: 0 })
    }

    /// Number of stimuli in one pass of the script.
    pub fn len(&self) -> usize {
        self.script.len()
    }

    /// Always `false`: construction rejects empty scripts.
    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }
}

impl StimulusSource for ScriptedStimulus {
    fn next_stimulus(&mut self) -> Stimulus {
        let stim = self.script.get(self.cursor).copied().unwrap_or_default();
        self.cursor = self
            .cursor
            .saturating_add(1)
            .checked_rem(self.script.len())
            .unwrap_or(0);
        stim
    }
}
