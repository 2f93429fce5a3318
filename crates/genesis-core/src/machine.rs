//! Structural state machine: step sequencing and the alive/dead lifecycle.
//!
//! [`GenesisCore`] owns exactly one [`StructuralState`] and a step counter.
//! It applies [`evolve`] on each step while alive and freezes everything
//! once the operator reports a death reason. [`GenesisCore::diagnostics`]
//! projects the internal state into an immutable [`DiagnosticSnapshot`].
//!
//! ```text
//! Alive --(evolve returns reason != None)--> Dead(reason)
//! Dead  --(any step)--> Dead(reason)   (no-op)
//! ```

use genesis_types::{DeathReason, DiagnosticSnapshot, InitialConditions, Stimulus};
use tracing::info;

use crate::evolution::evolve;
use crate::state::StructuralState;

/// Lifecycle status of a state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vitality {
    /// Steps are applied.
    Alive,
    /// Terminal. Carries the reason recorded at the moment of death.
    Dead(DeathReason),
}

/// Whether a call to [`GenesisCore::step`] did anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The operator ran and the step counter advanced.
    Executed,
    /// The machine was already dead; nothing changed.
    NotExecuted,
}

impl StepOutcome {
    /// Whether the step ran.
    pub const fn executed(self) -> bool {
        matches!(self, Self::Executed)
    }
}

/// Owner of one structural state and its alive/dead lifecycle.
#[derive(Debug, Clone)]
pub struct GenesisCore {
    state: StructuralState,
    step: u64,
    vitality: Vitality,
    initial: InitialConditions,
}

impl GenesisCore {
    /// Create an alive machine at step 0 with a fresh structural state.
    pub const fn new(initial: &InitialConditions) -> Self {
        Self {
            state: StructuralState::new(),
            step: 0,
            vitality: Vitality::Alive,
            initial: *initial,
        }
    }

    /// Apply one stimulus.
    ///
    /// While alive, the operator runs and the step counter advances, even
    /// when this step is the one that kills the state. Once dead, this is a
    /// no-op returning [`StepOutcome::NotExecuted`].
    pub fn step(&mut self, stimulus: Stimulus) -> StepOutcome {
        if let Vitality::Dead(_) = self.vitality {
            return StepOutcome::NotExecuted;
        }

        let reason = evolve(&mut self.state, stimulus);
        self.step = self.step.saturating_add(1);

        if reason.is_terminal() {
            self.vitality = Vitality::Dead(reason);
            info!(
                step = self.step,
                reason = %reason,
                phi = self.state.phi(),
                mmag = self.state.m(),
                "Structural state died"
            );
        }

        StepOutcome::Executed
    }

    /// Immutable snapshot of the current state. Never mutates anything.
    pub const fn diagnostics(&self) -> DiagnosticSnapshot {
        DiagnosticSnapshot {
            step: self.step,
            kappa: self.state.kappa(),
            phi: self.state.phi(),
            dmag: self.state.delta().abs(),
            mmag: self.state.m(),
            alive: self.is_alive(),
            death_reason: self.death_reason(),
        }
    }

    /// Whether steps are still applied.
    pub const fn is_alive(&self) -> bool {
        matches!(self.vitality, Vitality::Alive)
    }

    /// Current lifecycle status.
    pub const fn vitality(&self) -> Vitality {
        self.vitality
    }

    /// Recorded death reason, or [`DeathReason::None`] while alive.
    pub const fn death_reason(&self) -> DeathReason {
        match self.vitality {
            Vitality::Alive => DeathReason::None,
            Vitality::Dead(reason) => reason,
        }
    }

    /// Number of executed steps.
    pub const fn step_count(&self) -> u64 {
        self.step
    }

    /// Conditions this machine was constructed with.
    pub const fn initial_conditions(&self) -> InitialConditions {
        self.initial
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use genesis_world::{StimulusSource, WorldConfig, WorldInterface};

    use super::*;

    fn fresh() -> GenesisCore {
        GenesisCore::new(&InitialConditions { seed: 0 })
    }

    #[test]
    fn fresh_machine_diagnostics() {
        let core = fresh();
        let snap = core.diagnostics();
        assert_eq!(snap.step, 0);
        assert_eq!(snap.kappa, 1.0);
        assert_eq!(snap.phi, 0.0);
        assert_eq!(snap.dmag, 0.0);
        assert_eq!(snap.mmag, 0.0);
        assert!(snap.alive);
        assert_eq!(snap.death_reason, DeathReason::None);
        assert_eq!(core.vitality(), Vitality::Alive);
    }

    #[test]
    fn diagnostics_is_pure() {
        let mut core = fresh();
        let _ = core.step(Stimulus::new(0.7, 0.2));
        let a = core.diagnostics();
        let b = core.diagnostics();
        assert_eq!(a, b);
        assert_eq!(core.step_count(), 1);
    }

    #[test]
    fn dmag_is_absolute_delta() {
        let mut core = fresh();
        // b > a drives delta negative.
        let _ = core.step(Stimulus::new(0.0, 1.0));
        let snap = core.diagnostics();
        assert!(snap.dmag > 0.0);
        assert_eq!(snap.dmag, 0.002);
    }

    #[test]
    fn step_counts_from_one() {
        let mut core = fresh();
        let mut world = WorldInterface::new(&WorldConfig { seed: 1 });

        let mut expected = core.diagnostics().step;
        for _ in 0..5000 {
            if !core.is_alive() {
                break;
            }
            let outcome = core.step(world.next_stimulus());
            assert_eq!(outcome, StepOutcome::Executed);
            expected += 1;
            assert_eq!(core.diagnostics().step, expected);
        }
        assert_eq!(expected, 5000);
    }

    #[test]
    fn death_step_is_counted() {
        let mut core = fresh();
        let _ = core.step(Stimulus::new(0.5, 0.5));
        let outcome = core.step(Stimulus::new(f64::NAN, 0.5));
        assert!(outcome.executed());

        let snap = core.diagnostics();
        assert_eq!(snap.step, 2);
        assert!(!snap.alive);
        assert_eq!(snap.death_reason, DeathReason::NonFinite);
        assert_eq!(snap.kappa, 0.0);
        assert_eq!(core.vitality(), Vitality::Dead(DeathReason::NonFinite));
    }

    #[test]
    fn death_is_sticky() {
        let mut core = fresh();
        let _ = core.step(Stimulus::new(0.3, 0.1));
        let _ = core.step(Stimulus::new(5000.0, 0.0));
        assert!(!core.is_alive());

        let before = core.diagnostics();
        assert_eq!(before.death_reason, DeathReason::KappaZero);

        for stim in [
            Stimulus::new(0.0, 0.0),
            Stimulus::new(f64::NAN, f64::NAN),
            Stimulus::new(1e6, 0.0),
        ] {
            assert_eq!(core.step(stim), StepOutcome::NotExecuted);
            assert_eq!(core.diagnostics(), before);
        }
        assert_eq!(core.death_reason(), DeathReason::KappaZero);
    }

    #[test]
    fn death_preserves_pre_step_fields() {
        let mut core = fresh();
        let _ = core.step(Stimulus::new(0.9, 0.1));
        let alive = core.diagnostics();

        let _ = core.step(Stimulus::new(1e5, 0.0));
        let dead = core.diagnostics();

        assert_eq!(dead.death_reason, DeathReason::PhiOverflow);
        assert_eq!(dead.phi, alive.phi);
        assert_eq!(dead.dmag, alive.dmag);
        assert_eq!(dead.mmag, alive.mmag);
        assert_eq!(dead.kappa, 0.0);
        assert_eq!(dead.step, alive.step + 1);
    }

    #[test]
    fn reason_exclusivity_holds_over_a_run() {
        let mut core = fresh();
        let mut world = WorldInterface::new(&WorldConfig { seed: 7 });
        for _ in 0..2000 {
            let _ = core.step(world.next_stimulus());
            let snap = core.diagnostics();
            assert_eq!(snap.alive, snap.death_reason == DeathReason::None);
            assert!((0.0..=1.0).contains(&snap.kappa));
        }
    }

    #[test]
    fn initial_conditions_are_retained() {
        let core = GenesisCore::new(&InitialConditions { seed: 99 });
        assert_eq!(core.initial_conditions().seed, 99);
    }
}
