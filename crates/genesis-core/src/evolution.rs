//! The fixed update law that advances a structural state by one step.
//!
//! The law is a pure function of the current state and one stimulus:
//!
//! 1. Reject non-finite stimulus channels.
//! 2. Drive `delta` by the stimulus direction, damped by `kappa * delta`.
//! 3. Smooth `phi` toward `delta^2 + eta * |stimulus|^2`.
//! 4. Grow `m` by a non-negative increment derived from `|delta|` and `|phi|`.
//! 5. Decay `kappa` by the new potential and the memory increment, clamped
//!    to `[0, 1]`.
//! 6. Classify the candidate state; commit it only if it is viable.
//!
//! # Design Principles
//!
//! - Candidate values are locals until every check passes. A failed check
//!   leaves `delta`, `phi` and `m` untouched and forces `kappa` to zero, so
//!   death is visible through `kappa` alone.
//! - All coefficients are compile-time constants. The law is not
//!   configurable.

use genesis_types::{DeathReason, Stimulus};

use crate::state::StructuralState;

/// Stimulus drive coefficient (alpha).
pub const ALPHA_STIM: f64 = 0.0020;
/// Damping coefficient applied to `kappa * delta` (beta).
pub const BETA_DAMP: f64 = 0.0008;
/// Smoothing factor pulling `phi` toward its target (gamma).
pub const GAMMA_PHI: f64 = 0.0400;
/// Weight of stimulus energy in the `phi` target (eta).
pub const ETA_STIM_PHI: f64 = 0.0100;
/// Memory growth per unit of `|delta|` (mu).
pub const MU_MEM_DELTA: f64 = 0.0006;
/// Memory growth per unit of `|phi|` (nu).
pub const NU_MEM_PHI: f64 = 0.0002;
/// Integrity cost per unit of potential.
pub const C_KAPPA_PHI: f64 = 0.000_15;
/// Integrity cost per unit of memory increment.
pub const C_KAPPA_MEM: f64 = 0.000_01;

/// Ceiling above which the potential is considered overflowed.
pub const PHI_MAX: f64 = 1e6;
/// Integrity at or below this value counts as decayed to zero.
pub const KAPPA_EPSILON: f64 = 1e-12;

/// Advance `state` by one step under `stimulus`.
///
/// Returns [`DeathReason::None`] when the candidate state was committed.
/// Any other value means the step killed the state: only `kappa` was
/// written (to `0.0`) and the remaining fields keep their pre-step values.
///
/// Validation order is fixed: non-finite values first, then potential
/// overflow, then integrity decay.
pub fn evolve(state: &mut StructuralState, stimulus: Stimulus) -> DeathReason {
    if !stimulus.is_finite() {
        state.kappa = 0.0;
        return DeathReason::NonFinite;
    }

    let Stimulus { a, b } = stimulus;
    let stim_dir = a - b;
    let stim_pow = a * a + b * b;

    let delta_new = state.delta + ALPHA_STIM * stim_dir - BETA_DAMP * state.kappa * state.delta;

    let target_phi = delta_new * delta_new + ETA_STIM_PHI * stim_pow;
    let phi_new = (1.0 - GAMMA_PHI) * state.phi + GAMMA_PHI * target_phi;

    let mem_inc = MU_MEM_DELTA * delta_new.abs() + NU_MEM_PHI * phi_new.abs();
    let m_new = state.m + mem_inc;

    let kappa_new = clamp_unit(state.kappa - C_KAPPA_PHI * phi_new - C_KAPPA_MEM * mem_inc);

    let verdict = classify(delta_new, phi_new, m_new, kappa_new);
    if verdict.is_terminal() {
        state.kappa = 0.0;
        return verdict;
    }

    *state = StructuralState {
        delta: delta_new,
        phi: phi_new,
        m: m_new,
        kappa: kappa_new,
    };
    DeathReason::None
}

/// Classify a candidate state. First matching check wins.
fn classify(delta: f64, phi: f64, m: f64, kappa: f64) -> DeathReason {
    if !(delta.is_finite() && phi.is_finite() && m.is_finite() && kappa.is_finite()) {
        return DeathReason::NonFinite;
    }
    if phi > PHI_MAX {
        return DeathReason::PhiOverflow;
    }
    if kappa <= KAPPA_EPSILON {
        return DeathReason::KappaZero;
    }
    DeathReason::None
}

/// Clamp to `[0, 1]`. A NaN input maps to `0.0`.
// `f64::clamp` propagates NaN; `max`/`min` discard it.
#[allow(clippy::manual_clamp)]
fn clamp_unit(x: f64) -> f64 {
    x.max(0.0).min(1.0)
}
