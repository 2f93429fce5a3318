//! Sequential run loop with step bound and pacing.
//!
//! This module provides [`run`], which drives one [`GenesisCore`] until it
//! dies or the step bound is reached. Each iteration runs, in order:
//!
//! 1. pull one stimulus from the [`StimulusSource`],
//! 2. step the core,
//! 3. project diagnostics,
//! 4. append the snapshot to the [`TelemetrySink`],
//! 5. notify the [`StepCallback`],
//! 6. pace.
//!
//! Pacing happens strictly between steps and never touches computed
//! values, so the telemetry bytes are identical for any `pace_ms`.
//!
//! Exactly one record is written per executed step. The step that kills
//! the core writes the final record (with `"alive":false`); nothing is
//! written after the loop exits.

use std::time::Duration;

use genesis_core::GenesisCore;
use genesis_telemetry::{JsonlSink, TelemetryError, TelemetrySink};
use genesis_types::{DeathReason, DiagnosticSnapshot};
use genesis_world::{StimulusSource, WorldInterface};
use tracing::{debug, info, warn};

use crate::config::{GenesisConfig, RuntimeConfig};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The telemetry destination could not be prepared.
    #[error("telemetry error: {source}")]
    Telemetry {
        /// The underlying telemetry error.
        #[from]
        source: TelemetryError,
    },

    /// Writing a record failed. The step it describes has already been
    /// committed in the core and is not rolled back.
    #[error("telemetry sink failed at step {step}: {source}")]
    Sink {
        /// Step count of the core when the write failed.
        step: u64,
        /// The underlying telemetry error.
        source: TelemetryError,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The step bound was reached while the core was alive.
    MaxStepsReached,
    /// The core died.
    Died(DeathReason),
}

/// Result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunResult {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// Loop iterations performed by this run.
    pub steps_run: u64,
    /// Diagnostics at the end of the run.
    pub final_snapshot: DiagnosticSnapshot,
}

/// Step bound and inter-step delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    max_steps: u64,
    pace: Duration,
}

impl RunPolicy {
    /// Build a policy from a step bound and a delay in milliseconds.
    pub const fn new(max_steps: u64, pace_ms: u64) -> Self {
        Self {
            max_steps,
            pace: Duration::from_millis(pace_ms),
        }
    }

    /// Build a policy from the runtime configuration.
    pub const fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.max_steps, config.pace_ms)
    }

    /// Whether another step is allowed once the core's step index has
    /// reached `step`.
    pub const fn should_continue(&self, step: u64) -> bool {
        step < self.max_steps
    }

    /// Upper bound on executed steps.
    pub const fn max_steps(&self) -> u64 {
        self.max_steps
    }

    /// Inter-step delay.
    pub const fn pace_duration(&self) -> Duration {
        self.pace
    }

    /// Sleep for the configured delay. Returns immediately when it is zero.
    pub fn pace(&self) {
        if !self.pace.is_zero() {
            std::thread::sleep(self.pace);
        }
    }
}

/// Hook invoked after each executed step.
pub trait StepCallback {
    /// Called with the snapshot that was just written to telemetry.
    fn on_step(&mut self, snapshot: &DiagnosticSnapshot);
}

/// A callback that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _snapshot: &DiagnosticSnapshot) {}
}

/// Logs a progress line every `interval` steps.
#[derive(Debug, Clone, Copy)]
pub struct ProgressLogger {
    interval: u64,
}

impl ProgressLogger {
    /// Log every `interval` steps; 0 disables progress lines.
    pub const fn new(interval: u64) -> Self {
        Self { interval }
    }
}

impl StepCallback for ProgressLogger {
    fn on_step(&mut self, snapshot: &DiagnosticSnapshot) {
        if self.interval == 0 {
            return;
        }
        if snapshot.step.checked_rem(self.interval) == Some(0) {
            info!(
                step = snapshot.step,
                kappa = snapshot.kappa,
                phi = snapshot.phi,
                dmag = snapshot.dmag,
                mmag = snapshot.mmag,
                "Run progress"
            );
        }
    }
}

/// Drive `core` until it dies or its step index reaches the policy bound.
///
/// The bound applies to the core's step index, not to iterations of this
/// call: a core that already executed steps only runs the remainder.
///
/// # Errors
///
/// Returns [`RunnerError::Sink`] if the sink fails to write or flush. The
/// core keeps every step it already executed.
pub fn run(
    core: &mut GenesisCore,
    source: &mut dyn StimulusSource,
    sink: &mut dyn TelemetrySink,
    policy: &RunPolicy,
    callback: &mut dyn StepCallback,
) -> Result<RunResult, RunnerError> {
    let mut steps_run: u64 = 0;

    info!(
        max_steps = policy.max_steps(),
        pace_ms = u64::try_from(policy.pace_duration().as_millis()).unwrap_or(u64::MAX),
        start_step = core.step_count(),
        "Run starting"
    );

    while policy.should_continue(core.step_count()) && core.is_alive() {
        let stimulus = source.next_stimulus();
        let _ = core.step(stimulus);

        let snapshot = core.diagnostics();
        sink.emit(&snapshot).map_err(|source| RunnerError::Sink {
            step: snapshot.step,
            source,
        })?;
        callback.on_step(&snapshot);

        steps_run = steps_run.saturating_add(1);
        policy.pace();
    }

    sink.flush().map_err(|source| RunnerError::Sink {
        step: core.step_count(),
        source,
    })?;

    let end_reason = if core.is_alive() {
        RunEndReason::MaxStepsReached
    } else {
        RunEndReason::Died(core.death_reason())
    };

    debug!(steps_run, ?end_reason, "Run loop exited");

    Ok(RunResult {
        end_reason,
        steps_run,
        final_snapshot: core.diagnostics(),
    })
}

/// Assemble a core, a seeded world, and a file sink from `config`, then run.
///
/// # Errors
///
/// Returns [`RunnerError::Telemetry`] if the sink cannot be opened, or
/// [`RunnerError::Sink`] if a write fails mid-run.
pub fn run_configured(
    config: &GenesisConfig,
    callback: &mut dyn StepCallback,
) -> Result<RunResult, RunnerError> {
    let mut core = GenesisCore::new(&config.core.initial_conditions());
    let mut world = WorldInterface::new(&config.world);
    let mut sink = JsonlSink::open(&config.telemetry)?;
    let policy = RunPolicy::from_config(&config.runtime);

    info!(
        core_seed = config.core.seed,
        world_seed = config.world.seed,
        out_path = %config.telemetry.out_path.display(),
        "Simulation assembled"
    );

    run(&mut core, &mut world, &mut sink, &policy, callback)
}

/// Log the end of a run.
pub fn log_run_end(result: &RunResult) {
    let snap = &result.final_snapshot;
    match result.end_reason {
        RunEndReason::MaxStepsReached => info!(
            steps_run = result.steps_run,
            final_step = snap.step,
            kappa = snap.kappa,
            phi = snap.phi,
            mmag = snap.mmag,
            "Run ended: step bound reached"
        ),
        RunEndReason::Died(reason) => warn!(
            steps_run = result.steps_run,
            final_step = snap.step,
            reason = %reason,
            phi = snap.phi,
            mmag = snap.mmag,
            "Run ended: structural state died"
        ),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::panic)]
mod tests {
    use genesis_telemetry::MemorySink;
    use genesis_types::{InitialConditions, Stimulus};
    use genesis_world::{ScriptedStimulus, WorldConfig};

    use super::*;

    fn fresh_core() -> GenesisCore {
        GenesisCore::new(&InitialConditions { seed: 0 })
    }

    fn world(seed: u64) -> WorldInterface {
        WorldInterface::new(&WorldConfig { seed })
    }

    /// Fails every write after `ok_writes` successful ones.
    struct FailingSink {
        ok_writes: u64,
        inner: MemorySink,
    }

    impl TelemetrySink for FailingSink {
        fn emit(&mut self, snapshot: &DiagnosticSnapshot) -> Result<(), TelemetryError> {
            if self.inner.records_written() >= self.ok_writes {
                return Err(TelemetryError::Write {
                    source: std::io::Error::other("destination unwritable"),
                });
            }
            self.inner.emit(snapshot)
        }

        fn flush(&mut self) -> Result<(), TelemetryError> {
            Ok(())
        }
    }

    struct CountCallback {
        count: u64,
    }

    impl StepCallback for CountCallback {
        fn on_step(&mut self, _snapshot: &DiagnosticSnapshot) {
            self.count = self.count.saturating_add(1);
        }
    }

    #[test]
    fn bounded_by_max_steps() {
        let mut core = fresh_core();
        let mut sink = MemorySink::new();
        let result = run(
            &mut core,
            &mut world(1),
            &mut sink,
            &RunPolicy::new(5, 0),
            &mut NoOpCallback,
        )
        .unwrap();

        assert_eq!(result.end_reason, RunEndReason::MaxStepsReached);
        assert_eq!(result.steps_run, 5);
        assert_eq!(result.final_snapshot.step, 5);
        assert_eq!(sink.records_written(), 5);
    }

    #[test]
    fn bound_counts_steps_already_executed() {
        let mut core = fresh_core();
        let mut source = world(1);
        for _ in 0..5 {
            let _ = core.step(source.next_stimulus());
        }
        let mut sink = MemorySink::new();

        let result = run(
            &mut core,
            &mut source,
            &mut sink,
            &RunPolicy::new(10, 0),
            &mut NoOpCallback,
        )
        .unwrap();

        assert_eq!(result.end_reason, RunEndReason::MaxStepsReached);
        assert_eq!(result.steps_run, 5);
        assert_eq!(result.final_snapshot.step, 10);
        assert_eq!(core.step_count(), 10);
        assert_eq!(sink.records_written(), 5);

        let text = String::from_utf8(sink.into_bytes()).unwrap();
        assert!(text.lines().next().unwrap().starts_with("{\"step\":6,"));
    }

    #[test]
    fn core_at_bound_runs_nothing() {
        let mut core = fresh_core();
        let mut source = world(1);
        for _ in 0..3 {
            let _ = core.step(source.next_stimulus());
        }
        let mut sink = MemorySink::new();

        let result = run(
            &mut core,
            &mut source,
            &mut sink,
            &RunPolicy::new(3, 0),
            &mut NoOpCallback,
        )
        .unwrap();

        assert_eq!(result.steps_run, 0);
        assert_eq!(result.end_reason, RunEndReason::MaxStepsReached);
        assert_eq!(core.step_count(), 3);
        assert_eq!(sink.records_written(), 0);
    }

    #[test]
    fn zero_max_steps_runs_nothing() {
        let mut core = fresh_core();
        let mut sink = MemorySink::new();
        let result = run(
            &mut core,
            &mut world(1),
            &mut sink,
            &RunPolicy::new(0, 0),
            &mut NoOpCallback,
        )
        .unwrap();

        assert_eq!(result.steps_run, 0);
        assert_eq!(result.final_snapshot.step, 0);
        assert!(sink.as_bytes().is_empty());
    }

    #[test]
    fn death_stops_the_loop_with_one_final_record() {
        let mut core = fresh_core();
        let mut source = ScriptedStimulus::new(vec![
            Stimulus::new(0.5, 0.1),
            Stimulus::new(0.5, 0.1),
            Stimulus::new(f64::INFINITY, 0.0),
        ])
        .unwrap();
        let mut sink = MemorySink::new();

        let result = run(
            &mut core,
            &mut source,
            &mut sink,
            &RunPolicy::new(100, 0),
            &mut NoOpCallback,
        )
        .unwrap();

        assert_eq!(result.end_reason, RunEndReason::Died(DeathReason::NonFinite));
        assert_eq!(result.steps_run, 3);
        assert_eq!(sink.records_written(), 3);

        let text = String::from_utf8(sink.into_bytes()).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.contains("\"alive\":false"));
        assert!(last.contains("\"death_reason\":1"));
        assert!(last.contains("\"kappa\":0.0"));
    }

    #[test]
    fn already_dead_core_runs_nothing() {
        let mut core = fresh_core();
        let _ = core.step(Stimulus::new(f64::NAN, 0.0));
        let mut sink = MemorySink::new();

        let result = run(
            &mut core,
            &mut world(1),
            &mut sink,
            &RunPolicy::new(10, 0),
            &mut NoOpCallback,
        )
        .unwrap();

        assert_eq!(result.steps_run, 0);
        assert_eq!(result.end_reason, RunEndReason::Died(DeathReason::NonFinite));
        assert_eq!(sink.records_written(), 0);
    }

    #[test]
    fn sink_failure_propagates_without_rollback() {
        let mut core = fresh_core();
        let mut sink = FailingSink {
            ok_writes: 3,
            inner: MemorySink::new(),
        };

        let err = run(
            &mut core,
            &mut world(1),
            &mut sink,
            &RunPolicy::new(10, 0),
            &mut NoOpCallback,
        )
        .unwrap_err();

        match err {
            RunnerError::Sink { step, .. } => assert_eq!(step, 4),
            RunnerError::Telemetry { .. } => panic!("expected a sink error"),
        }
        // The fourth step committed even though its record was lost.
        assert_eq!(core.step_count(), 4);
        assert!(core.is_alive());
        assert_eq!(sink.inner.records_written(), 3);
    }

    #[test]
    fn callback_sees_every_step() {
        let mut core = fresh_core();
        let mut sink = MemorySink::new();
        let mut cb = CountCallback { count: 0 };

        let _ = run(
            &mut core,
            &mut world(1),
            &mut sink,
            &RunPolicy::new(7, 0),
            &mut cb,
        )
        .unwrap();

        assert_eq!(cb.count, 7);
    }

    #[test]
    fn policy_bounds_and_pace() {
        let policy = RunPolicy::new(3, 0);
        assert!(policy.should_continue(2));
        assert!(!policy.should_continue(3));
        assert!(policy.pace_duration().is_zero());

        let paced = RunPolicy::from_config(&RuntimeConfig {
            max_steps: 1,
            pace_ms: 2,
            progress_interval: 0,
        });
        assert_eq!(paced.pace_duration(), Duration::from_millis(2));
    }

    #[test]
    fn progress_logger_tolerates_zero_interval() {
        let mut logger = ProgressLogger::new(0);
        let mut core = fresh_core();
        let _ = core.step(Stimulus::new(0.1, 0.2));
        logger.on_step(&core.diagnostics());
    }
}
