//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Step` counter.  Every
//! step advances the physics by the same fixed timestep held in `StepClock`:
//!
//!   elapsed_secs = current_step * step_secs
//!
//! Counting integer steps instead of accumulating `f64` seconds keeps the
//! run length exact; only the elapsed-time readout is floating point.

use std::fmt;

use crate::{TgError, TgResult};

// ── Step ──────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── StepClock ─────────────────────────────────────────────────────────────────

/// Tracks the current step and converts it to simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepClock {
    /// Simulated seconds per step.
    pub step_secs: f64,
    /// The current step — advanced by `StepClock::advance()` each iteration.
    pub current_step: Step,
}

impl StepClock {
    pub fn new(step_secs: f64) -> Self {
        Self { step_secs, current_step: Step::ZERO }
    }

    /// Advance the clock by one step.
    #[inline]
    pub fn advance(&mut self) {
        self.current_step = self.current_step + 1;
    }

    /// Elapsed simulated seconds since step 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_step.0 as f64 * self.step_secs
    }
}

impl fmt::Display for StepClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.3} s)", self.current_step, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a TOML/JSON file by the application crate and passed
/// to the simulation runner.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Fixed physics timestep in seconds.  Must be positive and finite.
    /// Typical tensegrity runs use 1/1000 s.
    pub step_secs: f64,

    /// Total steps to simulate.
    pub total_steps: u64,

    /// Notify `on_snapshot` every N steps.  0 disables snapshots.
    pub snapshot_interval_steps: u64,
}

impl SimConfig {
    /// The step at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }

    /// Construct a `StepClock` pre-configured for this run.
    pub fn make_clock(&self) -> StepClock {
        StepClock::new(self.step_secs)
    }

    /// Reject timesteps the model tree would refuse at the first `step`.
    pub fn validate(&self) -> TgResult<()> {
        if !self.step_secs.is_finite() || self.step_secs <= 0.0 {
            return Err(TgError::Config(format!(
                "step_secs must be positive and finite, got {}",
                self.step_secs
            )));
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_secs:               0.001,
            total_steps:             1_000,
            snapshot_interval_steps: 0,
        }
    }
}
