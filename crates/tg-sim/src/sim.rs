//! The `Simulation` struct and its step loop.

use log::{debug, info};
use tg_core::{NodeId, SimConfig, Step, StepClock};
use tg_model::ModelTree;

use crate::{SimError, SimObserver, SimResult};

/// Where a simulation is in its `setup → {step}* → teardown` lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Built, tree not yet set up.
    Idle,
    /// `setup` has run; the tree is being stepped.
    Running,
    /// `teardown` has run; only the empty root remains.
    TornDown,
}

/// The simulation runner.
///
/// `Simulation<W>` owns a model tree, the root it drives, and the world
/// context handed to `setup`.  Each step:
///
/// 1. `on_step_start(step)`
/// 2. `tree.step(root, config.step_secs)` on every node, pre-order
/// 3. clock advance, then `on_step_end(step, elapsed_secs)`
/// 4. `on_snapshot` every `config.snapshot_interval_steps` steps
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation<W = ()> {
    /// Global configuration (timestep, run length, snapshot interval).
    pub config: SimConfig,

    /// Tracks the current step and maps it to simulated seconds.
    pub clock: StepClock,

    /// The model arena.  Read access is safe at any time; structural edits
    /// between steps are the caller's responsibility.
    pub tree: ModelTree<W>,

    /// Root of the model being simulated.
    pub root: NodeId,

    /// World context borrowed by `setup`.
    pub world: W,

    pub(crate) phase: Phase,
}

impl<W: 'static> Simulation<W> {
    // ── Public API ────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Set up, step until `config.end_step()`, then tear down.
    pub fn run<O: SimObserver<W>>(&mut self, observer: &mut O) -> SimResult<()> {
        self.ensure_setup(observer)?;
        info!(
            "running {} from {} to {} (dt = {} s)",
            self.root,
            self.clock.current_step,
            self.config.end_step(),
            self.config.step_secs
        );
        while self.clock.current_step < self.config.end_step() {
            self.step_once(observer)?;
        }
        self.teardown(observer)
    }

    /// Run exactly `n` steps from the current position (ignores `end_step`).
    ///
    /// Sets the tree up first if this is the first call.  Useful for tests
    /// and interactive stepping; finish with [`teardown`][Self::teardown].
    pub fn run_steps<O: SimObserver<W>>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        self.ensure_setup(observer)?;
        for _ in 0..n {
            self.step_once(observer)?;
        }
        Ok(())
    }

    /// Tear the model down and end the run.
    ///
    /// The root survives, empty, in `self.tree`.
    pub fn teardown<O: SimObserver<W>>(&mut self, observer: &mut O) -> SimResult<()> {
        if self.phase == Phase::TornDown {
            return Err(SimError::Finished(self.clock.current_step));
        }
        self.tree.teardown(self.root)?;
        self.phase = Phase::TornDown;
        observer.on_teardown(self.clock.current_step);
        info!("finished at {}", self.clock);
        Ok(())
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn ensure_setup<O: SimObserver<W>>(&mut self, observer: &mut O) -> SimResult<()> {
        match self.phase {
            Phase::Running => Ok(()),
            Phase::TornDown => Err(SimError::Finished(self.clock.current_step)),
            Phase::Idle => {
                self.tree.setup(self.root, &mut self.world)?;
                self.phase = Phase::Running;
                debug!("set up {} ({} nodes)", self.root, self.tree.len());
                observer.on_setup(&self.tree, self.root);
                Ok(())
            }
        }
    }

    fn step_once<O: SimObserver<W>>(&mut self, observer: &mut O) -> SimResult<Step> {
        let now = self.clock.current_step;
        observer.on_step_start(now);
        self.tree.step(self.root, self.config.step_secs)?;
        self.clock.advance();
        observer.on_step_end(now, self.clock.elapsed_secs());

        let interval = self.config.snapshot_interval_steps;
        if interval > 0 && now.0 % interval == 0 {
            observer.on_snapshot(now, &self.tree, self.root);
        }
        Ok(now)
    }
}
