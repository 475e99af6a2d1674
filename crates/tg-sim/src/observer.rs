//! Simulation observer trait for progress reporting, rendering, and logging.

use log::warn;
use tg_core::{NodeId, Step};
use tg_model::{ModelTree, ModelVisitor};

/// Callbacks invoked by [`Simulation`][crate::Simulation] at key points in
/// the run.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress { interval: u64 }
///
/// impl SimObserver for Progress {
///     fn on_step_end(&mut self, step: Step, elapsed_secs: f64) {
///         if step.0 % self.interval == 0 {
///             log::info!("{step}: {elapsed_secs:.2} s simulated");
///         }
///     }
/// }
/// ```
pub trait SimObserver<W = ()> {
    /// Called once after the model tree has been set up.
    fn on_setup(&mut self, _tree: &ModelTree<W>, _root: NodeId) {}

    /// Called before the tree is stepped.
    fn on_step_start(&mut self, _step: Step) {}

    /// Called after the tree has been stepped; `elapsed_secs` includes this step.
    fn on_step_end(&mut self, _step: Step, _elapsed_secs: f64) {}

    /// Called every `config.snapshot_interval_steps` steps with read-only
    /// access to the whole tree, so renderers and sensors can walk it.
    fn on_snapshot(&mut self, _step: Step, _tree: &ModelTree<W>, _root: NodeId) {}

    /// Called once after the tree has been torn down.
    fn on_teardown(&mut self, _final_step: Step) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl<W> SimObserver<W> for NoopObserver {}

/// Runs a [`ModelVisitor`] over the whole tree at every snapshot.
pub struct RenderObserver<V> {
    pub visitor: V,
    /// Number of snapshots rendered so far.
    pub frames: u64,
}

impl<V> RenderObserver<V> {
    pub fn new(visitor: V) -> Self {
        Self { visitor, frames: 0 }
    }
}

impl<W: 'static, V: ModelVisitor<W>> SimObserver<W> for RenderObserver<V> {
    fn on_snapshot(&mut self, step: Step, tree: &ModelTree<W>, root: NodeId) {
        match tree.visit(root, &mut self.visitor) {
            Ok(()) => self.frames += 1,
            Err(e) => warn!("render at {step} skipped: {e}"),
        }
    }
}
