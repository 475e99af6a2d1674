//! Builder for constructing a [`Simulation`].

use tg_core::{NodeId, SimConfig, TgError};
use tg_model::ModelTree;

use crate::sim::Phase;
use crate::{SimError, SimResult, Simulation};

/// Builder for [`Simulation<W>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — timestep, total steps, snapshot interval
/// - [`ModelTree<W>`] — the assembled model arena
/// - `root` — the parentless node to drive
/// - `world: W` — the context forwarded through `setup`
///
/// # Example
///
/// ```rust,ignore
/// let mut tree = ModelTree::new();
/// let robot = tree.create("robot");
/// // ... attach bodies ...
/// let mut sim = SimBuilder::new(config, tree, robot, ()).build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<W> {
    config: SimConfig,
    tree:   ModelTree<W>,
    root:   NodeId,
    world:  W,
}

impl<W: 'static> SimBuilder<W> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, tree: ModelTree<W>, root: NodeId, world: W) -> Self {
        Self { config, tree, root, world }
    }

    /// Validate inputs and return a ready-to-run [`Simulation`].
    pub fn build(self) -> SimResult<Simulation<W>> {
        self.config
            .validate()
            .map_err(|e| match e {
                TgError::Config(msg) => SimError::Config(msg),
                other => SimError::Model(other),
            })?;

        if let Some(parent) = self.tree.parent(self.root)? {
            return Err(SimError::Config(format!(
                "{} is owned by {parent}; simulate its root instead",
                self.root
            )));
        }

        Ok(Simulation {
            clock:  self.config.make_clock(),
            config: self.config,
            tree:   self.tree,
            root:   self.root,
            world:  self.world,
            phase:  Phase::Idle,
        })
    }
}
