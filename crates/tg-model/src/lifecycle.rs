//! Lifecycle walks: `setup → {step}* → teardown`, plus `destroy`.
//!
//! All walks visit children in insertion order.  Hooks run pre-order for
//! `setup` and `step` and post-order for `teardown`; see
//! [`NodeBehavior`][crate::NodeBehavior] for the exact contract.

use log::{debug, trace};
use tg_core::{NodeId, TgError, TgResult};

use crate::ModelTree;

impl<W: 'static> ModelTree<W> {
    /// Set up `id` and its whole subtree against a borrowed world context.
    ///
    /// Not idempotency-checked: callers sequence `setup` once per run.
    pub fn setup(&mut self, id: NodeId, world: &mut W) -> TgResult<()> {
        self.slot(id)?;
        debug!("setup {id}");
        self.setup_node(id, world);
        Ok(())
    }

    fn setup_node(&mut self, id: NodeId, world: &mut W) {
        self.expect_slot_mut(id).behavior.on_setup(world);
        let mut i = 0;
        while let Some(&child) = self.expect_slot(id).children.get(i) {
            self.setup_node(child, world);
            i += 1;
        }
    }

    /// Advance `id` and every descendant by `dt` seconds.
    ///
    /// Each node is stepped exactly once, in the same pre-order as
    /// [`descendants`][Self::descendants] with `id` first.
    ///
    /// # Errors
    /// `NonPositiveStep` if `dt` is not strictly positive (NaN included); no
    /// node is stepped in that case.
    pub fn step(&mut self, id: NodeId, dt: f64) -> TgResult<()> {
        if !(dt > 0.0) {
            return Err(TgError::NonPositiveStep(dt));
        }
        self.slot(id)?;
        trace!("step {id} by {dt}");
        self.step_node(id, dt);
        Ok(())
    }

    fn step_node(&mut self, id: NodeId, dt: f64) {
        self.expect_slot_mut(id).behavior.on_step(dt);
        let mut i = 0;
        while let Some(&child) = self.expect_slot(id).children.get(i) {
            self.step_node(child, dt);
            i += 1;
        }
    }

    /// Tear down and free every descendant of `id`, then clear its markers.
    ///
    /// `id` itself stays live, with no children and no markers, and can be
    /// reused as an empty node.  Returns nothing; freed handles become stale.
    pub fn teardown(&mut self, id: NodeId) -> TgResult<()> {
        self.slot(id)?;
        let before = self.live;
        self.teardown_node(id);
        debug!("teardown {id}: freed {} descendants", before - self.live);

        debug_assert!(self.invariant());
        debug_assert!(self.expect_slot(id).children.is_empty());
        debug_assert!(self.expect_slot(id).markers.is_empty());
        Ok(())
    }

    fn teardown_node(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.expect_slot_mut(id).children);
        for child in children {
            self.teardown_node(child);
            self.free(child);
        }
        let slot = self.expect_slot_mut(id);
        slot.markers.clear();
        slot.behavior.on_teardown();
    }

    /// Free a root and its whole subtree without running teardown hooks.
    ///
    /// This is the arena's equivalent of dropping an owned tree.
    ///
    /// # Errors
    /// `StillAttached` if `root` has a parent; only owners destroy nodes.
    pub fn destroy(&mut self, root: NodeId) -> TgResult<()> {
        if self.slot(root)?.parent.is_some() {
            return Err(TgError::StillAttached(root));
        }
        let mut doomed = vec![root];
        self.collect_descendants(root, &mut doomed);
        for &id in &doomed {
            self.free(id);
        }
        debug!("destroyed {root} and {} descendants", doomed.len() - 1);

        debug_assert!(self.invariant());
        Ok(())
    }
}
