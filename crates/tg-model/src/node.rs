//! `NodeRef` — a borrowed, read-only view of one node.

use std::fmt;

use tg_core::{Marker, NodeId, Tags};

use crate::tree::Slot;
use crate::{Describe, ModelTree, NodeBehavior, SenseableRef};

/// Read-only view of a live node.
///
/// Handed to visitors and sensing consumers.  It borrows the whole tree, so
/// no structural mutation can happen while any `NodeRef` is alive.
pub struct NodeRef<'a, W = ()> {
    tree: &'a ModelTree<W>,
    id:   NodeId,
    slot: &'a Slot<W>,
}

impl<'a, W: 'static> NodeRef<'a, W> {
    #[inline]
    pub(crate) fn new(tree: &'a ModelTree<W>, id: NodeId, slot: &'a Slot<W>) -> Self {
        Self { tree, id, slot }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Kind name reported by the node's behavior.
    pub fn kind(&self) -> &'a str {
        self.slot.behavior.kind()
    }

    pub fn tags(&self) -> &'a Tags {
        &self.slot.tags
    }

    pub fn markers(&self) -> &'a [Marker] {
        &self.slot.markers
    }

    pub fn children(&self) -> &'a [NodeId] {
        &self.slot.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.slot.parent
    }

    pub fn behavior(&self) -> &'a dyn NodeBehavior<W> {
        &*self.slot.behavior
    }

    /// Downcast the behavior to its concrete kind.
    pub fn behavior_as<T: NodeBehavior<W>>(&self) -> Option<&'a T> {
        (*self.slot.behavior).as_any().downcast_ref::<T>()
    }

    pub fn tree(&self) -> &'a ModelTree<W> {
        self.tree
    }

    /// Views of the direct children, in insertion order.
    pub fn child_nodes(self) -> impl Iterator<Item = NodeRef<'a, W>> {
        let tree = self.tree;
        self.slot
            .children
            .iter()
            .map(move |&c| NodeRef::new(tree, c, tree.expect_slot(c)))
    }

    /// See [`ModelTree::descendants`].
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.tree.collect_descendants(self.id, &mut out);
        out
    }

    /// See [`ModelTree::senseable_descendants`].
    pub fn senseable_descendants(&self) -> Vec<SenseableRef<'a, W>> {
        self.tree.senseables_of(*self)
    }

    /// Indented dump starting at `prefix`; see [`Describe`].
    pub fn describe(self, prefix: &'a str) -> Describe<'a, W> {
        Describe::new(self, prefix)
    }
}

impl<W> Clone for NodeRef<'_, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for NodeRef<'_, W> {}

impl<W> PartialEq for NodeRef<'_, W> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl<W: 'static> fmt::Debug for NodeRef<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("tags", &self.slot.tags)
            .finish()
    }
}

impl<W: 'static> fmt::Display for NodeRef<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Describe::new(*self, ""), f)
    }
}
