//! `ModelTree` — arena storage for model nodes and their structural API.
//!
//! # Layout
//!
//! Every node is one `Slot` in `slots`; its [`NodeId`] is the slot index.
//! Freed slots become `None` and are never handed out again, so a handle
//! that outlives its node reports [`TgError::NodeNotFound`] instead of
//! silently aliasing a newer node.
//!
//! # Shape
//!
//! Each slot records its children (ordered) and its parent (back-link).
//! [`ModelTree::attach_child`] is the only operation that links nodes, and it
//! refuses any link that would give a node two parents or close a loop, so
//! the arena always holds a forest.

use log::debug;
use rustc_hash::FxHashSet;
use tg_core::{Marker, NodeId, Tags, TgError, TgResult};

use crate::{Inert, NodeBehavior, NodeRef};

// ── Slot ──────────────────────────────────────────────────────────────────────

/// Storage for one live node.
pub(crate) struct Slot<W> {
    pub(crate) parent:   Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) markers:  Vec<Marker>,
    pub(crate) tags:     Tags,
    pub(crate) behavior: Box<dyn NodeBehavior<W>>,
}

// ── ModelTree ─────────────────────────────────────────────────────────────────

/// Arena owning every model node of one or more trees.
///
/// Dropping the arena drops every node it holds; no teardown hooks run.
pub struct ModelTree<W = ()> {
    slots: Vec<Option<Slot<W>>>,
    /// Number of `Some` entries in `slots`.
    pub(crate) live: usize,
}

impl<W> Default for ModelTree<W> {
    fn default() -> Self {
        Self { slots: Vec::new(), live: 0 }
    }
}

impl<W: 'static> ModelTree<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    // ── Creation ──────────────────────────────────────────────────────────

    /// Create a standalone [`Inert`] node.
    pub fn create(&mut self, tags: impl Into<Tags>) -> NodeId {
        self.create_with(tags, Inert)
    }

    /// Create a standalone node of a custom kind.
    ///
    /// The node is a root until it is passed to [`attach_child`][Self::attach_child].
    pub fn create_with(
        &mut self,
        tags:     impl Into<Tags>,
        behavior: impl NodeBehavior<W>,
    ) -> NodeId {
        let id = handle_for_slot(self.slots.len());
        self.slots.push(Some(Slot {
            parent:   None,
            children: Vec::new(),
            markers:  Vec::new(),
            tags:     tags.into(),
            behavior: Box::new(behavior),
        }));
        self.live += 1;
        debug_assert!(self.invariant());
        id
    }

    // ── Structural mutation ───────────────────────────────────────────────

    /// Append `child` to `parent`'s children, transferring ownership.
    ///
    /// # Errors
    ///
    /// Checked in this order; the tree is untouched on any error.
    ///
    /// | Condition                                     | Error             |
    /// |-----------------------------------------------|-------------------|
    /// | `parent` is not live                          | `NodeNotFound`    |
    /// | `child` is `NodeId::INVALID`                  | `NullChild`       |
    /// | `child` is not live                           | `NodeNotFound`    |
    /// | `child == parent`                             | `SelfChild`       |
    /// | `child` is a descendant or ancestor of `parent` | `CyclicChild`   |
    /// | `child` already has another parent            | `AlreadyAttached` |
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> TgResult<()> {
        self.slot(parent)?;
        if !child.is_valid() {
            return Err(TgError::NullChild);
        }
        let child_parent = self.slot(child)?.parent;
        if child == parent {
            return Err(TgError::SelfChild(child));
        }
        if self.descendants(parent)?.contains(&child) || self.is_ancestor(child, parent) {
            return Err(TgError::CyclicChild { parent, child });
        }
        if let Some(owner) = child_parent {
            return Err(TgError::AlreadyAttached { child, parent: owner });
        }

        self.expect_slot_mut(child).parent = Some(parent);
        self.expect_slot_mut(parent).children.push(child);
        debug!("attached {child} under {parent}");

        debug_assert!(self.invariant());
        debug_assert_eq!(
            self.expect_slot(parent).children.iter().filter(|&&c| c == child).count(),
            1
        );
        Ok(())
    }

    /// Append a copy of `marker` to the node's own marker list.
    pub fn add_marker(&mut self, id: NodeId, marker: Marker) -> TgResult<()> {
        self.slot_mut(id)?.markers.push(marker);
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Read-only view of one node.
    pub fn node(&self, id: NodeId) -> TgResult<NodeRef<'_, W>> {
        let slot = self.slot(id)?;
        Ok(NodeRef::new(self, id, slot))
    }

    pub fn children(&self, id: NodeId) -> TgResult<&[NodeId]> {
        Ok(&self.slot(id)?.children)
    }

    pub fn parent(&self, id: NodeId) -> TgResult<Option<NodeId>> {
        Ok(self.slot(id)?.parent)
    }

    /// The node's own markers (not its descendants').
    pub fn markers(&self, id: NodeId) -> TgResult<&[Marker]> {
        Ok(&self.slot(id)?.markers)
    }

    pub fn tags(&self, id: NodeId) -> TgResult<&Tags> {
        Ok(&self.slot(id)?.tags)
    }

    pub fn tags_mut(&mut self, id: NodeId) -> TgResult<&mut Tags> {
        Ok(&mut self.slot_mut(id)?.tags)
    }

    /// Downcast the node's behavior to its concrete kind.
    ///
    /// Returns `Ok(None)` if the node is live but of a different kind.
    pub fn behavior<T: NodeBehavior<W>>(&self, id: NodeId) -> TgResult<Option<&T>> {
        Ok((*self.slot(id)?.behavior).as_any().downcast_ref::<T>())
    }

    pub fn behavior_mut<T: NodeBehavior<W>>(&mut self, id: NodeId) -> TgResult<Option<&mut T>> {
        Ok((*self.slot_mut(id)?.behavior).as_any_mut().downcast_mut::<T>())
    }

    /// Every live node without a parent, in creation order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Some(s) if s.parent.is_none() => Some(NodeId(i as u32)),
            _ => None,
        })
    }

    // ── Enumeration ───────────────────────────────────────────────────────

    /// Pre-order flattening of every strict descendant of `id`.
    ///
    /// For each child in insertion order: the child, then its own
    /// descendants.  A fresh `Vec` is built on every call.
    pub fn descendants(&self, id: NodeId) -> TgResult<Vec<NodeId>> {
        self.slot(id)?;
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        Ok(out)
    }

    /// Strict descendants of `id` (pre-order) carrying every tag in `query`.
    pub fn find(&self, id: NodeId, query: &Tags) -> TgResult<Vec<NodeId>> {
        Ok(self
            .descendants(id)?
            .into_iter()
            .filter(|&d| self.expect_slot(d).tags.contains_all(query))
            .collect())
    }

    pub(crate) fn collect_descendants(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in &self.expect_slot(id).children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// `true` if `candidate` lies on the parent chain above `id`.
    fn is_ancestor(&self, candidate: NodeId, id: NodeId) -> bool {
        let mut cur = self.expect_slot(id).parent;
        while let Some(p) = cur {
            if p == candidate {
                return true;
            }
            cur = self.expect_slot(p).parent;
        }
        false
    }

    // ── Invariant ─────────────────────────────────────────────────────────

    /// Full structural self-check of the arena.
    ///
    /// Verifies that every child handle is live, that no node is listed as a
    /// child twice, that parent and child links agree, that the live count
    /// matches, and that every parent chain ends at a root.  Runs under
    /// `debug_assert!` after each mutating operation.
    pub fn invariant(&self) -> bool {
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut live = 0;

        for (i, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            let id = NodeId(i as u32);
            live += 1;

            for &child in &slot.children {
                if !child.is_valid() || child == id || !seen.insert(child) {
                    return false;
                }
                match self.get(child) {
                    Some(c) if c.parent == Some(id) => {}
                    _ => return false,
                }
            }
            if let Some(p) = slot.parent {
                match self.get(p) {
                    Some(ps) if ps.children.contains(&id) => {}
                    _ => return false,
                }
            }
        }
        if live != self.live {
            return false;
        }

        // A chain longer than the live count must revisit a node.
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            let mut hops = 0;
            let mut cur = slot.parent;
            while let Some(p) = cur {
                hops += 1;
                if hops > live || p.index() == i {
                    return false;
                }
                cur = self.get(p).and_then(|s| s.parent);
            }
        }
        true
    }

    // ── Slot access ───────────────────────────────────────────────────────

    #[inline]
    fn get(&self, id: NodeId) -> Option<&Slot<W>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn slot(&self, id: NodeId) -> TgResult<&Slot<W>> {
        self.get(id).ok_or(TgError::NodeNotFound(id))
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, id: NodeId) -> TgResult<&mut Slot<W>> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(TgError::NodeNotFound(id))
    }

    /// Slot lookup for handles reached through the tree's own links.
    ///
    /// # Panics
    /// A dangling link means the arena is corrupt; that is fatal.
    #[inline]
    pub(crate) fn expect_slot(&self, id: NodeId) -> &Slot<W> {
        match self.get(id) {
            Some(slot) => slot,
            None => panic!("model tree corrupt: dangling link to {id}"),
        }
    }

    #[inline]
    pub(crate) fn expect_slot_mut(&mut self, id: NodeId) -> &mut Slot<W> {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(slot) => slot,
            None => panic!("model tree corrupt: dangling link to {id}"),
        }
    }

    /// Drop a slot's contents.  Caller keeps links consistent.
    pub(crate) fn free(&mut self, id: NodeId) {
        if self.slots[id.index()].take().is_some() {
            self.live -= 1;
        }
    }
}

/// Handle for the slot at `index`.  Panics once the `u32` handle space (minus
/// the `INVALID` sentinel) is used up.
pub(crate) fn handle_for_slot(index: usize) -> NodeId {
    match NodeId::try_from(index) {
        Ok(id) if id.is_valid() => id,
        _ => panic!("ModelTree node handles exhausted after {index} nodes"),
    }
}
