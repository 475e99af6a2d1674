//! Senseable bridge: nodes and markers under one type for sensing consumers.

use log::debug;
use tg_core::{Marker, NodeId, TgResult};

use crate::{ModelTree, NodeRef};

/// Anything a sensor can be attached to: a model node or a marker.
pub enum SenseableRef<'a, W = ()> {
    Node(NodeRef<'a, W>),
    Marker(&'a Marker),
}

impl<'a, W: 'static> SenseableRef<'a, W> {
    pub fn as_node(&self) -> Option<NodeRef<'a, W>> {
        match self {
            SenseableRef::Node(n) => Some(*n),
            SenseableRef::Marker(_) => None,
        }
    }

    pub fn as_marker(&self) -> Option<&'a Marker> {
        match self {
            SenseableRef::Node(_) => None,
            SenseableRef::Marker(m) => Some(*m),
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, SenseableRef::Node(_))
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, SenseableRef::Marker(_))
    }

    /// Recurse into this senseable.  Markers have nothing below them.
    pub fn senseable_descendants(&self) -> Vec<SenseableRef<'a, W>> {
        match self {
            SenseableRef::Node(n) => n.senseable_descendants(),
            SenseableRef::Marker(_) => Vec::new(),
        }
    }
}

impl<W> Clone for SenseableRef<'_, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for SenseableRef<'_, W> {}

impl<W: 'static> std::fmt::Debug for SenseableRef<'_, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SenseableRef::Node(n) => f.debug_tuple("Node").field(&n.id()).finish(),
            SenseableRef::Marker(m) => f.debug_tuple("Marker").field(m).finish(),
        }
    }
}

impl<W: 'static> ModelTree<W> {
    /// Every strict descendant of `id` (pre-order), then `id`'s own markers.
    ///
    /// Only the markers held directly by `id` are included; markers held by
    /// descendants are reached by recursing into their `SenseableRef::Node`.
    pub fn senseable_descendants(&self, id: NodeId) -> TgResult<Vec<SenseableRef<'_, W>>> {
        let node = self.node(id)?;
        Ok(self.senseables_of(node))
    }

    pub(crate) fn senseables_of<'a>(&'a self, node: NodeRef<'a, W>) -> Vec<SenseableRef<'a, W>> {
        let descendants = node.descendants();
        let markers = node.markers();

        let mut out = Vec::with_capacity(descendants.len() + markers.len());
        out.extend(
            descendants
                .iter()
                .map(|&d| SenseableRef::Node(NodeRef::new(self, d, self.expect_slot(d)))),
        );
        out.extend(markers.iter().map(SenseableRef::Marker));

        debug!(
            "{}: {} senseables ({} nodes, {} markers)",
            node.id(),
            out.len(),
            descendants.len(),
            markers.len()
        );
        out
    }
}
