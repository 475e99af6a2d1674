//! Markers: points of interest (e.g. sensor probes) fixed to a body.

use crate::Vec3;

/// A point of interest attached to a model node.
///
/// Markers are plain `Copy` values.  The model tree stores them by value in
/// insertion order and never inspects their fields; only sensing and
/// rendering consumers interpret them.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Marker {
    /// Position relative to the owning body's frame.
    pub offset: Vec3,
    /// RGB color in `[0, 1]`, used by renderers.
    pub color: Vec3,
    /// Index of the body node the marker tracks; negative when unassigned.
    pub node_number: i32,
}

impl Marker {
    #[inline]
    pub fn new(offset: Vec3, color: Vec3, node_number: i32) -> Self {
        Self { offset, color, node_number }
    }
}
