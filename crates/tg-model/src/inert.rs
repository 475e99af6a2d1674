//! The base node kind — it has no physics of its own.

use crate::NodeBehavior;

/// A [`NodeBehavior`] whose hooks all do nothing.
///
/// Used for grouping nodes (a whole robot, a spine, a vertebra) whose only
/// job is to own children, markers, and tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct Inert;

impl<W> NodeBehavior<W> for Inert {}
