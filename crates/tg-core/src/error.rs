//! Framework error type.
//!
//! Every variant is a caller-precondition violation: the offending call is
//! rejected before any mutation, so the caller can fix the call site and
//! carry on.  Internal consistency failures are not represented here; they
//! panic (see `ModelTree::invariant` in tg-model).

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `tg-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TgError {
    #[error("child is the empty node handle")]
    NullChild,

    #[error("cannot attach {0} to itself")]
    SelfChild(NodeId),

    #[error("attaching {child} under {parent} would create a cycle")]
    CyclicChild { parent: NodeId, child: NodeId },

    #[error("{child} is already owned by {parent}")]
    AlreadyAttached { child: NodeId, parent: NodeId },

    #[error("{0} is still attached to a parent")]
    StillAttached(NodeId),

    #[error("step size must be positive, got {0}")]
    NonPositiveStep(f64),

    #[error("{0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `tg-*` crates.
pub type TgResult<T> = Result<T, TgError>;
