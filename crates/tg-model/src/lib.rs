//! `tg-model` — the composite model tree.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`tree`]        | `ModelTree<W>` arena: creation, attach, enumeration, tag query |
//! | [`lifecycle`]   | `setup`, `step`, `teardown`, `destroy`                        |
//! | [`node`]        | `NodeRef<'a, W>` — read-only view of one node                 |
//! | [`behavior`]    | `NodeBehavior<W>` trait — per-kind setup/step/teardown hooks  |
//! | [`inert`]       | `Inert` — the base kind, which does nothing on its own        |
//! | [`visitor`]     | `ModelVisitor<W>` trait and pre-order `visit`                 |
//! | [`senseable`]   | `SenseableRef` — nodes and markers exposed uniformly          |
//! | [`describe`]    | Indented diagnostic dump                                      |
//!
//! # Design notes
//!
//! Nodes live in a single arena and are addressed by [`NodeId`] handles.  A
//! node is owned by at most one parent; parentless nodes are roots owned by
//! the caller through the tree.  `attach_child` rejects every call that would
//! break this shape, so recursive walks (lifecycle, visit, enumeration) never
//! need reference counting or visited-sets.
//!
//! `W` is the world context forwarded unexamined through `setup`.  Trees that
//! never need one use the default `W = ()`.
//!
//! ```rust
//! use tg_core::{Marker, Tags};
//! use tg_model::ModelTree;
//!
//! let mut tree: ModelTree = ModelTree::new();
//! let root = tree.create("spine");
//! let a = tree.create("vertebra A");
//! let b = tree.create("vertebra B");
//! tree.attach_child(root, a)?;
//! tree.attach_child(root, b)?;
//! tree.add_marker(root, Marker::default())?;
//!
//! assert_eq!(tree.descendants(root)?, vec![a, b]);
//! assert_eq!(tree.senseable_descendants(root)?.len(), 3);
//! assert_eq!(tree.find(root, &Tags::from("B"))?, vec![b]);
//! # Ok::<(), tg_core::TgError>(())
//! ```

pub mod behavior;
pub mod describe;
pub mod inert;
pub mod lifecycle;
pub mod node;
pub mod senseable;
pub mod tree;
pub mod visitor;

#[cfg(test)]
mod tests;

pub use behavior::{AsAny, NodeBehavior};
pub use describe::Describe;
pub use inert::Inert;
pub use node::NodeRef;
pub use senseable::SenseableRef;
pub use tree::ModelTree;
pub use visitor::ModelVisitor;

pub use tg_core::{Marker, NodeId, Tags, TgError, TgResult};
