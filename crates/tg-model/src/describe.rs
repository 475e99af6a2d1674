//! Indented diagnostic dump of a subtree.
//!
//! ```text
//! Model(
//!   Children:
//!   Rod(
//!     Children:
//!     Tags: [rod]
//!   )
//!   Tags: [robot]
//! )
//! ```
//!
//! Debugging aid only — the layout may change and must not be parsed.

use std::fmt;

use tg_core::{NodeId, TgResult};

use crate::{ModelTree, NodeRef};

const INDENT: &str = "  ";

/// `Display` adapter that renders a node and its subtree at a given prefix.
pub struct Describe<'a, W = ()> {
    node:   NodeRef<'a, W>,
    prefix: &'a str,
}

impl<'a, W> Describe<'a, W> {
    pub fn new(node: NodeRef<'a, W>, prefix: &'a str) -> Self {
        Self { node, prefix }
    }
}

impl<W: 'static> fmt::Display for Describe<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.prefix;
        let inner = format!("{p}{INDENT}");

        writeln!(f, "{p}{}(", self.node.kind())?;
        writeln!(f, "{inner}Children:")?;
        for child in self.node.child_nodes() {
            writeln!(f, "{}", Describe::new(child, &inner))?;
        }
        writeln!(f, "{inner}Tags: [{}]", self.node.tags())?;
        write!(f, "{p})")
    }
}

impl<W: 'static> ModelTree<W> {
    /// Render `id`'s subtree as indented text, each line starting with `prefix`.
    pub fn describe(&self, id: NodeId, prefix: &str) -> TgResult<String> {
        Ok(Describe::new(self.node(id)?, prefix).to_string())
    }
}
