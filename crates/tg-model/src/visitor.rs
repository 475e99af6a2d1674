//! Visitor dispatch over a subtree.

use tg_core::{NodeId, TgResult};

use crate::{ModelTree, NodeRef};

/// An external consumer (renderer, logger, exporter) applied to each node.
///
/// `render` receives a [`NodeRef`], so a visitor can read but never reshape
/// the tree.  Closures taking a `NodeRef` are visitors too.
///
/// # Example — count rods
///
/// ```rust
/// use tg_model::{ModelTree, NodeRef};
///
/// let mut tree: ModelTree = ModelTree::new();
/// let root = tree.create("robot");
/// let rod = tree.create("rod");
/// tree.attach_child(root, rod)?;
///
/// let mut rods = 0;
/// tree.visit(root, &mut |n: NodeRef<'_>| {
///     if n.tags().contains("rod") { rods += 1; }
/// })?;
/// assert_eq!(rods, 1);
/// # Ok::<(), tg_core::TgError>(())
/// ```
pub trait ModelVisitor<W = ()> {
    fn render(&mut self, node: NodeRef<'_, W>);
}

impl<W, F> ModelVisitor<W> for F
where
    F: FnMut(NodeRef<'_, W>),
{
    fn render(&mut self, node: NodeRef<'_, W>) {
        self(node)
    }
}

impl<W: 'static> ModelTree<W> {
    /// Depth-first, pre-order dispatch of `visitor` over `id`'s subtree.
    ///
    /// `render` is called once per node: `id` first, then each child subtree
    /// in insertion order, matching [`descendants`][Self::descendants].
    pub fn visit<V>(&self, id: NodeId, visitor: &mut V) -> TgResult<()>
    where
        V: ModelVisitor<W> + ?Sized,
    {
        let node = self.node(id)?;
        visit_node(node, visitor);
        Ok(())
    }
}

fn visit_node<W: 'static, V>(node: NodeRef<'_, W>, visitor: &mut V)
where
    V: ModelVisitor<W> + ?Sized,
{
    visitor.render(node);
    for child in node.child_nodes() {
        visit_node(child, visitor);
    }
}
