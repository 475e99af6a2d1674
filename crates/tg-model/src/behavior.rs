//! The `NodeBehavior` trait — the extension point for concrete node kinds.

use std::any::Any;

/// Upcast helper so behaviors can be downcast back to their concrete type.
///
/// Blanket-implemented for every `'static` type; implementors of
/// [`NodeBehavior`] never need to write it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-kind behavior of a model node.
///
/// A node's structure (children, markers, tags) is owned by the
/// [`ModelTree`][crate::ModelTree]; the node's own physics lives behind this
/// trait.  The tree calls the hooks while it walks the subtree:
///
/// | Tree operation | Hook order                                             |
/// |----------------|--------------------------------------------------------|
/// | `setup`        | `on_setup` on the node, then each child in order       |
/// | `step`         | `on_step` on the node, then each child in order        |
/// | `teardown`     | each child torn down and freed, then `on_teardown`     |
///
/// Every hook has a no-op default, so a kind only overrides what it needs.
/// Hooks receive no access to the tree, so they cannot reshape it mid-walk.
///
/// # Example
///
/// ```rust
/// use tg_model::NodeBehavior;
///
/// #[derive(Default)]
/// struct Clock { elapsed: f64 }
///
/// impl NodeBehavior for Clock {
///     fn kind(&self) -> &str { "Clock" }
///     fn on_step(&mut self, dt: f64) { self.elapsed += dt; }
/// }
/// ```
pub trait NodeBehavior<W = ()>: AsAny {
    /// Short kind name used by diagnostics.
    fn kind(&self) -> &str {
        "Model"
    }

    /// Called once per run with the borrowed world context.
    fn on_setup(&mut self, _world: &mut W) {}

    /// Advance this node's own state by `dt` seconds (`dt > 0` is guaranteed).
    fn on_step(&mut self, _dt: f64) {}

    /// Release whatever `on_setup` acquired.  Children are already gone.
    fn on_teardown(&mut self) {}
}
