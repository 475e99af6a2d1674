//! Unit tests for tg-model.

use std::cell::RefCell;
use std::rc::Rc;

use tg_core::{Marker, NodeId, Tags, TgError, Vec3};

use crate::tree::handle_for_slot;
use crate::{ModelTree, NodeBehavior, NodeRef};

// ── Helpers ───────────────────────────────────────────────────────────────────

type Log = Rc<RefCell<Vec<String>>>;

/// Behavior that records every hook call as `"<hook> <name>"`.
struct Recorder {
    name: &'static str,
    log:  Log,
}

impl NodeBehavior<Vec<&'static str>> for Recorder {
    fn kind(&self) -> &str {
        "Recorder"
    }

    fn on_setup(&mut self, world: &mut Vec<&'static str>) {
        world.push(self.name);
        self.log.borrow_mut().push(format!("setup {}", self.name));
    }

    fn on_step(&mut self, _dt: f64) {
        self.log.borrow_mut().push(format!("step {}", self.name));
    }

    fn on_teardown(&mut self) {
        self.log.borrow_mut().push(format!("teardown {}", self.name));
    }
}

/// Behavior that integrates elapsed time.
#[derive(Default)]
struct Integrator {
    elapsed: f64,
    steps:   u32,
}

impl NodeBehavior for Integrator {
    fn kind(&self) -> &str {
        "Integrator"
    }

    fn on_step(&mut self, dt: f64) {
        self.elapsed += dt;
        self.steps += 1;
    }
}

/// Handles of the reference tree `R → {A, B}`, `A → {A1, A2}`.
struct Fixture {
    r:  NodeId,
    a:  NodeId,
    a1: NodeId,
    a2: NodeId,
    b:  NodeId,
}

fn build<W: 'static>(
    tree:     &mut ModelTree<W>,
    mut make: impl FnMut(&mut ModelTree<W>, &'static str) -> NodeId,
) -> Fixture {
    let r = make(tree, "R");
    let a = make(tree, "A");
    let a1 = make(tree, "A1");
    let a2 = make(tree, "A2");
    let b = make(tree, "B");
    tree.attach_child(r, a).unwrap();
    tree.attach_child(a, a1).unwrap();
    tree.attach_child(a, a2).unwrap();
    tree.attach_child(r, b).unwrap();
    Fixture { r, a, a1, a2, b }
}

fn plain_tree() -> (ModelTree, Fixture) {
    let mut tree: ModelTree = ModelTree::new();
    let f = build(&mut tree, |t, name| t.create(name));
    (tree, f)
}

fn recorded_tree() -> (ModelTree<Vec<&'static str>>, Fixture, Log) {
    let log: Log = Rc::default();
    let mut tree: ModelTree<Vec<&'static str>> = ModelTree::new();
    let f = build(&mut tree, |t, name| {
        t.create_with(name, Recorder { name, log: Rc::clone(&log) })
    });
    (tree, f, log)
}

fn marker(n: i32) -> Marker {
    Marker::new(Vec3::new(n as f64, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), n)
}

// ── Structural mutation ───────────────────────────────────────────────────────

#[cfg(test)]
mod attach_tests {
    use super::*;

    #[test]
    fn null_child_rejected_and_children_unchanged() {
        let (mut tree, f) = plain_tree();
        let err = tree.attach_child(f.r, NodeId::INVALID).unwrap_err();
        assert_eq!(err, TgError::NullChild);
        assert_eq!(tree.children(f.r).unwrap(), &[f.a, f.b]);
    }

    #[test]
    fn self_child_rejected() {
        let mut tree: ModelTree = ModelTree::new();
        let n = tree.create("lonely");
        assert_eq!(tree.attach_child(n, n), Err(TgError::SelfChild(n)));
        assert!(tree.children(n).unwrap().is_empty());
    }

    #[test]
    fn existing_descendant_rejected_as_cyclic() {
        let (mut tree, f) = plain_tree();
        assert_eq!(
            tree.attach_child(f.r, f.a2),
            Err(TgError::CyclicChild { parent: f.r, child: f.a2 })
        );
        assert_eq!(
            tree.attach_child(f.a, f.a1),
            Err(TgError::CyclicChild { parent: f.a, child: f.a1 })
        );
        assert_eq!(tree.descendants(f.r).unwrap(), vec![f.a, f.a1, f.a2, f.b]);
    }

    #[test]
    fn ancestor_under_descendant_rejected_as_cyclic() {
        let (mut tree, f) = plain_tree();
        assert_eq!(
            tree.attach_child(f.a1, f.r),
            Err(TgError::CyclicChild { parent: f.a1, child: f.r })
        );
        assert!(tree.children(f.a1).unwrap().is_empty());
        assert_eq!(tree.parent(f.r).unwrap(), None);
    }

    #[test]
    fn child_of_another_tree_rejected() {
        let (mut tree, f) = plain_tree();
        let other = tree.create("other");
        let owned = tree.create("owned");
        tree.attach_child(other, owned).unwrap();

        assert_eq!(
            tree.attach_child(f.b, owned),
            Err(TgError::AlreadyAttached { child: owned, parent: other })
        );
        assert!(tree.children(f.b).unwrap().is_empty());
        assert_eq!(tree.parent(owned).unwrap(), Some(other));
    }

    #[test]
    fn unknown_handles_rejected() {
        let (mut tree, f) = plain_tree();
        assert_eq!(tree.attach_child(NodeId(999), f.a), Err(TgError::NodeNotFound(NodeId(999))));
        assert_eq!(tree.attach_child(f.b, NodeId(999)), Err(TgError::NodeNotFound(NodeId(999))));
    }

    #[test]
    fn attached_child_appears_exactly_once() {
        let (mut tree, f) = plain_tree();
        let c = tree.create("C");
        tree.attach_child(f.b, c).unwrap();

        let kids = tree.children(f.b).unwrap();
        assert_eq!(kids.iter().filter(|&&k| k == c).count(), 1);
        let desc = tree.descendants(f.r).unwrap();
        assert_eq!(desc.iter().filter(|&&d| d == c).count(), 1);
        assert_eq!(tree.parent(c).unwrap(), Some(f.b));
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree: ModelTree = ModelTree::new();
        let root = tree.create("root");
        let kids: Vec<NodeId> = (0..5).map(|_| tree.create("")).collect();
        for &k in kids.iter().rev() {
            tree.attach_child(root, k).unwrap();
        }
        let expected: Vec<NodeId> = kids.into_iter().rev().collect();
        assert_eq!(tree.children(root).unwrap(), expected.as_slice());
    }

    #[test]
    fn rejected_attach_keeps_invariant() {
        let (mut tree, f) = plain_tree();
        let _ = tree.attach_child(f.a1, f.r);
        let _ = tree.attach_child(f.r, f.a);
        let _ = tree.attach_child(f.r, NodeId::INVALID);
        assert!(tree.invariant());
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn roots_lists_parentless_nodes() {
        let (mut tree, f) = plain_tree();
        let loose = tree.create("loose");
        assert_eq!(tree.roots().collect::<Vec<_>>(), vec![f.r, loose]);
    }
}

// ── Enumeration ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod descendant_tests {
    use super::*;

    #[test]
    fn preorder_flattening() {
        let (tree, f) = plain_tree();
        assert_eq!(tree.descendants(f.r).unwrap(), vec![f.a, f.a1, f.a2, f.b]);
        assert_eq!(tree.descendants(f.a).unwrap(), vec![f.a1, f.a2]);
        assert!(tree.descendants(f.b).unwrap().is_empty());
    }

    #[test]
    fn reflects_current_structure() {
        let (mut tree, f) = plain_tree();
        let before = tree.descendants(f.r).unwrap();
        let b1 = tree.create("B1");
        tree.attach_child(f.b, b1).unwrap();
        let after = tree.descendants(f.r).unwrap();
        assert_eq!(before.len(), 4);
        assert_eq!(after, vec![f.a, f.a1, f.a2, f.b, b1]);
    }

    #[test]
    fn node_ref_agrees_with_tree() {
        let (tree, f) = plain_tree();
        let node = tree.node(f.a).unwrap();
        assert_eq!(node.descendants(), tree.descendants(f.a).unwrap());
        assert_eq!(node.children(), &[f.a1, f.a2]);
        assert_eq!(node.parent(), Some(f.r));
        assert_eq!(node.kind(), "Model");
        let kids: Vec<NodeId> = node.child_nodes().map(|c| c.id()).collect();
        assert_eq!(kids, vec![f.a1, f.a2]);
    }

    #[test]
    fn find_by_tags() {
        let mut tree: ModelTree = ModelTree::new();
        let robot = tree.create("robot");
        let rod_a = tree.create("rod hinge A");
        let rod_b = tree.create("rod hinge B");
        let cable = tree.create("cable");
        let seg = tree.create("segment");
        tree.attach_child(robot, seg).unwrap();
        tree.attach_child(seg, rod_a).unwrap();
        tree.attach_child(seg, cable).unwrap();
        tree.attach_child(robot, rod_b).unwrap();

        assert_eq!(tree.find(robot, &Tags::from("rod")).unwrap(), vec![rod_a, rod_b]);
        assert_eq!(tree.find(robot, &Tags::from("hinge A")).unwrap(), vec![rod_a]);
        assert!(tree.find(robot, &Tags::from("robot")).unwrap().is_empty());
        assert_eq!(tree.find(robot, &Tags::new()).unwrap().len(), 4);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn setup_forwards_world_in_preorder() {
        let (mut tree, f, log) = recorded_tree();
        let mut world = Vec::new();
        tree.setup(f.r, &mut world).unwrap();
        assert_eq!(world, vec!["R", "A", "A1", "A2", "B"]);
        assert_eq!(log.borrow().len(), 5);
    }

    #[test]
    fn non_positive_step_rejected_without_stepping() {
        let (mut tree, f, log) = recorded_tree();
        assert_eq!(tree.step(f.r, 0.0), Err(TgError::NonPositiveStep(0.0)));
        assert_eq!(tree.step(f.r, -1.0), Err(TgError::NonPositiveStep(-1.0)));
        assert!(matches!(tree.step(f.r, f64::NAN), Err(TgError::NonPositiveStep(_))));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn step_reaches_every_node_once_in_preorder() {
        let (mut tree, f, log) = recorded_tree();
        tree.step(f.r, 0.01).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["step R", "step A", "step A1", "step A2", "step B"]
        );
    }

    #[test]
    fn step_subtree_only() {
        let (mut tree, f, log) = recorded_tree();
        tree.step(f.a, 0.01).unwrap();
        assert_eq!(*log.borrow(), vec!["step A", "step A1", "step A2"]);
    }

    #[test]
    fn repeated_steps_accumulate() {
        let mut tree: ModelTree = ModelTree::new();
        let root = tree.create("root");
        let body = tree.create_with("body", Integrator::default());
        tree.attach_child(root, body).unwrap();
        for _ in 0..4 {
            tree.step(root, 0.25).unwrap();
        }
        let integ = tree.behavior::<Integrator>(body).unwrap().unwrap();
        assert_eq!(integ.steps, 4);
        assert!((integ.elapsed - 1.0).abs() < 1e-12);
        assert!(tree.behavior::<Integrator>(root).unwrap().is_none());
    }

    #[test]
    fn teardown_empties_children_and_markers() {
        let (mut tree, f) = plain_tree();
        tree.add_marker(f.r, marker(1)).unwrap();
        tree.add_marker(f.r, marker(2)).unwrap();

        tree.teardown(f.r).unwrap();

        assert!(tree.children(f.r).unwrap().is_empty());
        assert!(tree.markers(f.r).unwrap().is_empty());
        assert!(tree.descendants(f.r).unwrap().is_empty());
        assert_eq!(tree.len(), 1);
        for gone in [f.a, f.a1, f.a2, f.b] {
            assert!(!tree.contains(gone));
        }
        assert!(tree.invariant());
    }

    #[test]
    fn teardown_hooks_run_post_order() {
        let (mut tree, f, log) = recorded_tree();
        tree.teardown(f.r).unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["teardown A1", "teardown A2", "teardown A", "teardown B", "teardown R"]
        );
    }

    #[test]
    fn torn_down_node_is_reusable() {
        let (mut tree, f) = plain_tree();
        tree.teardown(f.r).unwrap();
        let fresh = tree.create("fresh");
        tree.attach_child(f.r, fresh).unwrap();
        assert_eq!(tree.descendants(f.r).unwrap(), vec![fresh]);
    }

    #[test]
    fn teardown_of_inner_node_keeps_it_attached() {
        let (mut tree, f) = plain_tree();
        tree.teardown(f.a).unwrap();
        assert_eq!(tree.descendants(f.r).unwrap(), vec![f.a, f.b]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn stale_handle_reports_not_found() {
        let (mut tree, f) = plain_tree();
        tree.teardown(f.r).unwrap();
        assert_eq!(tree.step(f.a1, 0.1), Err(TgError::NodeNotFound(f.a1)));
        assert!(tree.node(f.b).is_err());
    }

    #[test]
    fn destroy_frees_subtree_without_hooks() {
        let (mut tree, f, log) = recorded_tree();
        tree.destroy(f.r).unwrap();
        assert!(tree.is_empty());
        assert!(log.borrow().is_empty());
        assert!(tree.invariant());
    }

    #[test]
    fn destroy_refuses_owned_node() {
        let (mut tree, f) = plain_tree();
        assert_eq!(tree.destroy(f.a), Err(TgError::StillAttached(f.a)));
        assert_eq!(tree.len(), 5);
    }
}

// ── Visitor ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod visitor_tests {
    use super::*;
    use crate::ModelVisitor;

    struct Collect(Vec<NodeId>);

    impl ModelVisitor for Collect {
        fn render(&mut self, node: NodeRef<'_>) {
            self.0.push(node.id());
        }
    }

    #[test]
    fn visits_self_then_descendants() {
        let (tree, f) = plain_tree();
        let mut v = Collect(Vec::new());
        tree.visit(f.r, &mut v).unwrap();

        let mut expected = vec![f.r];
        expected.extend(tree.descendants(f.r).unwrap());
        assert_eq!(v.0, expected);
    }

    #[test]
    fn closure_visitor_counts_nodes() {
        let (tree, f) = plain_tree();
        let mut count = 0;
        tree.visit(f.a, &mut |_n: NodeRef<'_>| count += 1).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn visitor_sees_tags_and_markers() {
        let (mut tree, f) = plain_tree();
        tree.add_marker(f.a1, marker(7)).unwrap();
        let mut seen = Vec::new();
        tree.visit(f.r, &mut |n: NodeRef<'_>| {
            seen.push((n.tags().to_string(), n.markers().len()));
        })
        .unwrap();
        assert_eq!(seen[2], ("A1".to_string(), 1));
        assert_eq!(seen.iter().map(|(_, m)| m).sum::<usize>(), 1);
    }

    #[test]
    fn dyn_visitor_accepted() {
        let (tree, f) = plain_tree();
        let mut v = Collect(Vec::new());
        let dv: &mut dyn ModelVisitor = &mut v;
        tree.visit(f.b, dv).unwrap();
        assert_eq!(v.0, vec![f.b]);
    }
}

// ── Senseable bridge and markers ──────────────────────────────────────────────

#[cfg(test)]
mod senseable_tests {
    use super::*;

    #[test]
    fn markers_are_append_only_copies() {
        let (mut tree, f) = plain_tree();
        let mut m = marker(3);
        tree.add_marker(f.b, m).unwrap();
        tree.add_marker(f.b, m).unwrap();
        m.node_number = 99;
        let stored = tree.markers(f.b).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|s| s.node_number == 3));
        assert_ne!(stored[0], m);
        assert!(tree.markers(f.r).unwrap().is_empty());
    }

    #[test]
    fn count_is_descendants_plus_own_markers() {
        let (mut tree, f) = plain_tree();
        tree.add_marker(f.r, marker(1)).unwrap();
        tree.add_marker(f.r, marker(2)).unwrap();
        tree.add_marker(f.r, marker(3)).unwrap();
        tree.add_marker(f.a, marker(10)).unwrap();
        tree.add_marker(f.b, marker(20)).unwrap();

        let s = tree.senseable_descendants(f.r).unwrap();
        assert_eq!(s.len(), 4 + 3);
    }

    #[test]
    fn nodes_first_then_own_markers_in_order() {
        let (mut tree, f) = plain_tree();
        tree.add_marker(f.r, marker(1)).unwrap();
        tree.add_marker(f.r, marker(2)).unwrap();

        let s = tree.senseable_descendants(f.r).unwrap();
        let nodes: Vec<NodeId> = s.iter().filter_map(|x| x.as_node()).map(|n| n.id()).collect();
        assert_eq!(nodes, vec![f.a, f.a1, f.a2, f.b]);
        assert!(s[..4].iter().all(|x| x.is_node()));
        let marks: Vec<i32> = s[4..].iter().filter_map(|x| x.as_marker()).map(|m| m.node_number).collect();
        assert_eq!(marks, vec![1, 2]);
    }

    #[test]
    fn descendant_markers_reached_by_recursion() {
        let (mut tree, f) = plain_tree();
        tree.add_marker(f.a, marker(10)).unwrap();

        let s = tree.senseable_descendants(f.r).unwrap();
        let a = s.iter().find(|x| x.as_node().map(|n| n.id()) == Some(f.a)).unwrap();
        let below_a = a.senseable_descendants();
        assert_eq!(below_a.len(), 2 + 1);
        assert!(below_a[2].is_marker());
        assert!(below_a[2].senseable_descendants().is_empty());
    }

    #[test]
    fn leaf_without_markers_has_no_senseables() {
        let (tree, f) = plain_tree();
        assert!(tree.senseable_descendants(f.b).unwrap().is_empty());
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod describe_tests {
    use super::*;

    #[test]
    fn nested_indentation_and_tags() {
        let mut tree: ModelTree = ModelTree::new();
        let root = tree.create("robot");
        let rod = tree.create_with("rod", Integrator::default());
        tree.attach_child(root, rod).unwrap();

        let text = tree.describe(root, "").unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"Model("));
        assert!(lines.contains(&"  Integrator("));
        assert!(lines.contains(&"    Tags: [rod]"));
        assert!(lines.contains(&"  Tags: [robot]"));
        assert_eq!(lines.last(), Some(&")"));
    }

    #[test]
    fn prefix_applies_to_every_line() {
        let (tree, f) = plain_tree();
        let text = tree.describe(f.a, "> ").unwrap();
        assert!(text.lines().all(|l| l.starts_with("> ")));
    }

    #[test]
    fn display_matches_empty_prefix() {
        let (tree, f) = plain_tree();
        let node = tree.node(f.r).unwrap();
        assert_eq!(node.to_string(), tree.describe(f.r, "").unwrap());
    }
}

// ── Invariant ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod invariant_tests {
    use super::*;

    #[test]
    fn holds_through_a_full_lifecycle() {
        let (mut tree, f, _log) = recorded_tree();
        assert!(tree.invariant());
        tree.setup(f.r, &mut Vec::new()).unwrap();
        tree.step(f.r, 0.1).unwrap();
        assert!(tree.invariant());
        tree.teardown(f.r).unwrap();
        assert!(tree.invariant());
        tree.destroy(f.r).unwrap();
        assert!(tree.invariant());
        assert!(tree.is_empty());
    }

    #[test]
    fn duplicate_child_link_detected() {
        let (mut tree, f) = plain_tree();
        tree.expect_slot_mut(f.b).children.push(f.a1);
        assert!(!tree.invariant());
    }

    #[test]
    fn dangling_child_handle_detected() {
        let (mut tree, f) = plain_tree();
        tree.expect_slot_mut(f.b).children.push(NodeId(999));
        assert!(!tree.invariant());
    }

    #[test]
    fn parent_link_mismatch_detected() {
        let (mut tree, f) = plain_tree();
        tree.expect_slot_mut(f.a1).parent = Some(f.b);
        assert!(!tree.invariant());
    }

    #[test]
    fn parent_chain_cycle_detected() {
        let mut tree: ModelTree = ModelTree::new();
        let x = tree.create("x");
        let y = tree.create("y");
        // Links agree both ways, so only the chain walk can notice.
        tree.expect_slot_mut(x).parent = Some(y);
        tree.expect_slot_mut(x).children.push(y);
        tree.expect_slot_mut(y).parent = Some(x);
        tree.expect_slot_mut(y).children.push(x);
        assert!(!tree.invariant());
    }

    #[test]
    fn wrong_live_count_detected() {
        let (mut tree, _) = plain_tree();
        tree.live += 1;
        assert!(!tree.invariant());
    }

    #[test]
    fn slot_handles_follow_index() {
        assert_eq!(handle_for_slot(0), NodeId(0));
        assert_eq!(handle_for_slot(7), NodeId(7));
        assert!(handle_for_slot(u32::MAX as usize - 1).is_valid());
    }

    #[test]
    #[should_panic(expected = "handles exhausted")]
    fn sentinel_handle_never_issued() {
        handle_for_slot(u32::MAX as usize);
    }

    #[test]
    fn tags_editable_in_place() {
        let (mut tree, f) = plain_tree();
        tree.tags_mut(f.b).unwrap().insert("sensor");
        assert!(tree.tags(f.b).unwrap().contains("sensor"));
        assert_eq!(tree.find(f.r, &Tags::from("sensor")).unwrap(), vec![f.b]);
    }
}
