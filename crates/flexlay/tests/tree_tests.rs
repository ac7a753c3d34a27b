//! Integration tests for the tree mutation API: ownership rules, errors,
//! freeing, sharing and debugging output.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use flexlay::{
    Config, Direction, DumpOptions, LogLevel, Logger, NodeId, Size, StyleValue, Tree, TreeError,
};

fn layout(tree: &mut Tree, root: NodeId) {
    tree.compute_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
        .unwrap();
}

/// Helper: root with `count` children, each 10 points tall.
fn column(tree: &mut Tree, count: usize) -> (NodeId, Vec<NodeId>) {
    let root = tree.new_node();
    tree.set_width(root, StyleValue::point(100.0)).unwrap();
    let children: Vec<NodeId> = (0..count)
        .map(|_| {
            let child = tree.new_node();
            tree.set_height(child, StyleValue::point(10.0)).unwrap();
            tree.append_child(root, child).unwrap();
            child
        })
        .collect();
    (root, children)
}

// ===== Ownership errors =====

#[test]
fn test_insert_rejects_cycles() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 1);
    let err = tree.append_child(children[0], root).unwrap_err();
    assert_eq!(
        err,
        TreeError::Cycle {
            parent: children[0],
            child: root
        }
    );
    assert_eq!(
        tree.append_child(root, root).unwrap_err(),
        TreeError::Cycle {
            parent: root,
            child: root
        }
    );
}

#[test]
fn test_insert_rejects_owned_child() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 1);
    let other = tree.new_node();
    assert_eq!(
        tree.append_child(other, children[0]).unwrap_err(),
        TreeError::ChildHasOwner {
            child: children[0],
            owner: root
        }
    );
}

#[test]
fn test_insert_index_out_of_bounds() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    let child = tree.new_node();
    assert_eq!(
        tree.insert_child(root, child, 5).unwrap_err(),
        TreeError::ChildIndexOutOfBounds { index: 5, len: 0 }
    );
    assert_eq!(tree.owner(child), None);
}

#[test]
fn test_insert_at_index() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 2);
    let first = tree.new_node();
    tree.insert_child(root, first, 0).unwrap();
    assert_eq!(tree.children(root), [first, children[0], children[1]]);
    assert_eq!(tree.child(root, 0), Some(first));
    assert_eq!(tree.child(root, 3), None);
}

#[test]
fn test_measure_func_and_children_are_exclusive() {
    let mut tree = Tree::new();
    let (root, _) = column(&mut tree, 1);
    assert_eq!(
        tree.set_measure_func(root, |_| Size::new(1.0, 1.0))
            .unwrap_err(),
        TreeError::HasChildren(root)
    );

    let leaf = tree.new_node();
    tree.set_measure_func(leaf, |_| Size::new(1.0, 1.0))
        .unwrap();
    let child = tree.new_node();
    assert_eq!(
        tree.append_child(leaf, child).unwrap_err(),
        TreeError::HasMeasureFunc(leaf)
    );

    tree.unset_measure_func(leaf).unwrap();
    tree.append_child(leaf, child).unwrap();
}

#[test]
fn test_mark_dirty_needs_measure_func() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    assert_eq!(
        tree.mark_dirty(root).unwrap_err(),
        TreeError::NotMeasured(root)
    );
}

#[test]
fn test_sealed_subtree_rejects_mutation() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 1);
    tree.seal(root).unwrap();
    assert!(tree.get(children[0]).unwrap().is_sealed());

    assert_eq!(
        tree.set_width(children[0], StyleValue::point(5.0))
            .unwrap_err(),
        TreeError::Sealed(children[0])
    );
    let extra = tree.new_node();
    assert_eq!(
        tree.append_child(root, extra).unwrap_err(),
        TreeError::Sealed(root)
    );

    // Layout still runs on a sealed tree.
    layout(&mut tree, root);

    tree.unseal(root).unwrap();
    tree.append_child(root, extra).unwrap();
}

#[test]
fn test_errors_are_logged() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let config = Config::new()
        .with_logger(Logger::plain(move |level, message| {
            sink.lock().unwrap().push((level, message.to_owned()));
        }))
        .shared();
    let mut tree = Tree::with_config(config);
    let root = tree.new_node();
    let _ = tree.append_child(root, root);

    let messages = messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, LogLevel::Error);
    assert!(messages[0].1.contains("cycle"));
}

// ===== Child list mutation =====

#[test]
fn test_remove_child_resets_layout() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 2);
    layout(&mut tree, root);
    assert_eq!(tree.layout(children[1]).unwrap().top(), 10.0);

    tree.remove_child(root, children[0]).unwrap();
    assert_eq!(tree.owner(children[0]), None);
    assert!(tree.layout(children[0]).unwrap().width().is_nan());
    assert!(tree.get(root).unwrap().is_dirty());

    // Removing a stranger is a no-op.
    let stranger = tree.new_node();
    tree.remove_child(root, stranger).unwrap();

    layout(&mut tree, root);
    assert_eq!(tree.layout(children[1]).unwrap().top(), 0.0);
}

#[test]
fn test_set_children_replaces_list() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 2);
    let fresh = tree.new_node();
    tree.set_children(root, &[children[1], fresh]).unwrap();

    assert_eq!(tree.children(root), [children[1], fresh]);
    assert_eq!(tree.owner(children[0]), None);
    assert_eq!(tree.owner(fresh), Some(root));

    tree.remove_all_children(root).unwrap();
    assert_eq!(tree.child_count(root), 0);
    assert_eq!(tree.owner(fresh), None);
}

#[test]
fn test_set_children_is_atomic() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 1);
    let (other, others) = column(&mut tree, 1);
    let err = tree.set_children(root, &[others[0]]).unwrap_err();
    assert_eq!(
        err,
        TreeError::ChildHasOwner {
            child: others[0],
            owner: other
        }
    );
    assert_eq!(tree.children(root), children);
}

// ===== Lifetime =====

#[test]
fn test_free_orphans_children() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 1);
    let grandchild = tree.new_node();
    tree.append_child(children[0], grandchild).unwrap();

    tree.free(children[0]).unwrap();
    assert!(!tree.contains(children[0]));
    assert!(tree.children(root).is_empty());
    assert!(tree.contains(grandchild));
    assert_eq!(tree.owner(grandchild), None);

    assert_eq!(
        tree.set_width(children[0], StyleValue::point(1.0))
            .unwrap_err(),
        TreeError::UnknownNode(children[0])
    );
    assert_eq!(
        tree.free(children[0]).unwrap_err(),
        TreeError::UnknownNode(children[0])
    );
}

#[test]
fn test_free_recursive_drops_subtree() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 2);
    let grandchild = tree.new_node();
    tree.append_child(children[0], grandchild).unwrap();
    assert_eq!(tree.len(), 4);

    tree.free_recursive(root).unwrap();
    assert!(tree.is_empty());
}

#[test]
fn test_reset_requires_detached_leaf() {
    let mut tree = Tree::new();
    let (root, children) = column(&mut tree, 1);
    assert_eq!(
        tree.reset(root).unwrap_err(),
        TreeError::HasChildren(root)
    );
    assert_eq!(
        tree.reset(children[0]).unwrap_err(),
        TreeError::ChildHasOwner {
            child: children[0],
            owner: root
        }
    );

    tree.remove_child(root, children[0]).unwrap();
    tree.reset(children[0]).unwrap();
    assert!(tree.style(children[0]).unwrap().dimensions[1].is_auto());
}

// ===== Sharing =====

#[test]
fn test_clone_shares_children_until_layout() {
    let mut tree = Tree::new();
    let (original, children) = column(&mut tree, 2);
    layout(&mut tree, original);

    let copy = tree.clone_node(original).unwrap();
    assert_eq!(tree.children(copy), children);
    assert_eq!(tree.owner(children[0]), Some(original));

    tree.set_width(copy, StyleValue::point(50.0)).unwrap();
    layout(&mut tree, copy);

    let copied = tree.children(copy).to_vec();
    assert_eq!(copied.len(), 2);
    for (copied, shared) in copied.iter().zip(&children) {
        assert_ne!(copied, shared);
        assert_eq!(tree.owner(*copied), Some(copy));
        assert_eq!(tree.layout(*copied).unwrap().width(), 50.0);
        assert_eq!(tree.layout(*shared).unwrap().width(), 100.0);
    }
    assert_eq!(tree.children(original), children);
}

#[test]
fn test_free_reaches_clones_sharing_the_node() {
    let mut tree = Tree::new();
    let (original, children) = column(&mut tree, 3);
    let copy = tree.clone_node(original).unwrap();
    let copy_of_copy = tree.clone_node(copy).unwrap();

    tree.free(children[1]).unwrap();
    let survivors = [children[0], children[2]];
    assert_eq!(tree.children(original), survivors);
    assert_eq!(tree.children(copy), survivors);
    assert_eq!(tree.children(copy_of_copy), survivors);

    // A recursive free of the original takes its owned children with it.
    tree.free_recursive(original).unwrap();
    assert!(tree.children(copy).is_empty());
    assert!(tree.children(copy_of_copy).is_empty());
    assert_eq!(tree.len(), 2);
}

#[test]
fn test_free_leaves_unrelated_trees_alone() {
    let mut tree = Tree::new();
    let (first, _) = column(&mut tree, 50);
    let (second, seconds) = column(&mut tree, 50);
    for child in &seconds[..25] {
        tree.free(*child).unwrap();
    }
    assert_eq!(tree.child_count(first), 50);
    assert_eq!(tree.children(second), &seconds[25..]);
    assert_eq!(tree.len(), 102 - 25);
}

#[test]
fn test_clone_hook_supplies_copies() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let config = Config::new()
        .with_clone_node_func(move |tree, node, _owner, _index| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
            tree.clone_node(node).ok()
        })
        .shared();
    let mut tree = Tree::with_config(config);
    let (original, _) = column(&mut tree, 3);
    layout(&mut tree, original);

    let copy = tree.clone_node(original).unwrap();
    tree.set_width(copy, StyleValue::point(60.0)).unwrap();
    layout(&mut tree, copy);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

// ===== Callbacks and debugging =====

#[test]
fn test_dirtied_callback_fires_on_transition() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut tree = Tree::new();
    let leaf = tree.new_node();
    tree.set_measure_func(leaf, |_| Size::new(10.0, 10.0))
        .unwrap();
    tree.set_dirtied_func(
        leaf,
        Some(Arc::new(move |node| sink.lock().unwrap().push(node))),
    )
    .unwrap();

    // Still dirty from creation.
    tree.mark_dirty(leaf).unwrap();
    assert!(seen.lock().unwrap().is_empty());

    layout(&mut tree, leaf);
    tree.mark_dirty(leaf).unwrap();
    tree.mark_dirty(leaf).unwrap();
    assert_eq!(*seen.lock().unwrap(), [leaf]);
}

#[test]
fn test_dump_includes_layout_and_children() {
    let mut tree = Tree::new();
    let (root, _) = column(&mut tree, 2);
    layout(&mut tree, root);

    let dump = tree.dump(root, DumpOptions::default());
    assert_eq!(dump["layout"]["width"], 100.0);
    assert_eq!(dump["layout"]["height"], 20.0);
    assert_eq!(dump["children"].as_array().map(Vec::len), Some(2));
    assert_eq!(dump["children"][1]["layout"]["top"], 10.0);
    assert!(dump.get("style").is_none());

    let shallow = tree.dump(
        root,
        DumpOptions {
            layout: false,
            style: true,
            children: false,
        },
    );
    assert!(shallow.get("children").is_none());
    assert!(shallow.get("layout").is_none());
    assert!(shallow["style"].is_object());
}
