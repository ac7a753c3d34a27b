//! Integration tests for incremental layout: dirty tracking, the measure
//! cache and layout boundaries.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flexlay::{
    Direction, Edge, FlexDirection, MeasureMode, NodeId, Size, StyleValue, Tree, Wrap,
};

fn layout(tree: &mut Tree, root: NodeId) {
    tree.compute_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
        .unwrap();
}

/// A leaf whose measure callback counts its invocations.
fn counted_leaf(tree: &mut Tree, calls: &Arc<AtomicUsize>) -> NodeId {
    let leaf = tree.new_node();
    let counter = Arc::clone(calls);
    tree.set_measure_func(leaf, move |_| {
        let _ = counter.fetch_add(1, Ordering::SeqCst);
        Size::new(40.0, 10.0)
    })
    .unwrap();
    leaf
}

fn fixed_root(tree: &mut Tree, width: f32, height: f32) -> NodeId {
    let root = tree.new_node();
    tree.set_width(root, StyleValue::point(width)).unwrap();
    tree.set_height(root, StyleValue::point(height)).unwrap();
    root
}

#[test]
fn test_second_layout_is_a_cache_hit() {
    let mut tree = Tree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    for _ in 0..3 {
        let child = tree.new_node();
        tree.set_height(child, StyleValue::point(10.0)).unwrap();
        tree.append_child(root, child).unwrap();
    }

    layout(&mut tree, root);
    let first = tree.last_layout_stats();
    assert!(first.layouts >= 4);

    layout(&mut tree, root);
    let second = tree.last_layout_stats();
    assert_eq!(second.layouts, 0);
    assert_eq!(second.measures, 0);
    assert_eq!(second.cached_layouts, 1);
}

#[test]
fn test_new_layout_flag() {
    let mut tree = Tree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    let child = tree.new_node();
    tree.set_height(child, StyleValue::point(10.0)).unwrap();
    tree.append_child(root, child).unwrap();
    layout(&mut tree, root);

    assert!(tree.take_new_layout(child));
    assert!(!tree.has_new_layout(child));
    tree.mark_layout_seen(root);

    // Nothing moved: the flags stay clear.
    layout(&mut tree, root);
    assert!(!tree.has_new_layout(root));
    assert!(!tree.has_new_layout(child));

    tree.set_height(child, StyleValue::point(30.0)).unwrap();
    layout(&mut tree, root);
    assert!(tree.has_new_layout(child));
    assert_eq!(tree.layout(child).unwrap().height(), 30.0);
}

#[test]
fn test_measure_callback_runs_only_when_dirty() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut tree = Tree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    let leaf = counted_leaf(&mut tree, &calls);
    tree.append_child(root, leaf).unwrap();

    layout(&mut tree, root);
    let first = calls.load(Ordering::SeqCst);
    assert!(first > 0);
    assert_eq!(
        tree.last_layout_stats().measure_callbacks as usize,
        first
    );

    layout(&mut tree, root);
    assert_eq!(calls.load(Ordering::SeqCst), first);
    assert_eq!(tree.last_layout_stats().measure_callbacks, 0);

    tree.mark_dirty(leaf).unwrap();
    assert!(tree.get(root).unwrap().is_dirty());
    layout(&mut tree, root);
    assert!(calls.load(Ordering::SeqCst) > first);
    assert!(!tree.get(leaf).unwrap().is_dirty());
}

#[test]
fn test_measure_node_reuses_earlier_measurement() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    tree.set_padding(root, Edge::Top, StyleValue::point(4.0))
        .unwrap();
    layout(&mut tree, root);

    // An undefined height leaves only the padding.
    let measure = |tree: &mut Tree, width: f32| {
        tree.measure_node(
            root,
            width,
            MeasureMode::Exactly,
            f32::NAN,
            MeasureMode::Undefined,
            Direction::Ltr,
        )
        .unwrap()
    };

    assert_eq!(measure(&mut tree, 10.0), Size::new(10.0, 4.0));
    assert_eq!(tree.last_layout_stats().measures, 1);
    let _ = measure(&mut tree, 20.0);
    assert_eq!(tree.last_layout_stats().measures, 1);

    assert_eq!(measure(&mut tree, 10.0), Size::new(10.0, 4.0));
    let stats = tree.last_layout_stats();
    assert_eq!(stats.measures, 0);
    assert_eq!(stats.cached_measures, 1);
}

#[test]
fn test_measure_cache_evicts_oldest_entry() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    layout(&mut tree, root);

    let measure = |tree: &mut Tree, width: f32| {
        let _ = tree
            .measure_node(
                root,
                width,
                MeasureMode::Exactly,
                f32::NAN,
                MeasureMode::Undefined,
                Direction::Ltr,
            )
            .unwrap();
        tree.last_layout_stats()
    };

    for width in 1..=flexlay::MAX_CACHED_MEASUREMENTS {
        let stats = measure(&mut tree, width as f32);
        assert_eq!(stats.cache_evictions, 0);
    }
    assert_eq!(
        tree.last_layout_stats().max_measure_cache as usize,
        flexlay::MAX_CACHED_MEASUREMENTS
    );

    // One more distinct width pushes out the first.
    assert_eq!(measure(&mut tree, 100.0).cache_evictions, 1);
    assert_eq!(measure(&mut tree, 1.0).measures, 1);
    assert_eq!(measure(&mut tree, 3.0).cached_measures, 1);
}

/// A single-line text leaf, eight points per character.
fn word(tree: &mut Tree, text: &'static str) -> NodeId {
    let leaf = tree.new_node();
    tree.set_measure_func(leaf, move |input| {
        let natural = text.len() as f32 * 8.0;
        let width = match input.width_mode {
            MeasureMode::Exactly => input.width,
            MeasureMode::AtMost => natural.min(input.width),
            MeasureMode::Undefined => natural,
        };
        Size::new(width, 10.0)
    })
    .unwrap();
    leaf
}

#[test]
fn test_alternating_widths_reproduce_layout() {
    let mut tree = Tree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
    let words: Vec<NodeId> = ["hello", "flexible", "box", "layout"]
        .into_iter()
        .map(|text| {
            let leaf = word(&mut tree, text);
            tree.append_child(root, leaf).unwrap();
            leaf
        })
        .collect();

    let mut run = |width: f32| {
        tree.compute_layout(root, width, f32::NAN, Direction::Ltr)
            .unwrap();
        [root]
            .iter()
            .chain(&words)
            .map(|node| {
                let l = tree.layout(*node).unwrap();
                (l.left(), l.top(), l.width(), l.height())
            })
            .collect::<Vec<_>>()
    };

    let wide = run(320.0);
    let narrow = run(90.0);
    let wide_again = run(320.0);

    assert_ne!(wide, narrow);
    assert_eq!(wide, wide_again);
    // Everything fits on one line at 320.
    assert!(wide[1..].iter().all(|g| g.1 == 0.0));
}

#[test]
fn test_style_change_dirties_ancestors_once() {
    let mut tree = Tree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    let middle = tree.new_node();
    let leaf = tree.new_node();
    tree.append_child(root, middle).unwrap();
    tree.append_child(middle, leaf).unwrap();
    layout(&mut tree, root);

    let dirtied = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&dirtied);
    tree.set_dirtied_func(
        root,
        Some(Arc::new(move |_| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
        })),
    )
    .unwrap();

    tree.set_width(leaf, StyleValue::point(10.0)).unwrap();
    tree.set_height(leaf, StyleValue::point(10.0)).unwrap();
    for node in [root, middle, leaf] {
        assert!(tree.get(node).unwrap().is_dirty());
    }
    assert_eq!(dirtied.load(Ordering::SeqCst), 1);

    layout(&mut tree, root);
    for node in [root, middle, leaf] {
        assert!(!tree.get(node).unwrap().is_dirty());
    }
}

#[test]
fn test_setting_same_value_does_not_dirty() {
    let mut tree = Tree::new();
    let root = fixed_root(&mut tree, 100.0, 100.0);
    layout(&mut tree, root);

    tree.set_width(root, StyleValue::point(100.0)).unwrap();
    assert!(!tree.get(root).unwrap().is_dirty());
    tree.set_width(root, StyleValue::point(101.0)).unwrap();
    assert!(tree.get(root).unwrap().is_dirty());
}

#[test]
fn test_layout_boundary_stops_propagation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut tree = Tree::new();
    let root = fixed_root(&mut tree, 200.0, 200.0);
    let spacer = tree.new_node();
    tree.set_height(spacer, StyleValue::point(30.0)).unwrap();
    let boundary = fixed_root(&mut tree, 100.0, 50.0);
    tree.set_layout_boundary(boundary, true).unwrap();
    let leaf = counted_leaf(&mut tree, &calls);
    tree.append_child(root, spacer).unwrap();
    tree.append_child(root, boundary).unwrap();
    tree.append_child(boundary, leaf).unwrap();
    layout(&mut tree, root);
    let before = calls.load(Ordering::SeqCst);

    tree.mark_dirty(leaf).unwrap();
    assert!(tree.get(boundary).unwrap().is_dirty());
    assert!(!tree.get(root).unwrap().is_dirty());

    layout(&mut tree, root);
    // The clean root is answered from its cache. The leaf's layout pass
    // reuses the measurement the boundary took of it in the same run.
    let stats = tree.last_layout_stats();
    assert_eq!(stats.cached_layouts, 2);
    assert!(stats.measures >= 1);
    assert!(stats.layouts >= 1);
    assert!(calls.load(Ordering::SeqCst) > before);
    assert!(!tree.get(boundary).unwrap().is_dirty());

    // The boundary keeps its place below the spacer.
    let placed = tree.layout(boundary).unwrap();
    assert_eq!((placed.top(), placed.height()), (30.0, 50.0));
    assert_eq!(tree.layout(leaf).unwrap().top(), 0.0);
}
