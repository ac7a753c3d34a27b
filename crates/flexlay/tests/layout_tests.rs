//! Integration tests for the flex layout algorithm.
//!
//! Every tree here is built through the public API and laid out from the
//! root; expectations are in points with the default scale of 1.

use std::sync::Arc;

use flexlay::{
    Align, ComputedLayout, Direction, Display, Edge, FlexDirection, Justify, MeasureMode, NodeId,
    Overflow, PositionType, Size, StyleValue, Tree, Wrap,
};

/// Helper: a fixed-size node.
fn sized(tree: &mut Tree, width: f32, height: f32) -> NodeId {
    let node = tree.new_node();
    tree.set_width(node, StyleValue::point(width)).unwrap();
    tree.set_height(node, StyleValue::point(height)).unwrap();
    node
}

/// Helper: a fixed-size row container holding `children`.
fn row(tree: &mut Tree, width: f32, height: f32, children: &[NodeId]) -> NodeId {
    let root = sized(tree, width, height);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    for child in children {
        tree.append_child(root, *child).unwrap();
    }
    root
}

fn layout(tree: &mut Tree, root: NodeId) {
    tree.compute_layout(root, f32::NAN, f32::NAN, Direction::Ltr)
        .unwrap();
}

fn geometry(tree: &Tree, node: NodeId) -> (f32, f32, f32, f32) {
    let l: &ComputedLayout = tree.layout(node).unwrap();
    (l.left(), l.top(), l.width(), l.height())
}

// ---------------------------------------------------------------------------
// [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
// ---------------------------------------------------------------------------

#[test]
fn test_grow_distributes_by_factor() {
    let mut tree = Tree::new();
    let mut children = Vec::new();
    for grow in [1.0, 1.0, 2.0] {
        let child = tree.new_node();
        tree.set_flex_basis(child, StyleValue::point(0.0)).unwrap();
        tree.set_flex_grow(child, grow).unwrap();
        children.push(child);
    }
    let root = row(&mut tree, 300.0, 100.0, &children);
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, children[0]), (0.0, 0.0, 75.0, 100.0));
    assert_eq!(geometry(&tree, children[1]), (75.0, 0.0, 75.0, 100.0));
    assert_eq!(geometry(&tree, children[2]), (150.0, 0.0, 150.0, 100.0));
}

#[test]
fn test_shrink_is_weighted_by_basis() {
    let mut tree = Tree::new();
    let mut children = Vec::new();
    for _ in 0..2 {
        let child = tree.new_node();
        tree.set_flex_basis(child, StyleValue::point(80.0)).unwrap();
        tree.set_flex_shrink(child, 1.0).unwrap();
        children.push(child);
    }
    let root = row(&mut tree, 100.0, 20.0, &children);
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, children[0]).2, 50.0);
    assert_eq!(geometry(&tree, children[1]), (50.0, 0.0, 50.0, 20.0));
    assert!(!tree.layout(root).unwrap().had_overflow);
}

#[test]
fn test_max_size_freezes_item_and_frees_space() {
    let mut tree = Tree::new();
    let capped = tree.new_node();
    tree.set_flex_grow(capped, 1.0).unwrap();
    tree.set_max_width(capped, StyleValue::point(50.0)).unwrap();
    let free = tree.new_node();
    tree.set_flex_grow(free, 1.0).unwrap();
    let root = row(&mut tree, 200.0, 50.0, &[capped, free]);
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, capped).2, 50.0);
    assert_eq!(geometry(&tree, free), (50.0, 0.0, 150.0, 50.0));
}

#[test]
fn test_min_size_wins_over_width() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 20.0, 10.0);
    tree.set_min_width(child, StyleValue::point(60.0)).unwrap();
    let root = row(&mut tree, 100.0, 10.0, &[child]);
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, child).2, 60.0);
}

#[test]
fn test_overflowing_items_flag_the_container() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 150.0, 10.0);
    let root = row(&mut tree, 100.0, 10.0, &[child]);
    layout(&mut tree, root);

    assert!(tree.layout(root).unwrap().had_overflow);
    assert_eq!(geometry(&tree, child).2, 150.0);
}

// ---------------------------------------------------------------------------
// [§ 9.3 Main Size Determination](https://www.w3.org/TR/css-flexbox-1/#main-sizing)
// ---------------------------------------------------------------------------

#[test]
fn test_wrap_breaks_into_lines() {
    let mut tree = Tree::new();
    let first = sized(&mut tree, 60.0, 20.0);
    let second = sized(&mut tree, 60.0, 20.0);
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
    tree.set_width(root, StyleValue::point(100.0)).unwrap();
    tree.append_child(root, first).unwrap();
    tree.append_child(root, second).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, first), (0.0, 0.0, 60.0, 20.0));
    assert_eq!(geometry(&tree, second), (0.0, 20.0, 60.0, 20.0));
    assert_eq!(geometry(&tree, root), (0.0, 0.0, 100.0, 40.0));
}

#[test]
fn test_wrap_reverse_mirrors_lines() {
    let mut tree = Tree::new();
    let first = sized(&mut tree, 60.0, 20.0);
    let second = sized(&mut tree, 60.0, 20.0);
    let root = row(&mut tree, 100.0, 100.0, &[first, second]);
    tree.set_flex_wrap(root, Wrap::WrapReverse).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, first).1, 80.0);
    assert_eq!(geometry(&tree, second).1, 60.0);
}

#[test]
fn test_content_sized_root() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 30.0, 40.0);
    let root = tree.new_node();
    tree.append_child(root, child).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, root), (0.0, 0.0, 30.0, 40.0));
}

#[test]
fn test_infinite_space_sizes_to_content() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 10.0, 10.0);
    let root = tree.new_node();
    tree.append_child(root, child).unwrap();
    tree.compute_layout(root, f32::INFINITY, f32::INFINITY, Direction::Ltr)
        .unwrap();

    assert_eq!(geometry(&tree, root), (0.0, 0.0, 10.0, 10.0));
    assert_eq!(geometry(&tree, child), (0.0, 0.0, 10.0, 10.0));

    let measured = tree
        .measure_node(
            root,
            f32::INFINITY,
            MeasureMode::AtMost,
            f32::NEG_INFINITY,
            MeasureMode::Exactly,
            Direction::Ltr,
        )
        .unwrap();
    assert_eq!(measured, Size::new(10.0, 10.0));
}

// ---------------------------------------------------------------------------
// [§ 8.2 justify-content](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
// ---------------------------------------------------------------------------

fn justified_lefts(justify: Justify) -> (f32, f32) {
    let mut tree = Tree::new();
    let first = sized(&mut tree, 20.0, 20.0);
    let second = sized(&mut tree, 20.0, 20.0);
    let root = row(&mut tree, 100.0, 20.0, &[first, second]);
    tree.set_justify_content(root, justify).unwrap();
    layout(&mut tree, root);
    (geometry(&tree, first).0, geometry(&tree, second).0)
}

#[test]
fn test_justify_content() {
    assert_eq!(justified_lefts(Justify::FlexStart), (0.0, 20.0));
    assert_eq!(justified_lefts(Justify::Center), (30.0, 50.0));
    assert_eq!(justified_lefts(Justify::FlexEnd), (60.0, 80.0));
    assert_eq!(justified_lefts(Justify::SpaceBetween), (0.0, 80.0));
    assert_eq!(justified_lefts(Justify::SpaceAround), (15.0, 65.0));
    assert_eq!(justified_lefts(Justify::SpaceEvenly), (20.0, 60.0));
}

#[test]
fn test_auto_margin_absorbs_free_space() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 20.0, 20.0);
    tree.set_margin(child, Edge::Left, StyleValue::Auto).unwrap();
    let root = row(&mut tree, 100.0, 20.0, &[child]);
    tree.set_justify_content(root, Justify::Center).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, child).0, 80.0);
}

#[test]
fn test_column_reverse_fills_from_bottom() {
    let mut tree = Tree::new();
    let first = sized(&mut tree, 10.0, 20.0);
    let second = sized(&mut tree, 10.0, 30.0);
    let root = sized(&mut tree, 100.0, 100.0);
    tree.set_flex_direction(root, FlexDirection::ColumnReverse)
        .unwrap();
    tree.append_child(root, first).unwrap();
    tree.append_child(root, second).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, first).1, 80.0);
    assert_eq!(geometry(&tree, second).1, 50.0);
}

// ---------------------------------------------------------------------------
// [§ 8.3 align-items](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
// ---------------------------------------------------------------------------

#[test]
fn test_align_items() {
    for (align, top) in [
        (Align::FlexStart, 0.0),
        (Align::Center, 40.0),
        (Align::FlexEnd, 80.0),
    ] {
        let mut tree = Tree::new();
        let child = sized(&mut tree, 20.0, 20.0);
        let root = row(&mut tree, 100.0, 100.0, &[child]);
        tree.set_align_items(root, align).unwrap();
        layout(&mut tree, root);
        assert_eq!(geometry(&tree, child).1, top, "{align}");
    }
}

#[test]
fn test_stretch_fills_cross_axis_inside_padding_and_border() {
    let mut tree = Tree::new();
    let child = tree.new_node();
    tree.set_height(child, StyleValue::point(20.0)).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.set_padding(root, Edge::All, StyleValue::point(10.0))
        .unwrap();
    tree.set_border(root, Edge::All, 5.0).unwrap();
    tree.append_child(root, child).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, child), (15.0, 15.0, 70.0, 20.0));
    let root_layout = tree.layout(root).unwrap();
    assert_eq!(root_layout.padding(flexlay::PhysicalEdge::Top), 10.0);
    assert_eq!(root_layout.border(flexlay::PhysicalEdge::Right), 5.0);
}

#[test]
fn test_align_self_overrides_align_items() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 20.0, 20.0);
    tree.set_align_self(child, Align::FlexEnd).unwrap();
    let root = row(&mut tree, 100.0, 100.0, &[child]);
    tree.set_align_items(root, Align::Center).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, child).1, 80.0);
}

#[test]
fn test_baseline_alignment() {
    let mut tree = Tree::new();
    let tall = sized(&mut tree, 10.0, 40.0);
    let short = sized(&mut tree, 10.0, 20.0);
    let custom = sized(&mut tree, 10.0, 20.0);
    tree.set_baseline_func(custom, Some(Arc::new(|_: f32, _: f32| 5.0)))
        .unwrap();
    let root = row(&mut tree, 200.0, 100.0, &[tall, short, custom]);
    tree.set_align_items(root, Align::Baseline).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, tall).1, 0.0);
    assert_eq!(geometry(&tree, short).1, 20.0);
    assert_eq!(geometry(&tree, custom).1, 35.0);
}

// ---------------------------------------------------------------------------
// [§ 8.4 align-content](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
// ---------------------------------------------------------------------------

fn line_tops(align_content: Align) -> (f32, f32) {
    let mut tree = Tree::new();
    let first = sized(&mut tree, 60.0, 20.0);
    let second = sized(&mut tree, 60.0, 20.0);
    let root = row(&mut tree, 100.0, 100.0, &[first, second]);
    tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
    tree.set_align_content(root, align_content).unwrap();
    layout(&mut tree, root);
    (geometry(&tree, first).1, geometry(&tree, second).1)
}

#[test]
fn test_align_content() {
    assert_eq!(line_tops(Align::FlexStart), (0.0, 20.0));
    assert_eq!(line_tops(Align::Center), (30.0, 50.0));
    assert_eq!(line_tops(Align::FlexEnd), (60.0, 80.0));
    assert_eq!(line_tops(Align::Stretch), (0.0, 50.0));
    assert_eq!(line_tops(Align::SpaceBetween), (0.0, 80.0));
    assert_eq!(line_tops(Align::SpaceAround), (15.0, 65.0));
}

// ---------------------------------------------------------------------------
// [§ 4.1 Absolutely-Positioned Flex Children](https://www.w3.org/TR/css-flexbox-1/#abspos-items)
// ---------------------------------------------------------------------------

#[test]
fn test_absolute_child_uses_offsets() {
    let mut tree = Tree::new();
    let flowing = tree.new_node();
    tree.set_height(flowing, StyleValue::point(30.0)).unwrap();
    let absolute = sized(&mut tree, 20.0, 20.0);
    tree.set_position_type(absolute, PositionType::Absolute)
        .unwrap();
    tree.set_position(absolute, Edge::Top, StyleValue::point(10.0))
        .unwrap();
    tree.set_position(absolute, Edge::Left, StyleValue::point(10.0))
        .unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.append_child(root, absolute).unwrap();
    tree.append_child(root, flowing).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, absolute), (10.0, 10.0, 20.0, 20.0));
    // Out of flow: the in-flow sibling still starts at the top.
    assert_eq!(geometry(&tree, flowing), (0.0, 0.0, 100.0, 30.0));
}

#[test]
fn test_absolute_child_trailing_offsets_respect_border() {
    let mut tree = Tree::new();
    let absolute = sized(&mut tree, 20.0, 20.0);
    tree.set_position_type(absolute, PositionType::Absolute)
        .unwrap();
    tree.set_position(absolute, Edge::Right, StyleValue::point(5.0))
        .unwrap();
    tree.set_position(absolute, Edge::Bottom, StyleValue::point(5.0))
        .unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.set_border(root, Edge::All, 2.0).unwrap();
    tree.append_child(root, absolute).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, absolute), (73.0, 73.0, 20.0, 20.0));
}

#[test]
fn test_absolute_child_between_offsets_is_stretched() {
    let mut tree = Tree::new();
    let absolute = tree.new_node();
    tree.set_position_type(absolute, PositionType::Absolute)
        .unwrap();
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        tree.set_position(absolute, edge, StyleValue::point(10.0))
            .unwrap();
    }
    let root = sized(&mut tree, 100.0, 60.0);
    tree.append_child(root, absolute).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, absolute), (10.0, 10.0, 80.0, 40.0));
}

#[test]
fn test_absolute_child_without_offsets_follows_alignment() {
    let mut tree = Tree::new();
    let absolute = sized(&mut tree, 20.0, 20.0);
    tree.set_position_type(absolute, PositionType::Absolute)
        .unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.set_justify_content(root, Justify::Center).unwrap();
    tree.set_align_items(root, Align::FlexEnd).unwrap();
    tree.append_child(root, absolute).unwrap();
    layout(&mut tree, root);

    // Column: justify is vertical, align is horizontal.
    assert_eq!(geometry(&tree, absolute), (80.0, 40.0, 20.0, 20.0));
}

// ---------------------------------------------------------------------------
// Writing direction
// ---------------------------------------------------------------------------

fn directional_tree(direction: Direction) -> Vec<(f32, f32, f32, f32)> {
    let mut tree = Tree::new();
    let first = sized(&mut tree, 50.0, 10.0);
    tree.set_margin(first, Edge::Start, StyleValue::point(10.0))
        .unwrap();
    let second = sized(&mut tree, 30.0, 10.0);
    tree.set_padding(second, Edge::End, StyleValue::point(4.0))
        .unwrap();
    let root = row(&mut tree, 200.0, 50.0, &[first, second]);
    tree.compute_layout(root, f32::NAN, f32::NAN, direction)
        .unwrap();
    [first, second]
        .iter()
        .map(|child| geometry(&tree, *child))
        .collect()
}

#[test]
fn test_rtl_mirrors_ltr() {
    let ltr = directional_tree(Direction::Ltr);
    let rtl = directional_tree(Direction::Rtl);
    assert_eq!(ltr[0].0, 10.0);
    assert_eq!(ltr[1].0, 60.0);
    for (l, r) in ltr.iter().zip(rtl.iter()) {
        assert_eq!(r.0, 200.0 - l.0 - l.2);
        assert_eq!((r.1, r.2, r.3), (l.1, l.2, l.3));
    }
}

#[test]
fn test_rtl_resolves_start_edges() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 10.0, 10.0);
    tree.set_margin(child, Edge::Start, StyleValue::point(7.0))
        .unwrap();
    let root = row(&mut tree, 100.0, 10.0, &[child]);
    tree.compute_layout(root, f32::NAN, f32::NAN, Direction::Rtl)
        .unwrap();

    let l = tree.layout(child).unwrap();
    assert_eq!(l.margin(flexlay::PhysicalEdge::Right), 7.0);
    assert_eq!(l.margin(flexlay::PhysicalEdge::Left), 0.0);
    assert_eq!(l.direction, Direction::Rtl);
}

// ---------------------------------------------------------------------------
// Sizing from content and style
// ---------------------------------------------------------------------------

#[test]
fn test_aspect_ratio_derives_height() {
    let mut tree = Tree::new();
    let child = tree.new_node();
    tree.set_width(child, StyleValue::point(50.0)).unwrap();
    tree.set_aspect_ratio(child, 2.0).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.append_child(root, child).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, child), (0.0, 0.0, 50.0, 25.0));
}

#[test]
fn test_percentages_resolve_against_owner() {
    let mut tree = Tree::new();
    let child = tree.new_node();
    tree.set_width(child, StyleValue::percent(50.0)).unwrap();
    tree.set_height(child, StyleValue::percent(25.0)).unwrap();
    let root = row(&mut tree, 200.0, 80.0, &[child]);
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, child), (0.0, 0.0, 100.0, 20.0));
}

#[test]
fn test_display_none_is_zeroed_and_skipped() {
    let mut tree = Tree::new();
    let hidden = sized(&mut tree, 20.0, 20.0);
    tree.set_display(hidden, Display::None).unwrap();
    let shown = sized(&mut tree, 30.0, 20.0);
    let root = row(&mut tree, 100.0, 100.0, &[hidden, shown]);
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, hidden), (0.0, 0.0, 0.0, 0.0));
    assert_eq!(geometry(&tree, shown).0, 0.0);
}

#[test]
fn test_measure_function_sizes_leaf() {
    let mut tree = Tree::new();
    let text = tree.new_node();
    tree.set_measure_func(text, |_| Size::new(100.0, 10.0))
        .unwrap();
    let root = tree.new_node();
    tree.set_width(root, StyleValue::point(50.0)).unwrap();
    tree.append_child(root, text).unwrap();
    layout(&mut tree, root);

    // Stretched to the column's width; height from the callback.
    assert_eq!(geometry(&tree, text), (0.0, 0.0, 50.0, 10.0));
    assert_eq!(geometry(&tree, root).3, 10.0);
}

#[test]
fn test_measure_function_sees_content_box() {
    let mut tree = Tree::new();
    let text = tree.new_node();
    tree.set_padding(text, Edge::All, StyleValue::point(5.0))
        .unwrap();
    tree.set_measure_func(text, |input| {
        let width = if input.width.is_nan() { 40.0 } else { input.width };
        Size::new(width, 10.0)
    })
    .unwrap();
    let root = tree.new_node();
    tree.set_width(root, StyleValue::point(80.0)).unwrap();
    tree.append_child(root, text).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, text), (0.0, 0.0, 80.0, 20.0));
}

#[test]
fn test_negative_measurement_is_sanitized() {
    let mut tree = Tree::new();
    let text = tree.new_node();
    tree.set_measure_func(text, |_| Size::new(-5.0, f32::NAN))
        .unwrap();
    let root = row(&mut tree, 100.0, 100.0, &[text]);
    tree.set_align_items(root, Align::FlexStart).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, text), (0.0, 0.0, 0.0, 0.0));
}

#[test]
fn test_scroll_container_measures_unbounded_main_axis() {
    let mut tree = Tree::new();
    let child = sized(&mut tree, 150.0, 20.0);
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_overflow(root, Overflow::Scroll).unwrap();
    tree.set_max_width(root, StyleValue::point(100.0)).unwrap();
    tree.append_child(root, child).unwrap();
    layout(&mut tree, root);

    assert_eq!(geometry(&tree, root).2, 100.0);
    assert_eq!(geometry(&tree, child).2, 150.0);
}
