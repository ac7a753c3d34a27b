//! The flexbox layout algorithm.
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! Layout is a recursive walk driven by `Tree::layout_node`. Each visit
//! either answers from the node's measure cache or runs `Tree::layout_impl`,
//! which sizes the node and, in a layout pass, positions its children. A
//! container whose size is not fixed first measures its children (a measure
//! pass, usually under an `AtMost` constraint) and then lays them out under
//! the sizes it settled on.
//!
//! Sizes inside this module use NaN for "undefined", since available space
//! often is.

mod absolute;
mod align;
mod baseline;
mod flex_basis;
mod justify;
mod lines;
mod measure;
mod rounding;

use std::sync::Arc;

use crate::cache::{CachedMeasurement, Constraints};
use crate::error::TreeError;
use crate::instrumentation::{LayoutStats, Marker, MarkerSection};
use crate::layout::Size;
use crate::numeric::{
    UNDEFINED, finite_or_undefined, float_max, float_min, is_defined, is_undefined, or_undefined,
    resolve_value,
};
use crate::style::{
    Align, Dimension, Direction, Display, FlexDirection, MeasureMode, Overflow, PhysicalEdge,
    PositionType, Style, Wrap,
};
use crate::tree::{NodeId, Tree};

/// Which contract a visit follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Size only. Children may be measured but nothing is positioned.
    Measure,
    /// Size and position the node and its subtree.
    Layout,
}

impl Pass {
    pub(crate) const fn is_layout(self) -> bool {
        matches!(self, Self::Layout)
    }
}

/// The constraints one node is visited under.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Request {
    /// Space for the node's margin box, NaN if unbounded.
    pub width: f32,
    pub width_mode: MeasureMode,
    pub height: f32,
    pub height_mode: MeasureMode,
    /// The owner's content box, which percentages resolve against.
    pub owner_width: f32,
    pub owner_height: f32,
    /// The owner's resolved direction.
    pub direction: Direction,
    pub pass: Pass,
}

/// Everything the per-line steps need to know about the container.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlexContext {
    pub node: NodeId,
    pub direction: Direction,
    pub main_axis: FlexDirection,
    pub cross_axis: FlexDirection,
    pub wraps: bool,
    pub pass: Pass,
    pub owner_width: f32,
    pub main_owner_size: f32,
    /// Modes the container itself was given.
    pub width_mode: MeasureMode,
    pub height_mode: MeasureMode,
    /// Modes along the container's axes; the main mode may be tightened
    /// once flex bases are known.
    pub main_mode: MeasureMode,
    pub cross_mode: MeasureMode,
    /// Space inside padding and border.
    pub inner_width: f32,
    pub inner_height: f32,
    pub inner_main: f32,
    pub inner_cross: f32,
    pub flex_basis_overflows: bool,
}

impl FlexContext {
    const fn is_main_row(&self) -> bool {
        self.main_axis.is_row()
    }

    /// Inner size along a physical axis.
    const fn inner_size(&self, axis: FlexDirection) -> f32 {
        if axis.is_row() {
            self.inner_width
        } else {
            self.inner_height
        }
    }
}

impl Tree {
    /// Lay out the tree rooted at `root` within the given space.
    ///
    /// Either size may be NaN for unbounded. Only nodes whose inputs changed
    /// since the previous call are recomputed; the rest are answered from
    /// their caches. Afterwards every node reached has a rounded
    /// [`crate::ComputedLayout`] and, if its geometry moved, a set
    /// new-layout flag.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `root` is not live.
    pub fn compute_layout(
        &mut self,
        root: NodeId,
        available_width: f32,
        available_height: f32,
        owner_direction: Direction,
    ) -> Result<(), TreeError> {
        if !self.contains(root) {
            return Err(self.report(None, TreeError::UnknownNode(root)));
        }
        let available_width = finite_or_undefined(available_width);
        let available_height = finite_or_undefined(available_height);
        self.generation = self.generation.wrapping_add(1);
        self.stats = LayoutStats::default();
        let config = Arc::clone(&self.nodes[root].config);
        let mut section = MarkerSection::begin(&config, Marker::Layout, root);

        let style = self.nodes[root].style;
        let direction = style.direction.resolve(owner_direction);
        let (width, width_mode) = root_constraint(
            &style,
            FlexDirection::Row,
            direction,
            available_width,
            available_width,
        );
        let (height, height_mode) = root_constraint(
            &style,
            FlexDirection::Column,
            direction,
            available_height,
            available_width,
        );

        #[cfg(feature = "layout-trace")]
        log::trace!(
            target: "flexlay",
            "compute_layout {root:?}: {width}x{height} ({width_mode}, {height_mode})"
        );

        let recomputed = self.layout_node(
            root,
            Request {
                width,
                width_mode,
                height,
                height_mode,
                owner_width: available_width,
                owner_height: available_height,
                direction: owner_direction,
                pass: Pass::Layout,
            },
        );
        if recomputed {
            self.place_relative(root, direction, available_width, available_height);
            self.finalize(root, 0.0, 0.0);
        }
        self.relayout_pending_boundaries(root);

        section.stats = self.stats;
        Ok(())
    }

    /// Measure `node` under the given constraints without laying it out.
    ///
    /// Nothing readable through [`Tree::layout`] changes, but the result is
    /// cached, so a following [`Tree::compute_layout`] under the same
    /// constraints reuses it.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnknownNode`] if `node` is not live.
    pub fn measure_node(
        &mut self,
        node: NodeId,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
        owner_direction: Direction,
    ) -> Result<Size, TreeError> {
        if !self.contains(node) {
            return Err(self.report(None, TreeError::UnknownNode(node)));
        }
        let (width, width_mode) = unbounded_as_undefined(width, width_mode);
        let (height, height_mode) = unbounded_as_undefined(height, height_mode);
        self.generation = self.generation.wrapping_add(1);
        self.stats = LayoutStats::default();
        let _ = self.layout_node(
            node,
            Request {
                width: constrained(width, width_mode),
                width_mode,
                height: constrained(height, height_mode),
                height_mode,
                owner_width: width,
                owner_height: height,
                direction: owner_direction,
                pass: Pass::Measure,
            },
        );
        let measured = self.nodes[node].state.measured;
        Ok(Size::new(measured[0], measured[1]))
    }

    /// Visit `node`, answering from its cache when possible.
    ///
    /// Returns whether the node was actually recomputed.
    pub(crate) fn layout_node(&mut self, node: NodeId, request: Request) -> bool {
        let generation = self.generation;
        let n = &mut self.nodes[node];
        let need_to_visit = (n.is_dirty && n.state.generation != generation)
            || n.state.last_owner_direction != Some(request.direction);
        if need_to_visit {
            n.state.invalidate();
        }

        let direction = n.style.direction.resolve(request.direction);
        let constraints = Constraints {
            width: request.width,
            width_mode: request.width_mode,
            height: request.height,
            height_mode: request.height_mode,
            margin_row: n
                .style
                .margin_for_axis(FlexDirection::Row, direction, request.owner_width),
            margin_column: n
                .style
                .margin_for_axis(FlexDirection::Column, direction, request.owner_width),
        };
        let cached = if n.measure.is_some() {
            n.state
                .cache
                .find_compatible(&constraints, n.config.point_scale_factor())
        } else if request.pass.is_layout() {
            n.state.cache.find_layout(&constraints)
        } else {
            n.state.cache.find_measurement(&constraints)
        };

        match cached {
            Some(entry) if !need_to_visit => {
                n.state.measured = [entry.computed_width, entry.computed_height];
                match request.pass {
                    Pass::Layout => self.stats.cached_layouts += 1,
                    Pass::Measure => self.stats.cached_measures += 1,
                }
                #[cfg(feature = "layout-trace")]
                log::trace!(
                    target: "flexlay",
                    "{node:?} cache hit ({:?}): {}x{}",
                    request.pass,
                    entry.computed_width,
                    entry.computed_height
                );
            }
            _ => {
                #[cfg(feature = "layout-trace")]
                log::trace!(
                    target: "flexlay",
                    "{node:?} {:?} {}x{} ({}, {})",
                    request.pass,
                    request.width,
                    request.height,
                    request.width_mode,
                    request.height_mode
                );
                self.layout_impl(node, request);
                match request.pass {
                    Pass::Layout => self.stats.layouts += 1,
                    Pass::Measure => self.stats.measures += 1,
                }

                let n = &mut self.nodes[node];
                n.state.last_owner_direction = Some(request.direction);
                if cached.is_none() {
                    let entry = CachedMeasurement {
                        available_width: request.width,
                        available_height: request.height,
                        width_mode: request.width_mode,
                        height_mode: request.height_mode,
                        computed_width: n.state.measured[0],
                        computed_height: n.state.measured[1],
                    };
                    if request.pass.is_layout() {
                        n.state.cache.store_layout(entry);
                    } else {
                        if n.state.cache.store_measurement(entry) {
                            self.stats.cache_evictions += 1;
                        }
                        let used = u32::try_from(n.state.cache.measurements().len())
                            .unwrap_or(u32::MAX);
                        self.stats.max_measure_cache = self.stats.max_measure_cache.max(used);
                    }
                }
            }
        }

        let n = &mut self.nodes[node];
        if request.pass.is_layout() {
            n.unrounded.dimensions = n.state.measured;
            n.state.last_owner_size = [request.owner_width, request.owner_height];
            n.is_dirty = false;
        }
        n.state.generation = generation;
        need_to_visit || cached.is_none()
    }

    /// Size `node` and, in a layout pass, position its children.
    fn layout_impl(&mut self, node: NodeId, request: Request) {
        let n = &self.nodes[node];
        let style = n.style;
        let has_measure = n.measure.is_some();
        let has_children = !n.children.is_empty();
        let direction = style.direction.resolve(request.direction);

        let layout = &mut self.nodes[node].unrounded;
        layout.direction = direction;
        for edge in PhysicalEdge::ALL {
            layout.margin[edge.index()] = style.margin_on(edge, direction, request.owner_width);
            layout.border[edge.index()] = style.border_on(edge, direction);
            layout.padding[edge.index()] = style.padding_on(edge, direction, request.owner_width);
        }

        if has_measure {
            self.measure_leaf(node, &style, direction, &request);
            return;
        }
        if !has_children {
            self.measure_empty(node, &style, direction, &request);
            return;
        }
        if !request.pass.is_layout() && self.measure_fixed_size(node, &style, direction, &request) {
            return;
        }

        self.clone_children_if_needed(node);
        self.nodes[node].unrounded.had_overflow = false;
        self.layout_container(node, &style, direction, &request);
    }

    /// Run the flex algorithm on a node with children.
    fn layout_container(
        &mut self,
        node: NodeId,
        style: &Style,
        direction: Direction,
        request: &Request,
    ) {
        let config = Arc::clone(&self.nodes[node].config);
        let has_owner = self.nodes[node].owner.is_some();

        // STEP 1: Axes, padding and border, min/max of the container.
        let main_axis = style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_row = main_axis.is_row();
        let owner_width = request.owner_width;
        let (main_owner_size, cross_owner_size) = if is_main_row {
            (request.owner_width, request.owner_height)
        } else {
            (request.owner_height, request.owner_width)
        };
        let (main_mode, cross_mode) = if is_main_row {
            (request.width_mode, request.height_mode)
        } else {
            (request.height_mode, request.width_mode)
        };
        let pb_main = style.padding_and_border_for_axis(main_axis, direction, owner_width);
        let pb_cross = style.padding_and_border_for_axis(cross_axis, direction, owner_width);
        let pb_row = style.padding_and_border_for_axis(FlexDirection::Row, direction, owner_width);
        let pb_column =
            style.padding_and_border_for_axis(FlexDirection::Column, direction, owner_width);
        let margin_row = style.margin_for_axis(FlexDirection::Row, direction, owner_width);
        let margin_column = style.margin_for_axis(FlexDirection::Column, direction, owner_width);
        let min_inner_main = or_undefined(style.min_size(main_axis, main_owner_size)) - pb_main;
        let max_inner_main = or_undefined(style.max_size(main_axis, main_owner_size)) - pb_main;

        // STEP 2: Space available to children.
        let inner_width = available_inner_dim(
            style,
            FlexDirection::Row,
            request.width - margin_row,
            pb_row,
            request.owner_width,
        );
        let inner_height = available_inner_dim(
            style,
            FlexDirection::Column,
            request.height - margin_column,
            pb_column,
            request.owner_height,
        );
        let (inner_main, inner_cross) = if is_main_row {
            (inner_width, inner_height)
        } else {
            (inner_height, inner_width)
        };

        let mut ctx = FlexContext {
            node,
            direction,
            main_axis,
            cross_axis,
            wraps: style.flex_wrap != Wrap::NoWrap,
            pass: request.pass,
            owner_width,
            main_owner_size,
            width_mode: request.width_mode,
            height_mode: request.height_mode,
            main_mode,
            cross_mode,
            inner_width,
            inner_height,
            inner_main,
            inner_cross,
            flex_basis_overflows: false,
        };

        // STEP 3: Flex base size of every item.
        let total_outer_flex_basis = self.compute_flex_basis_for_children(&ctx);
        ctx.flex_basis_overflows =
            main_mode != MeasureMode::Undefined && total_outer_flex_basis > inner_main;
        if ctx.wraps && ctx.flex_basis_overflows && main_mode == MeasureMode::AtMost {
            ctx.main_mode = MeasureMode::Exactly;
        }

        // STEP 4: Collect items into lines and lay each line out.
        let child_count = self.nodes[node].children.len();
        let mut start = 0;
        let mut line_count = 0;
        let mut total_line_cross = 0.0;
        let mut max_line_main: f32 = 0.0;
        while start < child_count {
            let mut line = self.collect_line(&ctx, start, line_count);

            // STEP 5: Decide how much main-axis space this line may use.
            let mut line_main = inner_main;
            let mut sized_by_content = false;
            if ctx.main_mode != MeasureMode::Exactly {
                if is_defined(min_inner_main) && line.size_consumed < min_inner_main {
                    line_main = min_inner_main;
                } else if is_defined(max_inner_main) && line.size_consumed > max_inner_main {
                    line_main = max_inner_main;
                } else {
                    let legacy = config.use_legacy_stretch_behaviour();
                    let cannot_grow = line.total_flex_grow == 0.0
                        || style.resolve_flex_grow(has_owner) == 0.0;
                    if !legacy && cannot_grow {
                        // Nothing can grow, so the content size is all the line needs.
                        line_main = line.size_consumed;
                    }
                    sized_by_content = !legacy;
                }
            }
            if !sized_by_content && is_defined(line_main) {
                line.remaining_free_space = line_main - line.size_consumed;
            } else if line.size_consumed < 0.0 {
                line.remaining_free_space = -line.size_consumed;
            }

            // [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
            let can_skip_flex = !ctx.pass.is_layout() && ctx.cross_mode == MeasureMode::Exactly;
            if !can_skip_flex {
                self.resolve_flexible_length(&ctx, &mut line, line_main);
            }
            if line.remaining_free_space < 0.0 {
                self.nodes[node].unrounded.had_overflow = true;
            }

            // STEP 6: Main-axis justification and the line's cross size.
            self.justify_main_axis(&ctx, style, &mut line, line_main);

            let mut container_cross = inner_cross;
            if ctx.cross_mode != MeasureMode::Exactly {
                container_cross = bound_axis(
                    style,
                    cross_axis,
                    direction,
                    line.cross_dim + pb_cross,
                    cross_owner_size,
                    owner_width,
                ) - pb_cross;
            }
            if !ctx.wraps && ctx.cross_mode == MeasureMode::Exactly {
                line.cross_dim = inner_cross;
            }
            line.cross_dim = bound_axis(
                style,
                cross_axis,
                direction,
                line.cross_dim + pb_cross,
                cross_owner_size,
                owner_width,
            ) - pb_cross;

            // STEP 7: Cross-axis alignment within the line.
            if ctx.pass.is_layout() {
                self.align_line_items(&ctx, style, &line, container_cross, total_line_cross);
            }

            total_line_cross += line.cross_dim;
            max_line_main = float_max(max_line_main, line.main_dim);
            line_count += 1;
            start = line.end;
        }

        // STEP 8: Multi-line alignment.
        if ctx.pass.is_layout() && (ctx.wraps || self.is_baseline_layout(node)) {
            self.align_content(&ctx, style, line_count, total_line_cross);
        }

        // STEP 9: The container's own size.
        let mut measured = [
            bound_axis(
                style,
                FlexDirection::Row,
                direction,
                request.width - margin_row,
                request.owner_width,
                owner_width,
            ),
            bound_axis(
                style,
                FlexDirection::Column,
                direction,
                request.height - margin_column,
                request.owner_height,
                owner_width,
            ),
        ];
        let main_index = main_axis.dimension().index();
        let cross_index = cross_axis.dimension().index();
        let scrolls = style.overflow == Overflow::Scroll;
        if ctx.main_mode == MeasureMode::Undefined
            || (!scrolls && ctx.main_mode == MeasureMode::AtMost)
        {
            measured[main_index] = bound_axis(
                style,
                main_axis,
                direction,
                max_line_main,
                main_owner_size,
                owner_width,
            );
        } else if ctx.main_mode == MeasureMode::AtMost && scrolls {
            measured[main_index] = float_max(
                float_min(
                    inner_main + pb_main,
                    bound_axis_within_min_max(style, main_axis, max_line_main, main_owner_size),
                ),
                pb_main,
            );
        }
        if ctx.cross_mode == MeasureMode::Undefined
            || (!scrolls && ctx.cross_mode == MeasureMode::AtMost)
        {
            measured[cross_index] = bound_axis(
                style,
                cross_axis,
                direction,
                total_line_cross + pb_cross,
                cross_owner_size,
                owner_width,
            );
        } else if ctx.cross_mode == MeasureMode::AtMost && scrolls {
            measured[cross_index] = float_max(
                float_min(
                    inner_cross + pb_cross,
                    bound_axis_within_min_max(
                        style,
                        cross_axis,
                        total_line_cross + pb_cross,
                        cross_owner_size,
                    ),
                ),
                pb_cross,
            );
        }
        self.nodes[node].state.measured = measured;

        if !ctx.pass.is_layout() {
            return;
        }

        // STEP 10: wrap-reverse flips lines along the cross axis.
        if style.flex_wrap == Wrap::WrapReverse {
            self.mirror_cross_axis(&ctx);
        }

        // STEP 11: Absolutely positioned children.
        self.layout_absolute_children(&ctx, style);

        // STEP 12: Reverse axes were filled from the far edge; derive left/top.
        let main_reversed = main_axis.is_reverse();
        let cross_reversed = cross_axis.is_reverse();
        if main_reversed || cross_reversed {
            let children = self.nodes[node].children.clone();
            for child in children {
                if self.nodes[child].style.display == Display::None {
                    continue;
                }
                if main_reversed {
                    self.set_child_trailing_position(node, child, main_axis);
                }
                if cross_reversed {
                    self.set_child_trailing_position(node, child, cross_axis);
                }
            }
        }
    }

    /// Lay out layout boundaries dirtied since the last pass that the pass
    /// from `root` did not reach.
    fn relayout_pending_boundaries(&mut self, root: NodeId) {
        let pending = std::mem::take(&mut self.pending_boundaries);
        for boundary in pending {
            if !self.contains(boundary) {
                continue;
            }
            if boundary != root && !self.is_descendant_of(boundary, root) {
                self.pending_boundaries.push(boundary);
                continue;
            }
            let n = &self.nodes[boundary];
            if !n.is_dirty {
                continue;
            }
            let Some(entry) = n.state.cache.layout().copied() else {
                // Never laid out; the next pass that reaches it will.
                continue;
            };
            let request = Request {
                width: entry.available_width,
                width_mode: entry.width_mode,
                height: entry.available_height,
                height_mode: entry.height_mode,
                owner_width: n.state.last_owner_size[0],
                owner_height: n.state.last_owner_size[1],
                direction: n.state.last_owner_direction.unwrap_or_default(),
                pass: Pass::Layout,
            };

            #[cfg(feature = "layout-trace")]
            log::trace!(target: "flexlay", "relayout boundary {boundary:?}");

            if self.layout_node(boundary, request) {
                let (left, top) = self.absolute_offset_of_owner(boundary);
                self.finalize(boundary, left, top);
            }
        }
    }

    /// Unrounded offset of `node`'s owner from the top-left of its root.
    fn absolute_offset_of_owner(&self, node: NodeId) -> (f32, f32) {
        self.ancestors(node).fold((0.0, 0.0), |(left, top), id| {
            let layout = &self.nodes[id].unrounded;
            (left + layout.left(), top + layout.top())
        })
    }

    // ===== shared item helpers =====

    /// Store margin plus relative offset on all four sides of `node`.
    ///
    /// [§ 9.4 Relative Positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
    pub(crate) fn place_relative(
        &mut self,
        node: NodeId,
        direction: Direction,
        owner_width: f32,
        owner_height: f32,
    ) {
        let style = self.nodes[node].style;
        let offset_x = style.relative_position(FlexDirection::Row, direction, owner_width);
        let offset_y = style.relative_position(FlexDirection::Column, direction, owner_height);
        let margin = |edge| style.margin_on(edge, direction, owner_width);
        let position = &mut self.nodes[node].unrounded.position;
        position[PhysicalEdge::Left.index()] = margin(PhysicalEdge::Left) + offset_x;
        position[PhysicalEdge::Right.index()] = margin(PhysicalEdge::Right) - offset_x;
        position[PhysicalEdge::Top.index()] = margin(PhysicalEdge::Top) + offset_y;
        position[PhysicalEdge::Bottom.index()] = margin(PhysicalEdge::Bottom) - offset_y;
    }

    /// Derive the offset from the start of `axis` for a child placed from its end.
    fn set_child_trailing_position(&mut self, node: NodeId, child: NodeId, axis: FlexDirection) {
        let dim = axis.dimension();
        let container = self.nodes[node].state.measured(dim);
        let c = &mut self.nodes[child];
        let size = c.state.measured(dim);
        let leading = c.unrounded.position[axis.leading_edge().index()];
        c.unrounded.position[axis.trailing_edge().index()] = container - size - leading;
    }

    /// The offset of `node`'s border box along `axis`, from the edge it was placed against.
    pub(crate) fn leading_position_of(&self, node: NodeId, axis: FlexDirection) -> f32 {
        self.nodes[node].unrounded.position[axis.leading_edge().index()]
    }

    pub(crate) fn set_leading_position(&mut self, node: NodeId, axis: FlexDirection, value: f32) {
        self.nodes[node].unrounded.position[axis.leading_edge().index()] = value;
    }

    pub(crate) fn measured(&self, node: NodeId, dim: Dimension) -> f32 {
        self.nodes[node].state.measured(dim)
    }

    /// `align-self`, falling back to the container's `align-items`.
    pub(crate) fn align_item(&self, container: NodeId, child: NodeId) -> Align {
        let container_style = &self.nodes[container].style;
        let align = match self.nodes[child].style.align_self {
            Align::Auto => container_style.align_items,
            align => align,
        };
        if align == Align::Baseline && container_style.flex_direction.is_column() {
            // Baselines only exist across a row.
            return Align::FlexStart;
        }
        align
    }

    /// Measured size plus margins along `axis`.
    pub(crate) fn dim_with_margin(
        &self,
        child: NodeId,
        axis: FlexDirection,
        direction: Direction,
        width: f32,
    ) -> f32 {
        let c = &self.nodes[child];
        c.state.measured(axis.dimension())
            + c.style
                .margin_for_axis(axis, c.style.direction.resolve(direction), width)
    }

    /// Whether the child already has a usable size along `axis`.
    pub(crate) fn is_layout_dim_defined(&self, child: NodeId, axis: FlexDirection) -> bool {
        let value = self.measured(child, axis.dimension());
        is_defined(value) && value >= 0.0
    }

    pub(crate) fn flex_grow(&self, child: NodeId) -> f32 {
        let c = &self.nodes[child];
        c.style.resolve_flex_grow(c.owner.is_some())
    }

    pub(crate) fn flex_shrink(&self, child: NodeId) -> f32 {
        let c = &self.nodes[child];
        c.style
            .resolve_flex_shrink(c.owner.is_some(), c.config.use_web_defaults())
    }

    pub(crate) fn is_flexible(&self, child: NodeId) -> bool {
        let c = &self.nodes[child];
        c.style
            .is_flexible(c.owner.is_some(), c.config.use_web_defaults())
    }

    /// In flow: displayed and not absolutely positioned.
    pub(crate) fn is_in_flow(&self, child: NodeId) -> bool {
        let style = &self.nodes[child].style;
        style.display != Display::None && style.position_type != PositionType::Absolute
    }
}

/// Mode and size for one axis of the root.
fn root_constraint(
    style: &Style,
    axis: FlexDirection,
    direction: Direction,
    available: f32,
    owner_width: f32,
) -> (f32, MeasureMode) {
    let dim = axis.dimension();
    if style.is_dimension_defined(axis, available) {
        let size = or_undefined(resolve_value(&style.resolved_dimension(dim), available))
            + style.margin_for_axis(axis, direction, owner_width);
        return (size, MeasureMode::Exactly);
    }
    if let Some(max) = style.max_size(axis, available) {
        return (max, MeasureMode::AtMost);
    }
    if is_undefined(available) {
        (UNDEFINED, MeasureMode::Undefined)
    } else {
        (available, MeasureMode::Exactly)
    }
}

/// An unconstrained axis has no size to speak of.
/// A non-finite measure size carries no constraint.
const fn unbounded_as_undefined(size: f32, mode: MeasureMode) -> (f32, MeasureMode) {
    if size.is_finite() {
        (size, mode)
    } else {
        (UNDEFINED, MeasureMode::Undefined)
    }
}

const fn constrained(size: f32, mode: MeasureMode) -> f32 {
    match mode {
        MeasureMode::Undefined => UNDEFINED,
        MeasureMode::Exactly | MeasureMode::AtMost => size,
    }
}

/// Clamp `value` to the min/max size along `axis`. Negative limits are ignored.
pub(crate) fn bound_axis_within_min_max(
    style: &Style,
    axis: FlexDirection,
    value: f32,
    axis_size: f32,
) -> f32 {
    let max = style.max_size(axis, axis_size);
    let min = style.min_size(axis, axis_size);
    if let Some(max) = max.filter(|max| *max >= 0.0) {
        if value > max {
            return max;
        }
    }
    if let Some(min) = min.filter(|min| *min >= 0.0) {
        if value < min {
            return min;
        }
    }
    value
}

/// Like [`bound_axis_within_min_max`], but never below padding plus border.
pub(crate) fn bound_axis(
    style: &Style,
    axis: FlexDirection,
    direction: Direction,
    value: f32,
    axis_size: f32,
    width: f32,
) -> f32 {
    float_max(
        bound_axis_within_min_max(style, axis, value, axis_size),
        style.padding_and_border_for_axis(axis, direction, width),
    )
}

/// Apply a child's max size to the size it is about to be given.
///
/// An undefined size under a max becomes an `AtMost` constraint.
pub(crate) fn constrain_max_size_for_mode(
    style: &Style,
    axis: FlexDirection,
    direction: Direction,
    owner_axis_size: f32,
    owner_width: f32,
    mode: MeasureMode,
    size: f32,
) -> (MeasureMode, f32) {
    let max_size = or_undefined(style.max_size(axis, owner_axis_size))
        + style.margin_for_axis(axis, direction, owner_width);
    match mode {
        MeasureMode::Exactly | MeasureMode::AtMost => {
            if is_undefined(max_size) || size < max_size {
                (mode, size)
            } else {
                (mode, max_size)
            }
        }
        MeasureMode::Undefined => {
            if is_defined(max_size) {
                (MeasureMode::AtMost, max_size)
            } else {
                (mode, size)
            }
        }
    }
}

/// Space inside padding and border, kept within the node's own min/max.
fn available_inner_dim(
    style: &Style,
    axis: FlexDirection,
    available: f32,
    padding_and_border: f32,
    owner_size: f32,
) -> f32 {
    let inner = available - padding_and_border;
    if is_undefined(inner) {
        return inner;
    }
    let min_inner = style
        .min_size(axis, owner_size)
        .map_or(0.0, |min| min - padding_and_border);
    let max_inner = style
        .max_size(axis, owner_size)
        .map_or(f32::MAX, |max| max - padding_and_border);
    float_max(float_min(inner, max_inner), min_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_axis_respects_padding_and_border() {
        let mut style = Style::default();
        style.max_dimensions[0] = crate::style::StyleValue::point(5.0);
        style.padding.set(crate::style::Edge::All, crate::style::StyleValue::point(4.0));
        let bounded = bound_axis(&style, FlexDirection::Row, Direction::Ltr, 50.0, 100.0, 100.0);
        assert_eq!(bounded, 8.0);
    }

    #[test]
    fn test_constrain_turns_undefined_into_at_most() {
        let mut style = Style::default();
        style.max_dimensions[1] = crate::style::StyleValue::point(30.0);
        let (mode, size) = constrain_max_size_for_mode(
            &style,
            FlexDirection::Column,
            Direction::Ltr,
            100.0,
            100.0,
            MeasureMode::Undefined,
            UNDEFINED,
        );
        assert_eq!(mode, MeasureMode::AtMost);
        assert_eq!(size, 30.0);
    }

    #[test]
    fn test_root_constraint_prefers_style_size() {
        let mut style = Style::default();
        style.dimensions[0] = crate::style::StyleValue::point(40.0);
        let (size, mode) =
            root_constraint(&style, FlexDirection::Row, Direction::Ltr, 100.0, 100.0);
        assert_eq!((size, mode), (40.0, MeasureMode::Exactly));

        let style = Style::default();
        let (size, mode) =
            root_constraint(&style, FlexDirection::Row, Direction::Ltr, UNDEFINED, UNDEFINED);
        assert!(size.is_nan());
        assert_eq!(mode, MeasureMode::Undefined);
    }
}
