//! [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#line-sizing)
//!
//! Every in-flow child gets a flex base size before lines are formed.

use super::{FlexContext, Pass, Request, constrain_max_size_for_mode};
use crate::config::Experiment;
use crate::layout::ComputedLayout;
use crate::numeric::{UNDEFINED, float_max, is_defined, is_undefined, resolve_value};
use crate::style::{
    Align, Dimension, Direction, Display, FlexDirection, MeasureMode, Overflow, PositionType,
};
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Compute the flex basis of every child of `ctx.node`.
    ///
    /// In a layout pass this also gives every child its initial position
    /// (margin plus relative offset) and zeroes `display: none` subtrees.
    /// Returns the sum of the outer flex bases of in-flow children.
    pub(super) fn compute_flex_basis_for_children(&mut self, ctx: &FlexContext) -> f32 {
        let children = self.nodes[ctx.node].children.clone();
        let main_mode = if ctx.is_main_row() {
            ctx.width_mode
        } else {
            ctx.height_mode
        };

        // A lone item that can both grow and shrink ends up filling the exact
        // main size whatever its basis is, so there is no point measuring it.
        let mut single_flex_child = None;
        if main_mode == MeasureMode::Exactly {
            for child in &children {
                if !self.is_flexible(*child) {
                    continue;
                }
                if single_flex_child.is_some()
                    || self.flex_grow(*child) == 0.0
                    || self.flex_shrink(*child) == 0.0
                {
                    single_flex_child = None;
                    break;
                }
                single_flex_child = Some(*child);
            }
        }

        let generation = self.generation;
        let mut total_outer_flex_basis = 0.0;
        for child in children {
            let style = self.nodes[child].style;
            if style.display == Display::None {
                self.zero_out_layout(child);
                self.nodes[child].is_dirty = false;
                continue;
            }

            let child_direction = style.direction.resolve(ctx.direction);
            if ctx.pass.is_layout() {
                self.place_relative(child, child_direction, ctx.inner_width, ctx.inner_height);
            }
            if style.position_type == PositionType::Absolute {
                continue;
            }

            if single_flex_child == Some(child) {
                let state = &mut self.nodes[child].state;
                state.flex_basis_generation = generation;
                state.computed_flex_basis = Some(0.0);
            } else {
                self.compute_flex_basis_for_child(ctx, child);
            }

            let basis = self.nodes[child].state.computed_flex_basis.unwrap_or(0.0);
            total_outer_flex_basis +=
                basis + style.margin_for_axis(ctx.main_axis, child_direction, ctx.inner_width);
        }
        total_outer_flex_basis
    }

    /// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
    ///
    /// The explicit basis wins, then a definite main size, then the size the
    /// child measures to.
    fn compute_flex_basis_for_child(&mut self, ctx: &FlexContext, child: NodeId) {
        let c = &self.nodes[child];
        let style = c.style;
        let direction = style.direction.resolve(ctx.direction);
        let web_flex_basis = c.config.has_experiment(Experiment::WebFlexBasis);
        let stale_generation = c.state.flex_basis_generation != self.generation;
        let has_basis = c.state.computed_flex_basis.is_some();

        let is_main_row = ctx.is_main_row();
        let width = ctx.inner_width;
        let height = ctx.inner_height;
        let main_size = if is_main_row { width } else { height };
        let resolved_basis = resolve_value(
            &style.resolved_flex_basis(c.config.use_web_defaults()),
            ctx.inner_main,
        );
        let row_defined = style.is_dimension_defined(FlexDirection::Row, width);
        let column_defined = style.is_dimension_defined(FlexDirection::Column, height);
        let pb_main = style.padding_and_border_for_axis(ctx.main_axis, direction, width);

        let basis = if let (Some(basis), true) = (resolved_basis, is_defined(main_size)) {
            if has_basis && !(web_flex_basis && stale_generation) {
                None
            } else {
                Some(float_max(basis, pb_main))
            }
        } else if is_main_row && row_defined {
            let size = resolve_value(&style.resolved_dimension(Dimension::Width), width);
            Some(float_max(size.unwrap_or(UNDEFINED), pb_main))
        } else if !is_main_row && column_defined {
            let size = resolve_value(&style.resolved_dimension(Dimension::Height), height);
            Some(float_max(size.unwrap_or(UNDEFINED), pb_main))
        } else {
            Some(self.measure_content_basis(ctx, child, direction, row_defined, column_defined))
        };

        let state = &mut self.nodes[child].state;
        if let Some(basis) = basis {
            state.computed_flex_basis = Some(basis);
        }
        state.flex_basis_generation = self.generation;
    }

    /// Measure a child with no definite main size to find its basis.
    fn measure_content_basis(
        &mut self,
        ctx: &FlexContext,
        child: NodeId,
        direction: Direction,
        row_defined: bool,
        column_defined: bool,
    ) -> f32 {
        let style = self.nodes[child].style;
        let container_overflow = self.nodes[ctx.node].style.overflow;
        let is_main_row = ctx.is_main_row();
        let width = ctx.inner_width;
        let height = ctx.inner_height;
        let margin_row = style.margin_for_axis(FlexDirection::Row, direction, width);
        let margin_column = style.margin_for_axis(FlexDirection::Column, direction, width);

        let mut child_width = UNDEFINED;
        let mut child_height = UNDEFINED;
        let mut width_mode = MeasureMode::Undefined;
        let mut height_mode = MeasureMode::Undefined;

        if row_defined {
            child_width = resolve_value(&style.resolved_dimension(Dimension::Width), width)
                .unwrap_or(UNDEFINED)
                + margin_row;
            width_mode = MeasureMode::Exactly;
        }
        if column_defined {
            child_height = resolve_value(&style.resolved_dimension(Dimension::Height), height)
                .unwrap_or(UNDEFINED)
                + margin_column;
            height_mode = MeasureMode::Exactly;
        }

        // A scrolling container does not bound its content along the main axis.
        let scrolls = container_overflow == Overflow::Scroll;
        if (!is_main_row || !scrolls) && is_undefined(child_width) && is_defined(width) {
            child_width = width;
            width_mode = MeasureMode::AtMost;
        }
        if (is_main_row || !scrolls) && is_undefined(child_height) && is_defined(height) {
            child_height = height;
            height_mode = MeasureMode::AtMost;
        }

        if let Some(ratio) = style.aspect_ratio {
            if !is_main_row && width_mode == MeasureMode::Exactly {
                child_height = margin_column + (child_width - margin_row) / ratio;
                height_mode = MeasureMode::Exactly;
            } else if is_main_row && height_mode == MeasureMode::Exactly {
                child_width = margin_row + (child_height - margin_column) * ratio;
                width_mode = MeasureMode::Exactly;
            }
        }

        // A stretched child with no cross size of its own takes the
        // container's exact cross size.
        let stretches = self.align_item(ctx.node, child) == Align::Stretch;
        let has_exact_width = is_defined(width) && ctx.width_mode == MeasureMode::Exactly;
        if !is_main_row
            && !row_defined
            && has_exact_width
            && stretches
            && width_mode != MeasureMode::Exactly
        {
            child_width = width;
            width_mode = MeasureMode::Exactly;
            if let Some(ratio) = style.aspect_ratio {
                child_height = (child_width - margin_row) / ratio;
                height_mode = MeasureMode::Exactly;
            }
        }
        let has_exact_height = is_defined(height) && ctx.height_mode == MeasureMode::Exactly;
        if is_main_row
            && !column_defined
            && has_exact_height
            && stretches
            && height_mode != MeasureMode::Exactly
        {
            child_height = height;
            height_mode = MeasureMode::Exactly;
            if let Some(ratio) = style.aspect_ratio {
                child_width = (child_height - margin_column) * ratio;
                width_mode = MeasureMode::Exactly;
            }
        }

        let (width_mode, child_width) = constrain_max_size_for_mode(
            &style,
            FlexDirection::Row,
            direction,
            width,
            width,
            width_mode,
            child_width,
        );
        let (height_mode, child_height) = constrain_max_size_for_mode(
            &style,
            FlexDirection::Column,
            direction,
            height,
            width,
            height_mode,
            child_height,
        );

        let _ = self.layout_node(
            child,
            Request {
                width: child_width,
                width_mode,
                height: child_height,
                height_mode,
                owner_width: width,
                owner_height: height,
                direction: ctx.direction,
                pass: Pass::Measure,
            },
        );

        float_max(
            self.measured(child, ctx.main_axis.dimension()),
            style.padding_and_border_for_axis(ctx.main_axis, direction, width),
        )
    }

    /// Give a `display: none` subtree an empty layout.
    pub(super) fn zero_out_layout(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let n = &mut self.nodes[id];
            n.unrounded = ComputedLayout::zeroed();
            n.state.measured = [0.0; 2];
            n.state.invalidate();
            stack.extend_from_slice(&n.children);
        }
    }
}
