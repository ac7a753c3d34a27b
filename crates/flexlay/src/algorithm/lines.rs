//! Breaking items into lines and resolving their flexible lengths.
//!
//! [§ 9.3 Main Size Determination](https://www.w3.org/TR/css-flexbox-1/#main-sizing)

use super::{
    FlexContext, Pass, Request, bound_axis, bound_axis_within_min_max, constrain_max_size_for_mode,
};
use crate::numeric::{is_defined, is_undefined, or_undefined, resolve_value};
use crate::style::{Align, MeasureMode, StyleValue};
use crate::tree::{NodeId, Tree};

/// One flex line and the running totals used to size it.
#[derive(Debug, Default)]
pub(crate) struct FlexLine {
    /// In-flow items on this line, in order.
    pub items: Vec<NodeId>,
    /// Index of the first child after this line.
    pub end: usize,
    /// Outer hypothetical main sizes of the items, summed.
    pub size_consumed: f32,
    pub total_flex_grow: f32,
    /// Sum of `-shrink * basis`; negative whenever anything can shrink.
    pub total_flex_shrink_scaled: f32,
    pub remaining_free_space: f32,
    /// Main size the line ends up using, padding and border included.
    pub main_dim: f32,
    /// Cross size of the line.
    pub cross_dim: f32,
}

impl Tree {
    /// [§ 9.3 step 5](https://www.w3.org/TR/css-flexbox-1/#algo-line-break)
    ///
    /// Collect the items of line `line_index`, starting at child `start`.
    pub(super) fn collect_line(
        &mut self,
        ctx: &FlexContext,
        start: usize,
        line_index: usize,
    ) -> FlexLine {
        let children = self.nodes[ctx.node].children.clone();
        let mut line = FlexLine {
            end: start,
            ..FlexLine::default()
        };

        while line.end < children.len() {
            let child = children[line.end];
            if !self.is_in_flow(child) {
                line.end += 1;
                continue;
            }
            self.nodes[child].state.line_index = line_index;

            let style = self.nodes[child].style;
            let direction = style.direction.resolve(ctx.direction);
            let margin_main = style.margin_for_axis(ctx.main_axis, direction, ctx.inner_width);
            let basis = or_undefined(self.nodes[child].state.computed_flex_basis);
            let hypothetical =
                bound_axis_within_min_max(&style, ctx.main_axis, basis, ctx.main_owner_size);

            // An item that overflows a wrapping line starts the next one,
            // unless it is the first on its line.
            if ctx.wraps
                && !line.items.is_empty()
                && line.size_consumed + hypothetical + margin_main > ctx.inner_main
            {
                break;
            }

            line.size_consumed += hypothetical + margin_main;
            if self.is_flexible(child) {
                line.total_flex_grow += self.flex_grow(child);
                // Shrinking is proportional to the basis as well as the factor.
                line.total_flex_shrink_scaled += -self.flex_shrink(child) * basis;
            }
            line.items.push(child);
            line.end += 1;
        }

        if line.total_flex_grow > 0.0 && line.total_flex_grow < 1.0 {
            line.total_flex_grow = 1.0;
        }
        line
    }

    /// [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
    ///
    /// Distribute the line's free space, then size every item along both
    /// axes. Items that stretch in the cross axis are only measured here;
    /// they get their final layout once the line's cross size is known.
    pub(super) fn resolve_flexible_length(
        &mut self,
        ctx: &FlexContext,
        line: &mut FlexLine,
        available_main: f32,
    ) {
        let original_free_space = line.remaining_free_space;
        self.freeze_constrained_items(ctx, line, available_main);
        let distributed = self.distribute_free_space(ctx, line, available_main);
        line.remaining_free_space = original_free_space - distributed;
    }

    /// First pass: items whose min or max would clamp their flexed size
    /// take their clamped size and drop out of the distribution.
    fn freeze_constrained_items(
        &self,
        ctx: &FlexContext,
        line: &mut FlexLine,
        available_main: f32,
    ) {
        let mut delta_free_space = 0.0;
        for child in &line.items {
            let style = &self.nodes[*child].style;
            let direction = style.direction.resolve(ctx.direction);
            let basis = bound_axis_within_min_max(
                style,
                ctx.main_axis,
                or_undefined(self.nodes[*child].state.computed_flex_basis),
                ctx.main_owner_size,
            );

            if line.remaining_free_space < 0.0 {
                let scaled_shrink = -self.flex_shrink(*child) * basis;
                if is_defined(scaled_shrink) && scaled_shrink != 0.0 {
                    let base = basis
                        + line.remaining_free_space / line.total_flex_shrink_scaled * scaled_shrink;
                    let bound = bound_axis(
                        style,
                        ctx.main_axis,
                        direction,
                        base,
                        available_main,
                        ctx.inner_width,
                    );
                    if is_defined(base) && is_defined(bound) && base != bound {
                        delta_free_space += bound - basis;
                        line.total_flex_shrink_scaled -= scaled_shrink;
                    }
                }
            } else if is_defined(line.remaining_free_space) && line.remaining_free_space > 0.0 {
                let grow = self.flex_grow(*child);
                if is_defined(grow) && grow != 0.0 {
                    let base = basis + line.remaining_free_space / line.total_flex_grow * grow;
                    let bound = bound_axis(
                        style,
                        ctx.main_axis,
                        direction,
                        base,
                        available_main,
                        ctx.inner_width,
                    );
                    if is_defined(base) && is_defined(bound) && base != bound {
                        delta_free_space += bound - basis;
                        line.total_flex_grow -= grow;
                    }
                }
            }
        }
        line.remaining_free_space -= delta_free_space;
    }

    /// Second pass: give every item its share and lay it out at that size.
    ///
    /// Returns the space actually handed out.
    fn distribute_free_space(
        &mut self,
        ctx: &FlexContext,
        line: &FlexLine,
        available_main: f32,
    ) -> f32 {
        let is_main_row = ctx.is_main_row();
        let mut delta_free_space = 0.0;

        for child in line.items.clone() {
            let style = self.nodes[child].style;
            let direction = style.direction.resolve(ctx.direction);
            let basis = bound_axis_within_min_max(
                &style,
                ctx.main_axis,
                or_undefined(self.nodes[child].state.computed_flex_basis),
                ctx.main_owner_size,
            );

            let mut main_size = basis;
            if is_defined(line.remaining_free_space) && line.remaining_free_space < 0.0 {
                let scaled_shrink = -self.flex_shrink(child) * basis;
                if scaled_shrink != 0.0 {
                    let size = if line.total_flex_shrink_scaled == 0.0 {
                        basis + scaled_shrink
                    } else {
                        basis
                            + (line.remaining_free_space / line.total_flex_shrink_scaled)
                                * scaled_shrink
                    };
                    main_size = bound_axis(
                        &style,
                        ctx.main_axis,
                        direction,
                        size,
                        available_main,
                        ctx.inner_width,
                    );
                }
            } else if is_defined(line.remaining_free_space) && line.remaining_free_space > 0.0 {
                let grow = self.flex_grow(child);
                if is_defined(grow) && grow != 0.0 {
                    main_size = bound_axis(
                        &style,
                        ctx.main_axis,
                        direction,
                        basis + line.remaining_free_space / line.total_flex_grow * grow,
                        available_main,
                        ctx.inner_width,
                    );
                }
            }
            delta_free_space += main_size - basis;

            let margin_main = style.margin_for_axis(ctx.main_axis, direction, ctx.inner_width);
            let margin_cross = style.margin_for_axis(ctx.cross_axis, direction, ctx.inner_width);
            let cross_dim = ctx.cross_axis.dimension();
            let cross_defined = style.is_dimension_defined(ctx.cross_axis, ctx.inner_cross);
            let auto_cross_margin = style
                .leading_margin_value(ctx.cross_axis, direction)
                .is_auto()
                || style
                    .trailing_margin_value(ctx.cross_axis, direction)
                    .is_auto();
            let stretches = self.align_item(ctx.node, child) == Align::Stretch;

            let child_main = main_size + margin_main;
            let (cross_mode, child_cross) = if let Some(ratio) = style.aspect_ratio {
                let content = if is_main_row {
                    (child_main - margin_main) / ratio
                } else {
                    (child_main - margin_main) * ratio
                };
                (MeasureMode::Exactly, content + margin_cross)
            } else if is_defined(ctx.inner_cross)
                && !cross_defined
                && ctx.cross_mode == MeasureMode::Exactly
                && !(ctx.wraps && ctx.flex_basis_overflows)
                && stretches
                && !auto_cross_margin
            {
                (MeasureMode::Exactly, ctx.inner_cross)
            } else if !cross_defined {
                let mode = if is_undefined(ctx.inner_cross) {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::AtMost
                };
                (mode, ctx.inner_cross)
            } else {
                let value = style.resolved_dimension(cross_dim);
                let size = or_undefined(resolve_value(&value, ctx.inner_cross)) + margin_cross;
                // A percentage of a cross size that is not final yet is only a hint.
                let loose_percent = matches!(value, StyleValue::Percent(_))
                    && ctx.cross_mode != MeasureMode::Exactly;
                let mode = if is_undefined(size) || loose_percent {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                };
                (mode, size)
            };

            let (main_mode, child_main) = constrain_max_size_for_mode(
                &style,
                ctx.main_axis,
                direction,
                available_main,
                ctx.inner_width,
                MeasureMode::Exactly,
                child_main,
            );
            let (cross_mode, child_cross) = constrain_max_size_for_mode(
                &style,
                ctx.cross_axis,
                direction,
                ctx.inner_cross,
                ctx.inner_width,
                cross_mode,
                child_cross,
            );

            let requires_stretch_layout = !cross_defined && stretches && !auto_cross_margin;
            let (width, width_mode, height, height_mode) = if is_main_row {
                (child_main, main_mode, child_cross, cross_mode)
            } else {
                (child_cross, cross_mode, child_main, main_mode)
            };
            let pass = if ctx.pass.is_layout() && !requires_stretch_layout {
                Pass::Layout
            } else {
                Pass::Measure
            };
            let _ = self.layout_node(
                child,
                Request {
                    width,
                    width_mode,
                    height,
                    height_mode,
                    owner_width: ctx.inner_width,
                    owner_height: ctx.inner_height,
                    direction: ctx.direction,
                    pass,
                },
            );
            if self.nodes[child].unrounded.had_overflow {
                self.nodes[ctx.node].unrounded.had_overflow = true;
            }
        }
        delta_free_space
    }
}
