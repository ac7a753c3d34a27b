//! Cross-axis placement.
//!
//! [§ 9.6 Cross-Axis Alignment](https://www.w3.org/TR/css-flexbox-1/#cross-alignment)
//! and [§ 8.4 Packing Flex Lines](https://www.w3.org/TR/css-flexbox-1/#align-content-property)

use super::lines::FlexLine;
use super::{FlexContext, Pass, Request, constrain_max_size_for_mode};
use crate::numeric::{float_eq, float_max, is_undefined};
use crate::style::{Align, FlexDirection, MeasureMode, Style};
use crate::tree::{NodeId, Tree};

impl Tree {
    /// STEP 7 of the container layout: align each item of one line
    /// within that line, stretching where asked.
    pub(super) fn align_line_items(
        &mut self,
        ctx: &FlexContext,
        style: &Style,
        line: &FlexLine,
        container_cross: f32,
        total_line_cross: f32,
    ) {
        let leading_pb_cross =
            style.leading_padding_and_border(ctx.cross_axis, ctx.direction, ctx.owner_width);
        let is_main_row = ctx.is_main_row();
        // Lines of a wrapping container only grow if align-content stretches them.
        let cross_does_not_grow = style.align_content != Align::Stretch && ctx.wraps;

        for child in line.items.clone() {
            let s = self.nodes[child].style;
            let direction = s.direction.resolve(ctx.direction);
            let align = self.align_item(ctx.node, child);
            let leading_auto = s.leading_margin_value(ctx.cross_axis, direction).is_auto();
            let trailing_auto = s.trailing_margin_value(ctx.cross_axis, direction).is_auto();
            let mut leading_cross = leading_pb_cross;

            if align == Align::Stretch && !leading_auto && !trailing_auto {
                if !s.is_dimension_defined(ctx.cross_axis, ctx.inner_cross) {
                    let main_dim = ctx.main_axis.dimension();
                    let measured_main = self.measured(child, main_dim);
                    let child_cross = match s.aspect_ratio {
                        Some(ratio) => {
                            s.margin_for_axis(ctx.cross_axis, direction, ctx.inner_width)
                                + if is_main_row {
                                    measured_main / ratio
                                } else {
                                    measured_main * ratio
                                }
                        }
                        None => line.cross_dim,
                    };
                    let child_main = measured_main
                        + s.margin_for_axis(ctx.main_axis, direction, ctx.inner_width);

                    let (_, child_main) = constrain_max_size_for_mode(
                        &s,
                        ctx.main_axis,
                        direction,
                        ctx.inner_main,
                        ctx.inner_width,
                        MeasureMode::Exactly,
                        child_main,
                    );
                    let (_, child_cross) = constrain_max_size_for_mode(
                        &s,
                        ctx.cross_axis,
                        direction,
                        ctx.inner_cross,
                        ctx.inner_width,
                        MeasureMode::Exactly,
                        child_cross,
                    );

                    let (width, height) = if is_main_row {
                        (child_main, child_cross)
                    } else {
                        (child_cross, child_main)
                    };
                    let mode = |size: f32, loose: bool| {
                        if is_undefined(size) || loose {
                            MeasureMode::Undefined
                        } else {
                            MeasureMode::Exactly
                        }
                    };
                    let _ = self.layout_node(
                        child,
                        Request {
                            width,
                            width_mode: mode(width, !is_main_row && cross_does_not_grow),
                            height,
                            height_mode: mode(height, is_main_row && cross_does_not_grow),
                            owner_width: ctx.inner_width,
                            owner_height: ctx.inner_height,
                            direction: ctx.direction,
                            pass: Pass::Layout,
                        },
                    );
                }
            } else {
                let remaining = container_cross
                    - self.dim_with_margin(child, ctx.cross_axis, ctx.direction, ctx.inner_width);
                if leading_auto && trailing_auto {
                    leading_cross += float_max(0.0, remaining / 2.0);
                } else if leading_auto {
                    leading_cross += float_max(0.0, remaining);
                } else if !trailing_auto {
                    match align {
                        Align::FlexStart => {}
                        Align::Center => leading_cross += remaining / 2.0,
                        _ => leading_cross += remaining,
                    }
                }
            }

            let position = self.leading_position_of(child, ctx.cross_axis);
            self.set_leading_position(
                child,
                ctx.cross_axis,
                position + total_line_cross + leading_cross,
            );
        }
    }

    /// STEP 8: distribute lines along the cross axis and align items
    /// within each line, baselines included.
    pub(super) fn align_content(
        &mut self,
        ctx: &FlexContext,
        style: &Style,
        line_count: usize,
        total_line_cross: f32,
    ) {
        let mut current_lead =
            style.leading_padding_and_border(ctx.cross_axis, ctx.direction, ctx.owner_width);
        let mut cross_dim_lead = 0.0;
        let lines = line_count as f32;

        if !is_undefined(ctx.inner_cross) {
            let remaining = ctx.inner_cross - total_line_cross;
            let has_room = ctx.inner_cross > total_line_cross;
            match style.align_content {
                Align::FlexEnd => current_lead += remaining,
                Align::Center => current_lead += remaining / 2.0,
                Align::Stretch => {
                    if has_room {
                        cross_dim_lead = remaining / lines;
                    }
                }
                Align::SpaceAround => {
                    if has_room {
                        current_lead += remaining / (2.0 * lines);
                        if line_count > 1 {
                            cross_dim_lead = remaining / lines;
                        }
                    } else {
                        current_lead += remaining / 2.0;
                    }
                }
                Align::SpaceBetween => {
                    if has_room && line_count > 1 {
                        cross_dim_lead = remaining / (lines - 1.0);
                    }
                }
                Align::Auto | Align::FlexStart | Align::Baseline => {}
            }
        }

        let children = self.nodes[ctx.node].children.clone();
        let mut end = 0;
        for line_index in 0..line_count {
            let start = end;

            // Height of the line and the tallest ascent on it.
            let mut line_height: f32 = 0.0;
            let mut max_ascent: f32 = 0.0;
            while end < children.len() {
                let child = children[end];
                if !self.is_in_flow(child) {
                    end += 1;
                    continue;
                }
                if self.nodes[child].state.line_index != line_index {
                    break;
                }
                if self.is_layout_dim_defined(child, ctx.cross_axis) {
                    line_height = float_max(
                        line_height,
                        self.dim_with_margin(child, ctx.cross_axis, ctx.direction, ctx.inner_width),
                    );
                }
                if self.align_item(ctx.node, child) == Align::Baseline {
                    let s = &self.nodes[child].style;
                    let direction = s.direction.resolve(ctx.direction);
                    let ascent = self.baseline(child)
                        + s.leading_margin(FlexDirection::Column, direction, ctx.inner_width);
                    max_ascent = float_max(max_ascent, ascent);
                }
                end += 1;
            }
            line_height += cross_dim_lead;

            for child in children[start..end].iter().copied() {
                if self.is_in_flow(child) {
                    self.place_in_line(ctx, child, current_lead, line_height, max_ascent);
                }
            }
            current_lead += line_height;
        }
    }

    /// Position one item inside a line whose cross extent is known.
    fn place_in_line(
        &mut self,
        ctx: &FlexContext,
        child: NodeId,
        lead: f32,
        line_height: f32,
        max_ascent: f32,
    ) {
        let s = self.nodes[child].style;
        let direction = s.direction.resolve(ctx.direction);
        let cross_dim = ctx.cross_axis.dimension();
        let leading_margin = s.leading_margin(ctx.cross_axis, direction, ctx.inner_width);
        let trailing_margin = s.trailing_margin(ctx.cross_axis, direction, ctx.inner_width);

        match self.align_item(ctx.node, child) {
            Align::FlexStart => {
                self.set_leading_position(child, ctx.cross_axis, lead + leading_margin);
            }
            Align::FlexEnd => {
                let size = self.measured(child, cross_dim);
                self.set_leading_position(
                    child,
                    ctx.cross_axis,
                    lead + line_height - trailing_margin - size,
                );
            }
            Align::Center => {
                let size = self.measured(child, cross_dim);
                self.set_leading_position(child, ctx.cross_axis, lead + (line_height - size) / 2.0);
            }
            Align::Stretch => {
                self.set_leading_position(child, ctx.cross_axis, lead + leading_margin);
                if s.is_dimension_defined(ctx.cross_axis, ctx.inner_cross) {
                    return;
                }
                let measured = self.nodes[child].state.measured;
                let (width, height) = if ctx.is_main_row() {
                    let margin = s.margin_for_axis(FlexDirection::Row, direction, ctx.inner_width);
                    (measured[0] + margin, line_height)
                } else {
                    let margin =
                        s.margin_for_axis(FlexDirection::Column, direction, ctx.inner_width);
                    (line_height, measured[1] + margin)
                };
                if float_eq(width, measured[0]) && float_eq(height, measured[1]) {
                    return;
                }
                let _ = self.layout_node(
                    child,
                    Request {
                        width,
                        width_mode: MeasureMode::Exactly,
                        height,
                        height_mode: MeasureMode::Exactly,
                        owner_width: ctx.inner_width,
                        owner_height: ctx.inner_height,
                        direction: ctx.direction,
                        pass: Pass::Layout,
                    },
                );
            }
            Align::Baseline => {
                let offset = s
                    .leading_position(FlexDirection::Column, direction, ctx.inner_cross)
                    .unwrap_or(0.0);
                let top = lead + max_ascent - self.baseline(child) + offset;
                self.set_leading_position(child, FlexDirection::Column, top);
            }
            Align::Auto | Align::SpaceBetween | Align::SpaceAround => {}
        }
    }

    /// STEP 10: with `wrap-reverse`, lines run from the cross-end edge.
    pub(super) fn mirror_cross_axis(&mut self, ctx: &FlexContext) {
        let container_cross = self.measured(ctx.node, ctx.cross_axis.dimension());
        let children = self.nodes[ctx.node].children.clone();
        for child in children {
            if !self.is_in_flow(child) {
                continue;
            }
            let position = self.leading_position_of(child, ctx.cross_axis);
            let size = self.measured(child, ctx.cross_axis.dimension());
            self.set_leading_position(child, ctx.cross_axis, container_cross - position - size);
        }
    }
}
