//! [§ 9.5 Main-Axis Alignment](https://www.w3.org/TR/css-flexbox-1/#main-alignment)

use super::FlexContext;
use super::lines::FlexLine;
use crate::numeric::{float_max, or_undefined};
use crate::style::{FlexDirection, Justify, MeasureMode, Style};
use crate::tree::Tree;

impl Tree {
    /// Place the items of `line` along the main axis and work out how much
    /// space the line takes in both axes.
    ///
    /// Free space goes to auto margins first; only when there are none does
    /// `justify-content` distribute it.
    pub(super) fn justify_main_axis(
        &mut self,
        ctx: &FlexContext,
        style: &Style,
        line: &mut FlexLine,
        available_main: f32,
    ) {
        let leading_pb_main =
            style.leading_padding_and_border(ctx.main_axis, ctx.direction, ctx.owner_width);
        let trailing_pb_main =
            style.trailing_padding_and_border(ctx.main_axis, ctx.direction, ctx.owner_width);

        // A container that may shrink to its content has no free space to
        // hand out beyond what its min size demands.
        if ctx.main_mode == MeasureMode::AtMost && line.remaining_free_space > 0.0 {
            line.remaining_free_space = match style.min_size(ctx.main_axis, ctx.main_owner_size) {
                Some(min) => {
                    let min_inner = min - leading_pb_main - trailing_pb_main;
                    let occupied = available_main - line.remaining_free_space;
                    float_max(0.0, min_inner - occupied)
                }
                None => 0.0,
            };
        }
        let remaining = line.remaining_free_space;

        let auto_margins = line
            .items
            .iter()
            .map(|child| {
                let s = &self.nodes[*child].style;
                let direction = s.direction.resolve(ctx.direction);
                usize::from(s.leading_margin_value(ctx.main_axis, direction).is_auto())
                    + usize::from(s.trailing_margin_value(ctx.main_axis, direction).is_auto())
            })
            .sum::<usize>();

        let mut leading_main = 0.0;
        let mut between_main = 0.0;
        let item_count = line.items.len() as f32;
        if auto_margins == 0 {
            match style.justify_content {
                Justify::FlexStart => {}
                Justify::Center => leading_main = remaining / 2.0,
                Justify::FlexEnd => leading_main = remaining,
                Justify::SpaceBetween => {
                    if line.items.len() > 1 {
                        between_main = float_max(remaining, 0.0) / (item_count - 1.0);
                    }
                }
                Justify::SpaceEvenly => {
                    between_main = remaining / (item_count + 1.0);
                    leading_main = between_main;
                }
                Justify::SpaceAround => {
                    between_main = remaining / item_count;
                    leading_main = between_main / 2.0;
                }
            }
        }
        let auto_margin_share = if auto_margins == 0 {
            0.0
        } else {
            remaining / auto_margins as f32
        };

        let is_baseline_layout = self.is_baseline_layout(ctx.node);
        let can_skip_flex = !ctx.pass.is_layout() && ctx.cross_mode == MeasureMode::Exactly;
        let mut main_dim = leading_pb_main + leading_main;
        let mut cross_dim: f32 = 0.0;
        let mut max_ascent: f32 = 0.0;
        let mut max_descent: f32 = 0.0;

        for child in line.items.clone() {
            let s = self.nodes[child].style;
            let direction = s.direction.resolve(ctx.direction);

            if s.leading_margin_value(ctx.main_axis, direction).is_auto() {
                main_dim += auto_margin_share;
            }
            if ctx.pass.is_layout() {
                let position = self.leading_position_of(child, ctx.main_axis);
                self.set_leading_position(child, ctx.main_axis, position + main_dim);
            }
            if s.trailing_margin_value(ctx.main_axis, direction).is_auto() {
                main_dim += auto_margin_share;
            }

            if can_skip_flex {
                // Flexing was skipped, so only the bases are known.
                main_dim += between_main
                    + s.margin_for_axis(ctx.main_axis, direction, ctx.inner_width)
                    + or_undefined(self.nodes[child].state.computed_flex_basis);
                cross_dim = ctx.inner_cross;
                continue;
            }

            main_dim += between_main
                + self.dim_with_margin(child, ctx.main_axis, ctx.direction, ctx.inner_width);
            if is_baseline_layout {
                let margin_column =
                    s.margin_for_axis(FlexDirection::Column, direction, ctx.inner_width);
                let ascent = self.baseline(child)
                    + s.leading_margin(FlexDirection::Column, direction, ctx.inner_width);
                let descent = self.nodes[child].state.measured[1] + margin_column - ascent;
                max_ascent = float_max(max_ascent, ascent);
                max_descent = float_max(max_descent, descent);
            } else {
                cross_dim = float_max(
                    cross_dim,
                    self.dim_with_margin(child, ctx.cross_axis, ctx.direction, ctx.inner_width),
                );
            }
        }

        main_dim += trailing_pb_main;
        if is_baseline_layout {
            cross_dim = max_ascent + max_descent;
        }
        line.main_dim = main_dim;
        line.cross_dim = cross_dim;
    }
}
