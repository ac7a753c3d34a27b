//! [§ 4.1 Absolutely-Positioned Flex Children](https://www.w3.org/TR/css-flexbox-1/#abspos-items)
//!
//! Absolutely positioned children are laid out once their container has
//! its final size. They are sized from their own style or from a pair of
//! opposing offsets, and placed against the container's padding box.
//! Where no offset is given along an axis, the container's
//! `justify-content` or `align-items` decides.

use super::{FlexContext, Pass, Request, bound_axis};
use crate::numeric::{UNDEFINED, is_defined, is_undefined, or_undefined, resolve_value};
use crate::style::{
    Align, Dimension, Display, FlexDirection, Justify, MeasureMode, PositionType, Style, Wrap,
};
use crate::tree::{NodeId, Tree};

/// Where an absolute child lands along an axis without offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Start,
    Center,
    End,
}

impl Placement {
    const fn from_justify(justify: Justify) -> Self {
        match justify {
            Justify::Center => Self::Center,
            Justify::FlexEnd => Self::End,
            Justify::FlexStart
            | Justify::SpaceBetween
            | Justify::SpaceAround
            | Justify::SpaceEvenly => Self::Start,
        }
    }

    /// `wrap-reverse` swaps the cross-start and cross-end edges.
    fn from_align(align: Align, wrap: Wrap) -> Self {
        let at_end = (align == Align::FlexEnd) != (wrap == Wrap::WrapReverse);
        if align == Align::Center {
            Self::Center
        } else if at_end {
            Self::End
        } else {
            Self::Start
        }
    }
}

impl Tree {
    /// STEP 11: size and place every absolutely positioned child.
    pub(super) fn layout_absolute_children(&mut self, ctx: &FlexContext, style: &Style) {
        let children = self.nodes[ctx.node].children.clone();
        for child in children {
            let s = &self.nodes[child].style;
            if s.display == Display::None || s.position_type != PositionType::Absolute {
                continue;
            }
            self.layout_absolute_child(ctx, child);

            let main = Placement::from_justify(style.justify_content);
            let cross = Placement::from_align(self.align_item(ctx.node, child), style.flex_wrap);
            self.place_absolute_child(ctx, style, child, ctx.main_axis, main);
            self.place_absolute_child(ctx, style, child, ctx.cross_axis, cross);
        }
    }

    fn layout_absolute_child(&mut self, ctx: &FlexContext, child: NodeId) {
        let s = self.nodes[child].style;
        let direction = s.direction.resolve(ctx.direction);
        let [container_width, container_height] = self.nodes[ctx.node].state.measured;
        let container_style = self.nodes[ctx.node].style;
        let margin_row = s.margin_for_axis(FlexDirection::Row, direction, ctx.inner_width);
        let margin_column = s.margin_for_axis(FlexDirection::Column, direction, ctx.inner_width);

        let size_along = |axis: FlexDirection, container_size: f32, inner_size: f32| {
            let dim = axis.dimension();
            if s.is_dimension_defined(axis, inner_size) {
                return or_undefined(resolve_value(&s.resolved_dimension(dim), inner_size))
                    + s.margin_for_axis(axis, direction, ctx.inner_width);
            }
            let leading = s.leading_position(axis, direction, inner_size);
            let trailing = s.trailing_position(axis, direction, inner_size);
            match (leading, trailing) {
                (Some(leading), Some(trailing)) => {
                    // Stretched between the two offsets.
                    let borders = container_style.leading_border(axis, ctx.direction)
                        + container_style.trailing_border(axis, ctx.direction);
                    bound_axis(
                        &s,
                        axis,
                        direction,
                        container_size - borders - leading - trailing,
                        inner_size,
                        ctx.inner_width,
                    )
                }
                _ => UNDEFINED,
            }
        };
        let mut width = size_along(FlexDirection::Row, container_width, ctx.inner_width);
        let mut height = size_along(FlexDirection::Column, container_height, ctx.inner_height);

        if let Some(ratio) = s.aspect_ratio {
            if is_undefined(width) && is_defined(height) {
                width = margin_row + (height - margin_column) * ratio;
            } else if is_undefined(height) && is_defined(width) {
                height = margin_column + (width - margin_row) / ratio;
            }
        }

        if is_undefined(width) || is_undefined(height) {
            let mode = |size: f32| {
                if is_undefined(size) {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                }
            };
            let mut width_mode = mode(width);
            let height_mode = mode(height);

            // In a column the container's width still bounds text.
            if !ctx.is_main_row()
                && is_undefined(width)
                && ctx.width_mode != MeasureMode::Undefined
                && is_defined(ctx.inner_width)
                && ctx.inner_width > 0.0
            {
                width = ctx.inner_width;
                width_mode = MeasureMode::AtMost;
            }

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
                    pass: Pass::Measure,
                },
            );
            width = self.measured(child, Dimension::Width) + margin_row;
            height = self.measured(child, Dimension::Height) + margin_column;
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

    /// Set the child's offset from the leading edge of `axis`.
    fn place_absolute_child(
        &mut self,
        ctx: &FlexContext,
        style: &Style,
        child: NodeId,
        axis: FlexDirection,
        placement: Placement,
    ) {
        let s = self.nodes[child].style;
        let direction = s.direction.resolve(ctx.direction);
        let dim = axis.dimension();
        let inner_size = ctx.inner_size(axis);
        let container_size = self.measured(ctx.node, dim);
        let child_size = self.measured(child, dim);
        let leading_border = style.leading_border(axis, ctx.direction);
        let trailing_border = style.trailing_border(axis, ctx.direction);
        let leading_margin = s.leading_margin(axis, direction, ctx.inner_width);
        let trailing_margin = s.trailing_margin(axis, direction, ctx.inner_width);

        let position = if let Some(offset) = s.leading_position(axis, direction, inner_size) {
            leading_border + offset + leading_margin
        } else if let Some(offset) = s.trailing_position(axis, direction, inner_size) {
            container_size - trailing_border - child_size - trailing_margin - offset
        } else {
            let free = container_size
                - leading_border
                - trailing_border
                - child_size
                - leading_margin
                - trailing_margin;
            let start = leading_border + leading_margin;
            match placement {
                Placement::Start => start,
                Placement::Center => start + free / 2.0,
                Placement::End => start + free,
            }
        };
        self.set_leading_position(child, axis, position);
    }
}
