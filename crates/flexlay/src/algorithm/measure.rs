//! Sizing nodes that have no flex items to lay out.

use std::sync::Arc;

use super::{Request, bound_axis};
use crate::config::LogLevel;
use crate::instrumentation::{Marker, MarkerSection};
use crate::layout::{MeasureInput, Size};
use crate::numeric::{float_max, is_defined, is_undefined};
use crate::style::{Direction, FlexDirection, MeasureMode, Style};
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Size a leaf through its measure callback.
    ///
    /// The callback sees the content box. Axes given `Exactly` keep the
    /// size they were given; the others take the callback's answer.
    pub(super) fn measure_leaf(
        &mut self,
        node: NodeId,
        style: &Style,
        direction: Direction,
        request: &Request,
    ) {
        let owner_width = request.owner_width;
        let pb_row = style.padding_and_border_for_axis(FlexDirection::Row, direction, owner_width);
        let pb_column =
            style.padding_and_border_for_axis(FlexDirection::Column, direction, owner_width);
        let margin_row = style.margin_for_axis(FlexDirection::Row, direction, owner_width);
        let margin_column = style.margin_for_axis(FlexDirection::Column, direction, owner_width);

        let bound_width = |value: f32| {
            bound_axis(
                style,
                FlexDirection::Row,
                direction,
                value,
                request.owner_width,
                owner_width,
            )
        };
        let bound_height = |value: f32| {
            bound_axis(
                style,
                FlexDirection::Column,
                direction,
                value,
                request.owner_height,
                owner_width,
            )
        };

        if request.width_mode == MeasureMode::Exactly && request.height_mode == MeasureMode::Exactly
        {
            // Both sides are fixed, so the content has nothing to say.
            self.nodes[node].state.measured = [
                bound_width(request.width - margin_row),
                bound_height(request.height - margin_column),
            ];
            return;
        }

        // Never ask the callback about a negative box.
        let inner = |available: f32, margin: f32, padding_and_border: f32| {
            if is_undefined(available) {
                available
            } else {
                float_max(0.0, available - margin - padding_and_border)
            }
        };
        let input = MeasureInput {
            width: inner(request.width, margin_row, pb_row),
            width_mode: request.width_mode,
            height: inner(request.height, margin_column, pb_column),
            height_mode: request.height_mode,
        };
        let size = self.call_measure(node, input);

        let content_sized =
            |mode: MeasureMode| matches!(mode, MeasureMode::Undefined | MeasureMode::AtMost);
        self.nodes[node].state.measured = [
            bound_width(if content_sized(request.width_mode) {
                size.width + pb_row
            } else {
                request.width - margin_row
            }),
            bound_height(if content_sized(request.height_mode) {
                size.height + pb_column
            } else {
                request.height - margin_column
            }),
        ];
    }

    /// Invoke the measure callback, sanitizing what it returns.
    fn call_measure(&mut self, node: NodeId, input: MeasureInput) -> Size {
        let n = &self.nodes[node];
        let Some(measure) = n.measure.as_ref().map(Arc::clone) else {
            return Size::default();
        };
        let config = Arc::clone(&n.config);

        let size = {
            let _section = MarkerSection::begin(&config, Marker::Measure, node);
            measure(input)
        };
        self.stats.measure_callbacks += 1;

        #[cfg(feature = "layout-trace")]
        log::trace!(
            target: "flexlay",
            "{node:?} measure({}, {}, {}, {}) -> {}x{}",
            input.width,
            input.width_mode,
            input.height,
            input.height_mode,
            size.width,
            size.height
        );

        let sanitize = |value: f32, axis: &str| {
            if is_defined(value) && value >= 0.0 {
                return value;
            }
            config.log(
                Some(node),
                LogLevel::Warn,
                &format!("measure function returned {value} for {axis}; using 0"),
            );
            0.0
        };
        Size::new(
            sanitize(size.width, "width"),
            sanitize(size.height, "height"),
        )
    }

    /// A container with no children is as big as its padding and border
    /// unless it was given an exact size.
    pub(super) fn measure_empty(
        &mut self,
        node: NodeId,
        style: &Style,
        direction: Direction,
        request: &Request,
    ) {
        let owner_width = request.owner_width;
        let size_along = |axis: FlexDirection, available: f32, mode: MeasureMode, owner_size: f32| {
            let value = match mode {
                MeasureMode::Undefined | MeasureMode::AtMost => {
                    style.padding_and_border_for_axis(axis, direction, owner_width)
                }
                MeasureMode::Exactly => {
                    available - style.margin_for_axis(axis, direction, owner_width)
                }
            };
            bound_axis(style, axis, direction, value, owner_size, owner_width)
        };
        self.nodes[node].state.measured = [
            size_along(
                FlexDirection::Row,
                request.width,
                request.width_mode,
                request.owner_width,
            ),
            size_along(
                FlexDirection::Column,
                request.height,
                request.height_mode,
                request.owner_height,
            ),
        ];
    }

    /// In a measure pass, size a container whose constraints leave no room
    /// for its content to matter. Returns `false` if the children must be
    /// visited after all.
    pub(super) fn measure_fixed_size(
        &mut self,
        node: NodeId,
        style: &Style,
        direction: Direction,
        request: &Request,
    ) -> bool {
        let squeezed = |available: f32, mode: MeasureMode| {
            is_defined(available) && mode == MeasureMode::AtMost && available <= 0.0
        };
        let fixed = squeezed(request.width, request.width_mode)
            || squeezed(request.height, request.height_mode)
            || (request.width_mode == MeasureMode::Exactly
                && request.height_mode == MeasureMode::Exactly);
        if !fixed {
            return false;
        }

        let owner_width = request.owner_width;
        let size_along = |axis: FlexDirection, available: f32, mode: MeasureMode, owner_size: f32| {
            let negative_limit = mode == MeasureMode::AtMost && available < 0.0;
            let value = if is_undefined(available) || negative_limit {
                0.0
            } else {
                available - style.margin_for_axis(axis, direction, owner_width)
            };
            bound_axis(style, axis, direction, value, owner_size, owner_width)
        };
        self.nodes[node].state.measured = [
            size_along(
                FlexDirection::Row,
                request.width,
                request.width_mode,
                request.owner_width,
            ),
            size_along(
                FlexDirection::Column,
                request.height,
                request.height_mode,
                request.owner_height,
            ),
        ];
        true
    }
}
