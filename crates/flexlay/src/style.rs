//! Style model: values, edges, keywords and the per-node [`Style`].
//!
//! [§ 7 Flexibility](https://www.w3.org/TR/css-flexbox-1/#flexibility)
//!
//! The engine never parses style text. Callers hand it already-resolved
//! numbers through the setters on [`crate::Tree`]; this module owns the rules
//! for turning those numbers into per-axis quantities the algorithm uses.

mod edges;
mod enums;
mod value;

use serde::Serialize;

pub use edges::{Edge, EdgeValues, PhysicalEdge};
pub use enums::{
    Align, Dimension, Direction, Display, FlexDirection, Justify, MeasureMode, NodeType, Overflow,
    PositionType, Wrap,
};
pub use value::StyleValue;

use crate::numeric::{resolve_margin, resolve_value};

const DEFAULT_FLEX_GROW: f32 = 0.0;
const DEFAULT_FLEX_SHRINK: f32 = 0.0;
const WEB_DEFAULT_FLEX_SHRINK: f32 = 1.0;

/// Every style property the layout algorithm reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    /// Writing direction.
    pub direction: Direction,
    /// Main axis of this container.
    pub flex_direction: FlexDirection,
    /// Main-axis distribution of free space.
    pub justify_content: Justify,
    /// Distribution of lines in a multi-line container.
    pub align_content: Align,
    /// Default cross-axis alignment of children.
    pub align_items: Align,
    /// Cross-axis alignment of this node inside its owner.
    pub align_self: Align,
    /// In-flow or absolutely positioned.
    pub position_type: PositionType,
    /// Single- or multi-line.
    pub flex_wrap: Wrap,
    /// Overflow handling.
    pub overflow: Overflow,
    /// Whether this node is laid out.
    pub display: Display,
    /// The `flex` shorthand: positive sets grow, negative sets shrink.
    pub flex: Option<f32>,
    /// [§ 7.1 flex-grow](https://www.w3.org/TR/css-flexbox-1/#flex-grow-property)
    pub flex_grow: Option<f32>,
    /// [§ 7.2 flex-shrink](https://www.w3.org/TR/css-flexbox-1/#flex-shrink-property)
    pub flex_shrink: Option<f32>,
    /// [§ 7.3 flex-basis](https://www.w3.org/TR/css-flexbox-1/#flex-basis-property)
    pub flex_basis: StyleValue,
    /// Outer spacing.
    pub margin: EdgeValues,
    /// Offsets for relative and absolute positioning.
    pub position: EdgeValues,
    /// Inner spacing.
    pub padding: EdgeValues,
    /// Border widths. Only point values are honored.
    pub border: EdgeValues,
    /// `[width, height]`.
    pub dimensions: [StyleValue; 2],
    /// `[min-width, min-height]`.
    pub min_dimensions: [StyleValue; 2],
    /// `[max-width, max-height]`.
    pub max_dimensions: [StyleValue; 2],
    /// Width divided by height, if fixed.
    pub aspect_ratio: Option<f32>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: StyleValue::Auto,
            margin: EdgeValues::new(),
            position: EdgeValues::new(),
            padding: EdgeValues::new(),
            border: EdgeValues::new(),
            dimensions: [StyleValue::Auto; 2],
            min_dimensions: [StyleValue::Undefined; 2],
            max_dimensions: [StyleValue::Undefined; 2],
            aspect_ratio: None,
        }
    }
}

impl Style {
    /// The defaults browsers use: row direction, stretched lines.
    #[must_use]
    pub fn web() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            align_content: Align::Stretch,
            ..Self::default()
        }
    }

    /// The size to use for `dim`. A max equal to the min pins the size.
    #[must_use]
    pub fn resolved_dimension(&self, dim: Dimension) -> StyleValue {
        let max = self.max_dimensions[dim.index()];
        if !max.is_undefined() && max == self.min_dimensions[dim.index()] {
            max
        } else {
            self.dimensions[dim.index()]
        }
    }

    /// Whether the size along `axis` is known from style alone.
    #[must_use]
    pub fn is_dimension_defined(&self, axis: FlexDirection, owner_size: f32) -> bool {
        match self.resolved_dimension(axis.dimension()) {
            StyleValue::Auto | StyleValue::Undefined => false,
            StyleValue::Point(value) => value >= 0.0,
            StyleValue::Percent(value) => value >= 0.0 && !owner_size.is_nan(),
        }
    }

    /// Resolved min size along `axis`.
    #[must_use]
    pub fn min_size(&self, axis: FlexDirection, owner_size: f32) -> Option<f32> {
        resolve_value(&self.min_dimensions[axis.dimension().index()], owner_size)
    }

    /// Resolved max size along `axis`.
    #[must_use]
    pub fn max_size(&self, axis: FlexDirection, owner_size: f32) -> Option<f32> {
        resolve_value(&self.max_dimensions[axis.dimension().index()], owner_size)
    }

    /// Effective flex-grow. Roots never flex.
    #[must_use]
    pub fn resolve_flex_grow(&self, has_owner: bool) -> f32 {
        if !has_owner {
            return 0.0;
        }
        if let Some(grow) = self.flex_grow {
            return grow;
        }
        match self.flex {
            Some(flex) if flex > 0.0 => flex,
            _ => DEFAULT_FLEX_GROW,
        }
    }

    /// Effective flex-shrink. Roots never flex.
    #[must_use]
    pub fn resolve_flex_shrink(&self, has_owner: bool, web_defaults: bool) -> f32 {
        if !has_owner {
            return 0.0;
        }
        if let Some(shrink) = self.flex_shrink {
            return shrink;
        }
        match self.flex {
            Some(flex) if !web_defaults && flex < 0.0 => -flex,
            _ if web_defaults => WEB_DEFAULT_FLEX_SHRINK,
            _ => DEFAULT_FLEX_SHRINK,
        }
    }

    /// Effective flex-basis, taking the `flex` shorthand into account.
    #[must_use]
    pub fn resolved_flex_basis(&self, web_defaults: bool) -> StyleValue {
        if !self.flex_basis.is_auto() && !self.flex_basis.is_undefined() {
            return self.flex_basis;
        }
        match self.flex {
            Some(flex) if flex > 0.0 => {
                if web_defaults {
                    StyleValue::Auto
                } else {
                    StyleValue::ZERO
                }
            }
            _ => StyleValue::Auto,
        }
    }

    /// In-flow and able to grow or shrink.
    #[must_use]
    pub fn is_flexible(&self, has_owner: bool, web_defaults: bool) -> bool {
        self.position_type == PositionType::Relative
            && (self.resolve_flex_grow(has_owner) != 0.0
                || self.resolve_flex_shrink(has_owner, web_defaults) != 0.0)
    }

    // ----- margins -----

    /// Raw margin value on the leading side of `axis`, for auto detection.
    #[must_use]
    pub fn leading_margin_value(&self, axis: FlexDirection, direction: Direction) -> StyleValue {
        self.margin
            .resolve(axis.leading_edge(), direction, StyleValue::ZERO)
    }

    /// Raw margin value on the trailing side of `axis`.
    #[must_use]
    pub fn trailing_margin_value(&self, axis: FlexDirection, direction: Direction) -> StyleValue {
        self.margin
            .resolve(axis.trailing_edge(), direction, StyleValue::ZERO)
    }

    /// Margin on one physical side. Percentages resolve against the owner width.
    #[must_use]
    pub fn margin_on(&self, edge: PhysicalEdge, direction: Direction, width: f32) -> f32 {
        resolve_margin(&self.margin.resolve(edge, direction, StyleValue::ZERO), width)
            .unwrap_or(0.0)
    }

    /// Leading margin along `axis`.
    #[must_use]
    pub fn leading_margin(&self, axis: FlexDirection, direction: Direction, width: f32) -> f32 {
        self.margin_on(axis.leading_edge(), direction, width)
    }

    /// Trailing margin along `axis`.
    #[must_use]
    pub fn trailing_margin(&self, axis: FlexDirection, direction: Direction, width: f32) -> f32 {
        self.margin_on(axis.trailing_edge(), direction, width)
    }

    /// Leading plus trailing margin along `axis`.
    #[must_use]
    pub fn margin_for_axis(&self, axis: FlexDirection, direction: Direction, width: f32) -> f32 {
        self.leading_margin(axis, direction, width) + self.trailing_margin(axis, direction, width)
    }

    // ----- padding and border -----

    /// Padding on one physical side, never negative.
    #[must_use]
    pub fn padding_on(&self, edge: PhysicalEdge, direction: Direction, width: f32) -> f32 {
        resolve_value(&self.padding.resolve(edge, direction, StyleValue::ZERO), width)
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Border width on one physical side, never negative.
    #[must_use]
    pub fn border_on(&self, edge: PhysicalEdge, direction: Direction) -> f32 {
        match self.border.resolve(edge, direction, StyleValue::ZERO) {
            StyleValue::Point(value) => value.max(0.0),
            _ => 0.0,
        }
    }

    /// Border on the leading side of `axis`.
    #[must_use]
    pub fn leading_border(&self, axis: FlexDirection, direction: Direction) -> f32 {
        self.border_on(axis.leading_edge(), direction)
    }

    /// Border on the trailing side of `axis`.
    #[must_use]
    pub fn trailing_border(&self, axis: FlexDirection, direction: Direction) -> f32 {
        self.border_on(axis.trailing_edge(), direction)
    }

    /// Padding plus border on the leading side of `axis`.
    #[must_use]
    pub fn leading_padding_and_border(
        &self,
        axis: FlexDirection,
        direction: Direction,
        width: f32,
    ) -> f32 {
        self.padding_on(axis.leading_edge(), direction, width)
            + self.border_on(axis.leading_edge(), direction)
    }

    /// Padding plus border on the trailing side of `axis`.
    #[must_use]
    pub fn trailing_padding_and_border(
        &self,
        axis: FlexDirection,
        direction: Direction,
        width: f32,
    ) -> f32 {
        self.padding_on(axis.trailing_edge(), direction, width)
            + self.border_on(axis.trailing_edge(), direction)
    }

    /// Padding plus border on both sides of `axis`.
    #[must_use]
    pub fn padding_and_border_for_axis(
        &self,
        axis: FlexDirection,
        direction: Direction,
        width: f32,
    ) -> f32 {
        self.leading_padding_and_border(axis, direction, width)
            + self.trailing_padding_and_border(axis, direction, width)
    }

    // ----- position offsets -----

    /// Whether a leading offset is set along `axis`.
    #[must_use]
    pub fn is_leading_position_defined(&self, axis: FlexDirection, direction: Direction) -> bool {
        !self
            .position
            .resolve(axis.leading_edge(), direction, StyleValue::Undefined)
            .is_undefined()
    }

    /// Whether a trailing offset is set along `axis`.
    #[must_use]
    pub fn is_trailing_position_defined(&self, axis: FlexDirection, direction: Direction) -> bool {
        !self
            .position
            .resolve(axis.trailing_edge(), direction, StyleValue::Undefined)
            .is_undefined()
    }

    /// Leading offset along `axis`, resolved against `axis_size`.
    #[must_use]
    pub fn leading_position(
        &self,
        axis: FlexDirection,
        direction: Direction,
        axis_size: f32,
    ) -> Option<f32> {
        resolve_value(
            &self
                .position
                .resolve(axis.leading_edge(), direction, StyleValue::Undefined),
            axis_size,
        )
    }

    /// Trailing offset along `axis`, resolved against `axis_size`.
    #[must_use]
    pub fn trailing_position(
        &self,
        axis: FlexDirection,
        direction: Direction,
        axis_size: f32,
    ) -> Option<f32> {
        resolve_value(
            &self
                .position
                .resolve(axis.trailing_edge(), direction, StyleValue::Undefined),
            axis_size,
        )
    }

    /// Offset of a relatively positioned node along `axis`.
    ///
    /// A leading offset wins; otherwise the trailing offset pulls the node
    /// back.
    #[must_use]
    pub fn relative_position(
        &self,
        axis: FlexDirection,
        direction: Direction,
        axis_size: f32,
    ) -> f32 {
        if self.is_leading_position_defined(axis, direction) {
            return self
                .leading_position(axis, direction, axis_size)
                .unwrap_or(0.0);
        }
        -self
            .trailing_position(axis, direction, axis_size)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flex_shorthand() {
        let style = Style {
            flex: Some(2.0),
            ..Style::default()
        };
        assert_eq!(style.resolve_flex_grow(true), 2.0);
        assert_eq!(style.resolve_flex_grow(false), 0.0);
        assert_eq!(style.resolved_flex_basis(false), StyleValue::ZERO);
        assert_eq!(style.resolved_flex_basis(true), StyleValue::Auto);

        let style = Style {
            flex: Some(-1.0),
            ..Style::default()
        };
        assert_eq!(style.resolve_flex_shrink(true, false), 1.0);
        assert_eq!(style.resolve_flex_grow(true), 0.0);
    }

    #[test]
    fn test_web_default_shrink() {
        let style = Style::web();
        assert_eq!(style.resolve_flex_shrink(true, true), 1.0);
        assert_eq!(Style::default().resolve_flex_shrink(true, false), 0.0);
    }

    #[test]
    fn test_min_equal_max_pins_dimension() {
        let mut style = Style::default();
        style.min_dimensions[0] = StyleValue::point(40.0);
        style.max_dimensions[0] = StyleValue::point(40.0);
        assert_eq!(
            style.resolved_dimension(Dimension::Width),
            StyleValue::point(40.0)
        );
        assert!(style.is_dimension_defined(FlexDirection::Row, f32::NAN));
    }

    #[test]
    fn test_percent_dimension_needs_owner() {
        let mut style = Style::default();
        style.dimensions[1] = StyleValue::percent(50.0);
        assert!(!style.is_dimension_defined(FlexDirection::Column, f32::NAN));
        assert!(style.is_dimension_defined(FlexDirection::Column, 200.0));
    }

    #[test]
    fn test_relative_position_prefers_leading() {
        let mut style = Style::default();
        style.position.set(Edge::Right, StyleValue::point(5.0));
        assert_eq!(
            style.relative_position(FlexDirection::Row, Direction::Ltr, 100.0),
            -5.0
        );
        style.position.set(Edge::Left, StyleValue::point(7.0));
        assert_eq!(
            style.relative_position(FlexDirection::Row, Direction::Ltr, 100.0),
            7.0
        );
    }
}
