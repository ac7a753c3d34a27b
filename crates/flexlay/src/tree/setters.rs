//! Style setters.
//!
//! Each setter writes one property and, if the value actually changed,
//! dirties the node and its ancestors. Writing an equal value is a no-op so
//! callers can re-apply a whole style without invalidating layout.

use super::{NodeId, Tree};
use crate::error::TreeError;
use crate::style::{
    Align, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType, Style,
    StyleValue, Wrap,
};

/// NaN means "unset" for optional factors.
fn optional(value: f32) -> Option<f32> {
    (!value.is_nan()).then_some(value)
}

/// Same normalization as the `StyleValue` constructors, for values built by hand.
const fn normalized(value: StyleValue) -> StyleValue {
    match value {
        StyleValue::Point(v) => StyleValue::point(v),
        StyleValue::Percent(v) => StyleValue::percent(v),
        other => other,
    }
}

macro_rules! keyword_setters {
    ($($(#[$doc:meta])* $name:ident => $field:ident: $ty:ty;)*) => {
        impl Tree {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Fails if the node is unknown or sealed.
                pub fn $name(&mut self, node: NodeId, value: $ty) -> Result<(), TreeError> {
                    self.update_style(node, |style| style.$field = value)
                }
            )*
        }
    };
}

macro_rules! factor_setters {
    ($($(#[$doc:meta])* $name:ident => $field:ident;)*) => {
        impl Tree {
            $(
                $(#[$doc])*
                /// NaN clears the value.
                ///
                /// # Errors
                ///
                /// Fails if the node is unknown or sealed.
                pub fn $name(&mut self, node: NodeId, value: f32) -> Result<(), TreeError> {
                    self.update_style(node, |style| style.$field = optional(value))
                }
            )*
        }
    };
}

macro_rules! dimension_setters {
    ($($(#[$doc:meta])* $name:ident => $field:ident[$index:literal];)*) => {
        impl Tree {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Fails if the node is unknown or sealed.
                pub fn $name(&mut self, node: NodeId, value: StyleValue) -> Result<(), TreeError> {
                    self.update_style(node, |style| style.$field[$index] = normalized(value))
                }
            )*
        }
    };
}

macro_rules! edge_setters {
    ($($(#[$doc:meta])* $name:ident => $field:ident;)*) => {
        impl Tree {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// Fails if the node is unknown or sealed.
                pub fn $name(
                    &mut self,
                    node: NodeId,
                    edge: Edge,
                    value: StyleValue,
                ) -> Result<(), TreeError> {
                    self.update_style(node, |style| style.$field.set(edge, normalized(value)))
                }
            )*
        }
    };
}

keyword_setters! {
    /// Set the writing direction.
    set_direction => direction: Direction;
    /// Set the main axis.
    set_flex_direction => flex_direction: FlexDirection;
    /// Set main-axis distribution.
    set_justify_content => justify_content: Justify;
    /// Set line distribution.
    set_align_content => align_content: Align;
    /// Set default child cross-axis alignment.
    set_align_items => align_items: Align;
    /// Set this node's cross-axis alignment.
    set_align_self => align_self: Align;
    /// Set in-flow or absolute positioning.
    set_position_type => position_type: PositionType;
    /// Set line wrapping.
    set_flex_wrap => flex_wrap: Wrap;
    /// Set overflow handling.
    set_overflow => overflow: Overflow;
    /// Set whether the node is laid out.
    set_display => display: Display;
}

factor_setters! {
    /// Set the `flex` shorthand.
    set_flex => flex;
    /// Set flex-grow.
    set_flex_grow => flex_grow;
    /// Set flex-shrink.
    set_flex_shrink => flex_shrink;
    /// Set the width/height ratio.
    set_aspect_ratio => aspect_ratio;
}

dimension_setters! {
    /// Set the width.
    set_width => dimensions[0];
    /// Set the height.
    set_height => dimensions[1];
    /// Set the minimum width.
    set_min_width => min_dimensions[0];
    /// Set the minimum height.
    set_min_height => min_dimensions[1];
    /// Set the maximum width.
    set_max_width => max_dimensions[0];
    /// Set the maximum height.
    set_max_height => max_dimensions[1];
}

edge_setters! {
    /// Set a margin edge. `Auto` margins absorb free space.
    set_margin => margin;
    /// Set a padding edge.
    set_padding => padding;
    /// Set a position offset edge.
    set_position => position;
}

impl Tree {
    /// Set flex-basis.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or sealed.
    pub fn set_flex_basis(&mut self, node: NodeId, value: StyleValue) -> Result<(), TreeError> {
        self.update_style(node, |style| style.flex_basis = normalized(value))
    }

    /// Set a border width in points.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or sealed.
    pub fn set_border(&mut self, node: NodeId, edge: Edge, width: f32) -> Result<(), TreeError> {
        self.update_style(node, |style| style.border.set(edge, StyleValue::point(width)))
    }

    /// Replace the whole style.
    ///
    /// # Errors
    ///
    /// Fails if the node is unknown or sealed.
    pub fn set_style(&mut self, node: NodeId, style: Style) -> Result<(), TreeError> {
        self.update_style(node, move |current| *current = style)
    }

    fn update_style(
        &mut self,
        node: NodeId,
        apply: impl FnOnce(&mut Style),
    ) -> Result<(), TreeError> {
        let n = self.unsealed_mut(node)?;
        let mut style = n.style;
        apply(&mut style);
        if style != n.style {
            n.style = style;
            self.mark_dirty_and_propagate(node);
        }
        Ok(())
    }
}
