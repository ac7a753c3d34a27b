//! Keyword-valued style properties and the enums the algorithm keys on.
//!
//! Every enum derives `strum_macros::Display` so log lines and the CLI can
//! print them by name.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use crate::style::PhysicalEdge;

/// Writing direction. `Inherit` takes the owner's resolved direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Use the owner's direction; the root falls back to LTR.
    #[default]
    Inherit,
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// Resolve `Inherit` against the owner's direction.
    #[must_use]
    pub const fn resolve(self, owner: Self) -> Self {
        match self {
            Self::Inherit => match owner {
                Self::Inherit => Self::Ltr,
                resolved => resolved,
            },
            resolved => resolved,
        }
    }

    /// The physical edge where inline content starts.
    #[must_use]
    pub const fn start_edge(self) -> PhysicalEdge {
        match self {
            Self::Rtl => PhysicalEdge::Right,
            Self::Ltr | Self::Inherit => PhysicalEdge::Left,
        }
    }

    /// The physical edge where inline content ends.
    #[must_use]
    pub const fn end_edge(self) -> PhysicalEdge {
        match self {
            Self::Rtl => PhysicalEdge::Left,
            Self::Ltr | Self::Inherit => PhysicalEdge::Right,
        }
    }
}

/// [§ 5.1 Flex Flow Direction](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
///
/// Also used as the "axis" type inside the algorithm: a resolved main or
/// cross axis is always one of these four values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    /// Top to bottom.
    #[default]
    Column,
    /// Bottom to top.
    ColumnReverse,
    /// Inline start to inline end.
    Row,
    /// Inline end to inline start.
    RowReverse,
}

/// Which size an axis measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum Dimension {
    /// Horizontal extent.
    Width,
    /// Vertical extent.
    Height,
}

impl Dimension {
    /// Index into `[width, height]` arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Width => 0,
            Self::Height => 1,
        }
    }
}

impl FlexDirection {
    /// `Row` or `RowReverse`.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// `Column` or `ColumnReverse`.
    #[must_use]
    pub const fn is_column(self) -> bool {
        matches!(self, Self::Column | Self::ColumnReverse)
    }

    /// `RowReverse` or `ColumnReverse`.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }

    /// Apply the writing direction: under RTL, rows flip and columns stay.
    #[must_use]
    pub const fn resolve(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Row, Direction::Rtl) => Self::RowReverse,
            (Self::RowReverse, Direction::Rtl) => Self::Row,
            (axis, _) => axis,
        }
    }

    /// The cross axis of a main axis.
    #[must_use]
    pub const fn cross(self, direction: Direction) -> Self {
        if self.is_column() {
            Self::Row.resolve(direction)
        } else {
            Self::Column
        }
    }

    /// The physical edge items are laid out from.
    #[must_use]
    pub const fn leading_edge(self) -> PhysicalEdge {
        match self {
            Self::Column => PhysicalEdge::Top,
            Self::ColumnReverse => PhysicalEdge::Bottom,
            Self::Row => PhysicalEdge::Left,
            Self::RowReverse => PhysicalEdge::Right,
        }
    }

    /// The physical edge opposite [`FlexDirection::leading_edge`].
    #[must_use]
    pub const fn trailing_edge(self) -> PhysicalEdge {
        match self {
            Self::Column => PhysicalEdge::Bottom,
            Self::ColumnReverse => PhysicalEdge::Top,
            Self::Row => PhysicalEdge::Right,
            Self::RowReverse => PhysicalEdge::Left,
        }
    }

    /// The dimension measured along this axis.
    #[must_use]
    pub const fn dimension(self) -> Dimension {
        if self.is_row() {
            Dimension::Width
        } else {
            Dimension::Height
        }
    }
}

/// [§ 8.2 Axis Alignment: the justify-content property](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    /// "Flex items are packed toward the start of the line."
    #[default]
    FlexStart,
    /// "Flex items are packed toward the center of the line."
    Center,
    /// "Flex items are packed toward the end of the line."
    FlexEnd,
    /// "Flex items are evenly distributed in the line."
    SpaceBetween,
    /// "...with half-size spaces on either end."
    SpaceAround,
    /// Equal space between items and at both ends.
    SpaceEvenly,
}

/// Values shared by align-items, align-self and align-content.
///
/// [§ 8.3 Cross-axis Alignment](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    /// align-self only: defer to the container's align-items.
    #[default]
    Auto,
    /// Cross-start edge.
    FlexStart,
    /// Centered in the line.
    Center,
    /// Cross-end edge.
    FlexEnd,
    /// Fill the line's cross size.
    Stretch,
    /// Align first baselines.
    Baseline,
    /// align-content only.
    SpaceBetween,
    /// align-content only.
    SpaceAround,
}

/// Whether a node takes part in flex flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PositionType {
    /// In flow, offset by its position edges.
    #[default]
    Relative,
    /// Out of flow, placed against the owner's padding box.
    Absolute,
}

/// [§ 5.2 Flex Line Wrapping](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Wrap {
    /// Single line.
    #[default]
    NoWrap,
    /// Multi-line.
    Wrap,
    /// Multi-line with the cross axis flipped.
    WrapReverse,
}

/// How content larger than the node is treated when measuring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    /// Content may overflow.
    #[default]
    Visible,
    /// Content is clipped.
    Hidden,
    /// Content scrolls, so children are measured without the node's limit.
    Scroll,
}

/// Whether a node is laid out at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    /// Laid out as a flex container.
    #[default]
    Flex,
    /// Removed from layout; the subtree is zeroed.
    None,
}

/// How an available size constrains a measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum MeasureMode {
    /// Unconstrained; the size is ignored.
    #[default]
    Undefined,
    /// The result must be exactly this size.
    Exactly,
    /// The result may be at most this size.
    AtMost,
}

/// Rounding behavior of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    /// A box.
    #[default]
    Default,
    /// Text content: fractional sizes round up so glyphs are never clipped.
    Text,
}
