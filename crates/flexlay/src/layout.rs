//! Results of a layout pass.
//!
//! [`ComputedLayout`] is what callers read: border-box position relative to
//! the owner, size, and the resolved box edges. [`LayoutState`] is the
//! algorithm's scratch space on each node and is not exposed.

use serde::Serialize;

use crate::cache::MeasureCache;
use crate::numeric::{UNDEFINED, float_eq};
use crate::style::{Dimension, Direction, PhysicalEdge};

/// A width and a height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Build a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// What a measure callback is asked.
///
/// Sizes are the content box (padding and border already removed); a size
/// is undefined (NaN) exactly when its mode is [`crate::MeasureMode::Undefined`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureInput {
    /// Available content width.
    pub width: f32,
    /// How `width` constrains the result.
    pub width_mode: crate::MeasureMode,
    /// Available content height.
    pub height: f32,
    /// How `height` constrains the result.
    pub height_mode: crate::MeasureMode,
}

/// Geometry of one node after a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComputedLayout {
    /// Offsets of the border box from the owner's border box, `[left, top, right, bottom]`.
    pub position: [f32; 4],
    /// `[width, height]` of the border box.
    pub dimensions: [f32; 2],
    /// Resolved margins, `[left, top, right, bottom]`.
    pub margin: [f32; 4],
    /// Resolved borders.
    pub border: [f32; 4],
    /// Resolved padding.
    pub padding: [f32; 4],
    /// Direction the node was laid out in.
    pub direction: Direction,
    /// First baseline, measured from the top of the border box.
    pub baseline: f32,
    /// Whether children overflowed the main axis.
    pub had_overflow: bool,
}

impl Default for ComputedLayout {
    fn default() -> Self {
        Self {
            position: [0.0; 4],
            dimensions: [UNDEFINED; 2],
            margin: [0.0; 4],
            border: [0.0; 4],
            padding: [0.0; 4],
            direction: Direction::Inherit,
            baseline: UNDEFINED,
            had_overflow: false,
        }
    }
}

impl ComputedLayout {
    /// Zeroed geometry, used for nodes removed from layout.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            dimensions: [0.0; 2],
            baseline: 0.0,
            ..Self::default()
        }
    }

    /// Offset from the owner's left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.position[PhysicalEdge::Left.index()]
    }

    /// Offset from the owner's top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.position[PhysicalEdge::Top.index()]
    }

    /// Offset from the owner's right edge (only maintained for reversed rows).
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.position[PhysicalEdge::Right.index()]
    }

    /// Offset from the owner's bottom edge (only maintained for reversed columns).
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.position[PhysicalEdge::Bottom.index()]
    }

    /// Border-box width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.dimensions[Dimension::Width.index()]
    }

    /// Border-box height.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.dimensions[Dimension::Height.index()]
    }

    /// Resolved margin on a side.
    #[must_use]
    pub const fn margin(&self, edge: PhysicalEdge) -> f32 {
        self.margin[edge.index()]
    }

    /// Resolved border on a side.
    #[must_use]
    pub const fn border(&self, edge: PhysicalEdge) -> f32 {
        self.border[edge.index()]
    }

    /// Resolved padding on a side.
    #[must_use]
    pub const fn padding(&self, edge: PhysicalEdge) -> f32 {
        self.padding[edge.index()]
    }

    /// Tolerant comparison of position and size; edges and flags are ignored.
    #[must_use]
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.position
            .iter()
            .zip(other.position.iter())
            .chain(self.dimensions.iter().zip(other.dimensions.iter()))
            .all(|(a, b)| float_eq(*a, *b))
    }
}

/// Per-node working state of the algorithm.
#[derive(Debug, Clone)]
pub(crate) struct LayoutState {
    /// Size from the most recent measure or layout of this node.
    pub measured: [f32; 2],
    /// Flex basis computed by the owner, cleared when the node is dirtied.
    pub computed_flex_basis: Option<f32>,
    /// Generation in which `computed_flex_basis` was computed.
    pub flex_basis_generation: u32,
    /// Generation of the last visit.
    pub generation: u32,
    /// Owner direction of the last visit; a change invalidates the cache.
    pub last_owner_direction: Option<Direction>,
    /// Owner size of the last layout, reused when relayouting a boundary.
    pub last_owner_size: [f32; 2],
    /// Flex line this node was placed on in its owner.
    pub line_index: usize,
    /// Previous results keyed by constraints.
    pub cache: MeasureCache,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            measured: [UNDEFINED; 2],
            computed_flex_basis: None,
            flex_basis_generation: 0,
            generation: 0,
            last_owner_direction: None,
            last_owner_size: [UNDEFINED; 2],
            line_index: 0,
            cache: MeasureCache::default(),
        }
    }
}

impl LayoutState {
    pub const fn measured(&self, dim: Dimension) -> f32 {
        self.measured[dim.index()]
    }

    /// Drop everything derived from earlier passes.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }
}
