//! Per-edge style values (margin, padding, border, position).
//!
//! Values are stored against nine logical edges and resolved to a physical
//! edge on demand. For a physical edge under a writing direction the
//! precedence is:
//!
//! 1. the logical alias for that side (`Start`/`End`, mapped by direction)
//! 2. the physical edge itself
//! 3. `Horizontal` or `Vertical`
//! 4. `All`
//! 5. the caller's default

use std::ops::{Index, IndexMut};

use serde::Serialize;
use strum_macros::{Display, EnumIter};

use super::{Direction, StyleValue};

/// An edge a style value can be set on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Edge {
    /// Physical left.
    Left,
    /// Physical top.
    Top,
    /// Physical right.
    Right,
    /// Physical bottom.
    Bottom,
    /// Inline start: left under LTR, right under RTL.
    Start,
    /// Inline end: right under LTR, left under RTL.
    End,
    /// Left and right (and start/end).
    Horizontal,
    /// Top and bottom.
    Vertical,
    /// Every edge.
    All,
}

impl Edge {
    const COUNT: usize = 9;

    const fn index(self) -> usize {
        self as usize
    }
}

/// A physical side of a box; indexes computed-layout arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PhysicalEdge {
    /// Left side.
    Left,
    /// Top side.
    Top,
    /// Right side.
    Right,
    /// Bottom side.
    Bottom,
}

impl PhysicalEdge {
    /// All four sides in array order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Top, Self::Right, Self::Bottom];

    /// Index into `[left, top, right, bottom]` arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The logical edge that names this side under `direction`, if any.
    const fn logical_alias(self, direction: Direction) -> Option<Edge> {
        match (self, direction) {
            (Self::Left, Direction::Rtl) | (Self::Right, Direction::Ltr | Direction::Inherit) => {
                Some(Edge::End)
            }
            (Self::Left, Direction::Ltr | Direction::Inherit) | (Self::Right, Direction::Rtl) => {
                Some(Edge::Start)
            }
            (Self::Top | Self::Bottom, _) => None,
        }
    }

    const fn as_edge(self) -> Edge {
        match self {
            Self::Left => Edge::Left,
            Self::Top => Edge::Top,
            Self::Right => Edge::Right,
            Self::Bottom => Edge::Bottom,
        }
    }

    const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Style values for all nine logical edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeValues([StyleValue; Edge::COUNT]);

impl EdgeValues {
    /// Every edge undefined.
    #[must_use]
    pub const fn new() -> Self {
        Self([StyleValue::Undefined; Edge::COUNT])
    }

    /// The value stored for exactly `edge`, without fallback.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> StyleValue {
        self.0[edge.index()]
    }

    /// Store `value` on `edge`.
    pub const fn set(&mut self, edge: Edge, value: StyleValue) {
        self.0[edge.index()] = value;
    }

    /// The value governing `edge`, following the fallback chain.
    ///
    /// Logical `Start`/`End` fall back to `Horizontal`, then `All`, then
    /// `Undefined`; they never take `default`.
    #[must_use]
    pub fn computed(&self, edge: Edge, default: StyleValue) -> StyleValue {
        let own = self.get(edge);
        if !own.is_undefined() {
            return own;
        }
        let axis = match edge {
            Edge::Top | Edge::Bottom => self.get(Edge::Vertical),
            Edge::Left | Edge::Right | Edge::Start | Edge::End => self.get(Edge::Horizontal),
            Edge::Horizontal | Edge::Vertical | Edge::All => StyleValue::Undefined,
        };
        if !axis.is_undefined() {
            return axis;
        }
        let all = self.get(Edge::All);
        if !all.is_undefined() {
            return all;
        }
        if matches!(edge, Edge::Start | Edge::End) {
            return StyleValue::Undefined;
        }
        default
    }

    /// The value governing a physical side under `direction`.
    #[must_use]
    pub fn resolve(
        &self,
        edge: PhysicalEdge,
        direction: Direction,
        default: StyleValue,
    ) -> StyleValue {
        if let Some(alias) = edge.logical_alias(direction) {
            let logical = self.get(alias);
            if !logical.is_undefined() {
                return logical;
            }
        }
        let physical = self.get(edge.as_edge());
        if !physical.is_undefined() {
            return physical;
        }
        let axis = if edge.is_horizontal() {
            self.get(Edge::Horizontal)
        } else {
            self.get(Edge::Vertical)
        };
        if !axis.is_undefined() {
            return axis;
        }
        let all = self.get(Edge::All);
        if all.is_undefined() { default } else { all }
    }
}

impl Index<Edge> for EdgeValues {
    type Output = StyleValue;

    fn index(&self, edge: Edge) -> &StyleValue {
        &self.0[edge.index()]
    }
}

impl IndexMut<Edge> for EdgeValues {
    fn index_mut(&mut self, edge: Edge) -> &mut StyleValue {
        &mut self.0[edge.index()]
    }
}
