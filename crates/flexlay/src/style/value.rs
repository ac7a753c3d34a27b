//! Dimension values as they appear in style.

use std::fmt;

use serde::Serialize;

use crate::numeric::EPSILON;

/// A style dimension: undefined, points, a percentage of the owner, or auto.
///
/// Constructors normalize NaN payloads to [`StyleValue::Undefined`], so a
/// value that went through them never carries a NaN.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(tag = "unit", content = "value", rename_all = "lowercase")]
pub enum StyleValue {
    /// No value was set.
    #[default]
    Undefined,
    /// An absolute length in points.
    Point(f32),
    /// A percentage of the owner's size on the relevant axis.
    Percent(f32),
    /// Let the algorithm decide.
    Auto,
}

impl StyleValue {
    /// The zero length.
    pub const ZERO: Self = Self::Point(0.0);

    /// A point value, or `Undefined` if `value` is NaN.
    #[must_use]
    pub const fn point(value: f32) -> Self {
        if value.is_nan() {
            Self::Undefined
        } else {
            Self::Point(value)
        }
    }

    /// A percentage value, or `Undefined` if `value` is NaN.
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        if value.is_nan() {
            Self::Undefined
        } else {
            Self::Percent(value)
        }
    }

    /// Returns `true` for [`StyleValue::Undefined`].
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for [`StyleValue::Auto`].
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Returns `true` for [`StyleValue::Percent`].
    #[must_use]
    pub const fn is_percent(&self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

impl PartialEq for StyleValue {
    /// Units must match. Payloads compare within [`EPSILON`], and two NaN
    /// payloads (only reachable by building the variant directly) are equal.
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Undefined, Self::Undefined) | (Self::Auto, Self::Auto) => true,
            (Self::Point(a), Self::Point(b)) | (Self::Percent(a), Self::Percent(b)) => {
                (a.is_nan() && b.is_nan()) || (a - b).abs() < EPSILON
            }
            _ => false,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Point(value) => write!(f, "{value}pt"),
            Self::Percent(value) => write!(f, "{value}%"),
            Self::Auto => f.write_str("auto"),
        }
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::point(value)
    }
}
