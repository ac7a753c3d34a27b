//! Scalar helpers shared by the style model and the layout algorithm.
//!
//! Available sizes travel through the algorithm as plain `f32`, with NaN
//! standing for "undefined" (unconstrained). Resolved style values come back
//! as `Option<f32>`. Every function here is total: undefined inputs produce
//! undefined or `None` outputs, never a panic.

use crate::style::StyleValue;

/// The "undefined" sentinel for available and measured sizes.
pub const UNDEFINED: f32 = f32::NAN;

/// Tolerance used by every float comparison in the engine.
pub const EPSILON: f32 = 0.0001;

/// Returns `true` if `value` is the undefined sentinel.
#[must_use]
pub const fn is_undefined(value: f32) -> bool {
    value.is_nan()
}

/// Returns `true` if `value` is a real number.
#[must_use]
pub const fn is_defined(value: f32) -> bool {
    !value.is_nan()
}

/// Tolerant equality.
///
/// Two undefined values are equal; an undefined value never equals a
/// defined one; defined values are equal when they differ by less than
/// [`EPSILON`].
#[must_use]
pub fn float_eq(a: f32, b: f32) -> bool {
    if is_defined(a) && is_defined(b) {
        return (a - b).abs() < EPSILON;
    }
    is_undefined(a) && is_undefined(b)
}

/// Larger of two values, preferring whichever one is defined.
#[must_use]
pub fn float_max(a: f32, b: f32) -> f32 {
    if is_defined(a) && is_defined(b) {
        return a.max(b);
    }
    if is_undefined(a) { b } else { a }
}

/// Smaller of two values, preferring whichever one is defined.
#[must_use]
pub fn float_min(a: f32, b: f32) -> f32 {
    if is_defined(a) && is_defined(b) {
        return a.min(b);
    }
    if is_undefined(a) { b } else { a }
}

/// Maps undefined to zero.
#[must_use]
pub const fn sanitize(value: f32) -> f32 {
    if is_undefined(value) { 0.0 } else { value }
}

/// Maps infinities to undefined; an unbounded size is an undefined one.
#[must_use]
pub const fn finite_or_undefined(value: f32) -> f32 {
    if value.is_finite() { value } else { UNDEFINED }
}

/// Converts an optional resolved value back into the sentinel form.
#[must_use]
pub fn or_undefined(value: Option<f32>) -> f32 {
    value.unwrap_or(UNDEFINED)
}

/// Resolve a style value against a reference size.
///
/// Points resolve to themselves. Percentages resolve to
/// `value * reference / 100`, or `None` if the reference is undefined.
/// `Auto` and `Undefined` never resolve.
#[must_use]
pub fn resolve_value(value: &StyleValue, reference: f32) -> Option<f32> {
    match *value {
        StyleValue::Point(points) => Some(points),
        StyleValue::Percent(percent) if is_defined(reference) => Some(percent * reference * 0.01),
        StyleValue::Percent(_) | StyleValue::Auto | StyleValue::Undefined => None,
    }
}

/// Resolve a margin. `Auto` margins contribute nothing to sizing.
#[must_use]
pub fn resolve_margin(value: &StyleValue, reference: f32) -> Option<f32> {
    match value {
        StyleValue::Auto => Some(0.0),
        other => resolve_value(other, reference),
    }
}

/// Round `value` to the pixel grid defined by `scale` (device pixels per point).
///
/// Ties round up. `force_ceil` and `force_floor` override the nearest-rounding
/// for text, whose measured size must never be truncated.
#[must_use]
pub fn round_to_pixel_grid(value: f32, scale: f32, force_ceil: bool, force_floor: bool) -> f32 {
    let mut scaled = value * scale;
    // Euclidean remainder keeps the fraction in [0, 1) for negative offsets too.
    let fraction = scaled.rem_euclid(1.0);

    if float_eq(fraction, 0.0) {
        scaled -= fraction;
    } else if float_eq(fraction, 1.0) {
        scaled = scaled - fraction + 1.0;
    } else if force_ceil {
        scaled = scaled - fraction + 1.0;
    } else if force_floor {
        scaled -= fraction;
    } else {
        let round_up = is_defined(fraction) && (fraction > 0.5 || float_eq(fraction, 0.5));
        scaled = scaled - fraction + if round_up { 1.0 } else { 0.0 };
    }

    if is_defined(scaled) && is_defined(scale) {
        scaled / scale
    } else {
        UNDEFINED
    }
}
