//! Per-node memo of previous measurements.
//!
//! Each node remembers the last layout it performed plus up to
//! [`MAX_CACHED_MEASUREMENTS`] measurements, keyed by the constraints they
//! were computed under. A hit returns the stored size; it never stands in
//! for a result that would differ from a fresh computation.

use serde::Serialize;

use crate::numeric::{UNDEFINED, float_eq, is_defined, round_to_pixel_grid};
use crate::style::MeasureMode;

/// How many measure-pass results a node keeps.
pub const MAX_CACHED_MEASUREMENTS: usize = 8;

/// One remembered measurement.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CachedMeasurement {
    /// Available width the node was measured under (margins included).
    pub available_width: f32,
    /// Available height the node was measured under (margins included).
    pub available_height: f32,
    /// Width constraint mode.
    pub width_mode: MeasureMode,
    /// Height constraint mode.
    pub height_mode: MeasureMode,
    /// Resulting border-box width.
    pub computed_width: f32,
    /// Resulting border-box height.
    pub computed_height: f32,
}

impl Default for CachedMeasurement {
    fn default() -> Self {
        Self {
            available_width: UNDEFINED,
            available_height: UNDEFINED,
            width_mode: MeasureMode::Undefined,
            height_mode: MeasureMode::Undefined,
            computed_width: UNDEFINED,
            computed_height: UNDEFINED,
        }
    }
}

impl PartialEq for CachedMeasurement {
    /// Sizes compare with tolerance; a size undefined on both sides matches.
    fn eq(&self, other: &Self) -> bool {
        self.width_mode == other.width_mode
            && self.height_mode == other.height_mode
            && float_eq(self.available_width, other.available_width)
            && float_eq(self.available_height, other.available_height)
            && float_eq(self.computed_width, other.computed_width)
            && float_eq(self.computed_height, other.computed_height)
    }
}

impl CachedMeasurement {
    /// Whether this entry was computed under exactly these constraints.
    #[must_use]
    pub fn matches(
        &self,
        available_width: f32,
        available_height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
    ) -> bool {
        self.width_mode == width_mode
            && self.height_mode == height_mode
            && float_eq(self.available_width, available_width)
            && float_eq(self.available_height, available_height)
    }
}

/// The constraints a node is being asked to size itself under.
#[derive(Debug, Clone, Copy)]
pub struct Constraints {
    /// Available width, margins included.
    pub width: f32,
    /// Width mode.
    pub width_mode: MeasureMode,
    /// Available height, margins included.
    pub height: f32,
    /// Height mode.
    pub height_mode: MeasureMode,
    /// Horizontal margin of the node.
    pub margin_row: f32,
    /// Vertical margin of the node.
    pub margin_column: f32,
}

/// The fixed-capacity cache held by every node.
#[derive(Debug, Clone, Default)]
pub struct MeasureCache {
    layout: Option<CachedMeasurement>,
    measurements: Vec<CachedMeasurement>,
    next: usize,
}

impl MeasureCache {
    /// Forget everything.
    pub fn clear(&mut self) {
        self.layout = None;
        self.measurements.clear();
        self.next = 0;
    }

    /// The entry written by the last layout pass.
    #[must_use]
    pub const fn layout(&self) -> Option<&CachedMeasurement> {
        self.layout.as_ref()
    }

    /// Measure-pass entries, in slot order.
    #[must_use]
    pub fn measurements(&self) -> &[CachedMeasurement] {
        &self.measurements
    }

    /// Record the result of a layout pass.
    pub const fn store_layout(&mut self, entry: CachedMeasurement) {
        self.layout = Some(entry);
    }

    /// Record the result of a measure pass, overwriting the oldest slot when full.
    ///
    /// Returns `true` if an older entry was evicted.
    pub fn store_measurement(&mut self, entry: CachedMeasurement) -> bool {
        if self.measurements.len() < MAX_CACHED_MEASUREMENTS {
            self.measurements.push(entry);
            self.next = self.measurements.len() % MAX_CACHED_MEASUREMENTS;
            return false;
        }
        self.measurements[self.next] = entry;
        self.next = (self.next + 1) % MAX_CACHED_MEASUREMENTS;
        true
    }

    /// Exact lookup for a layout-pass request.
    #[must_use]
    pub fn find_layout(&self, c: &Constraints) -> Option<CachedMeasurement> {
        self.layout
            .filter(|entry| entry.matches(c.width, c.height, c.width_mode, c.height_mode))
    }

    /// Exact lookup for a measure-pass request.
    #[must_use]
    pub fn find_measurement(&self, c: &Constraints) -> Option<CachedMeasurement> {
        self.measurements
            .iter()
            .find(|entry| entry.matches(c.width, c.height, c.width_mode, c.height_mode))
            .copied()
    }

    /// Lookup for nodes with a measure callback, which can also reuse
    /// entries whose result provably still satisfies the new constraints.
    #[must_use]
    pub fn find_compatible(
        &self,
        c: &Constraints,
        point_scale_factor: f32,
    ) -> Option<CachedMeasurement> {
        let layout = self
            .layout
            .filter(|entry| can_use_cached_measurement(c, entry, point_scale_factor));
        if layout.is_some() {
            return layout;
        }
        self.measurements
            .iter()
            .find(|entry| can_use_cached_measurement(c, entry, point_scale_factor))
            .copied()
    }
}

/// The new size is exact and equals what was measured last time.
fn size_is_exact_and_matches_old(mode: MeasureMode, size: f32, last_computed: f32) -> bool {
    mode == MeasureMode::Exactly && float_eq(size, last_computed)
}

/// Last time was unconstrained, and the new upper bound still fits that result.
fn old_size_is_unspecified_and_still_fits(
    mode: MeasureMode,
    size: f32,
    last_mode: MeasureMode,
    last_computed: f32,
) -> bool {
    mode == MeasureMode::AtMost
        && last_mode == MeasureMode::Undefined
        && (size >= last_computed || float_eq(size, last_computed))
}

/// Both bounds are upper bounds, the new one is tighter, and the old result fits it.
fn new_size_is_stricter_and_still_valid(
    mode: MeasureMode,
    size: f32,
    last_mode: MeasureMode,
    last_size: f32,
    last_computed: f32,
) -> bool {
    last_mode == MeasureMode::AtMost
        && mode == MeasureMode::AtMost
        && is_defined(last_size)
        && is_defined(size)
        && is_defined(last_computed)
        && last_size > size
        && (last_computed <= size || float_eq(size, last_computed))
}

/// Whether `entry` answers a measurement under `c` exactly.
///
/// With a non-zero `point_scale_factor`, available sizes are compared after
/// snapping to the pixel grid, so constraints that round to the same device
/// pixel share an entry.
#[must_use]
pub fn can_use_cached_measurement(
    c: &Constraints,
    entry: &CachedMeasurement,
    point_scale_factor: f32,
) -> bool {
    if (is_defined(entry.computed_height) && entry.computed_height < 0.0)
        || (is_defined(entry.computed_width) && entry.computed_width < 0.0)
    {
        return false;
    }

    let snap = |value: f32| {
        if point_scale_factor == 0.0 {
            value
        } else {
            round_to_pixel_grid(value, point_scale_factor, false, false)
        }
    };

    let same_width = entry.width_mode == c.width_mode
        && float_eq(snap(entry.available_width), snap(c.width));
    let same_height = entry.height_mode == c.height_mode
        && float_eq(snap(entry.available_height), snap(c.height));

    let inner_width = c.width - c.margin_row;
    let inner_height = c.height - c.margin_column;

    let width_ok = same_width
        || size_is_exact_and_matches_old(c.width_mode, inner_width, entry.computed_width)
        || old_size_is_unspecified_and_still_fits(
            c.width_mode,
            inner_width,
            entry.width_mode,
            entry.computed_width,
        )
        || new_size_is_stricter_and_still_valid(
            c.width_mode,
            inner_width,
            entry.width_mode,
            entry.available_width,
            entry.computed_width,
        );

    let height_ok = same_height
        || size_is_exact_and_matches_old(c.height_mode, inner_height, entry.computed_height)
        || old_size_is_unspecified_and_still_fits(
            c.height_mode,
            inner_height,
            entry.height_mode,
            entry.computed_height,
        )
        || new_size_is_stricter_and_still_valid(
            c.height_mode,
            inner_height,
            entry.height_mode,
            entry.available_height,
            entry.computed_height,
        );

    width_ok && height_ok
}
