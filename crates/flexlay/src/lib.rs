//! A flexbox layout engine for natively rendered UI trees.
//!
//! # Scope
//!
//! Callers build a tree of styled nodes in a [`Tree`], call
//! [`Tree::compute_layout`], and read back a [`ComputedLayout`] per node.
//! The engine never parses style text and never paints.
//!
//! This crate implements:
//! - **Flex Layout** ([§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm))
//!   - Flex basis, line breaking, grow and shrink with min/max freezing
//!   - justify-content, align-items, align-self and align-content
//!   - Auto margins, wrap-reverse, baselines and aspect ratio
//!
//! - **Absolute Positioning** ([§ 4.1](https://www.w3.org/TR/css-flexbox-1/#abspos-items))
//!   - Offsets against the owner's padding box, falling back to alignment
//!
//! - **Writing Direction** ([CSS Writing Modes Level 3](https://www.w3.org/TR/css-writing-mode-3/#direction))
//!   - Start/end edges and row axes mirror under RTL
//!
//! - **Incremental Layout**
//!   - Dirty propagation, layout boundaries and a per-node measure cache
//!   - Copy-on-write sharing of subtrees between trees of nodes
//!
//! - **Pixel Rounding**
//!   - Absolute-coordinate rounding to the configured point scale
//!
//! # Example
//!
//! ```
//! use flexlay::{Direction, FlexDirection, StyleValue, Tree};
//!
//! let mut tree = Tree::new();
//! let root = tree.new_node();
//! tree.set_flex_direction(root, FlexDirection::Row).unwrap();
//! tree.set_width(root, StyleValue::point(300.0)).unwrap();
//! tree.set_height(root, StyleValue::point(100.0)).unwrap();
//!
//! for grow in [1.0, 1.0, 2.0] {
//!     let child = tree.new_node();
//!     tree.set_flex_basis(child, StyleValue::point(0.0)).unwrap();
//!     tree.set_flex_grow(child, grow).unwrap();
//!     tree.append_child(root, child).unwrap();
//! }
//!
//! tree.compute_layout(root, f32::NAN, f32::NAN, Direction::Ltr).unwrap();
//! let widths: Vec<f32> = tree
//!     .children(root)
//!     .iter()
//!     .map(|child| tree.layout(*child).unwrap().width())
//!     .collect();
//! assert_eq!(widths, [75.0, 75.0, 150.0]);
//! ```

mod algorithm;
/// Per-node memo of previous measurements.
pub mod cache;
/// Engine-wide policy: logging, cloning, experiments, rounding.
pub mod config;
/// Errors returned by the tree mutation API.
pub mod error;
/// Phase markers and per-pass counters.
pub mod instrumentation;
/// Computed geometry and the measure callback's types.
pub mod layout;
/// A single element of a layout tree.
pub mod node;
/// Scalar helpers tolerant of undefined sizes.
pub mod numeric;
/// Style values, edges, keywords and [`Style`].
pub mod style;
/// The node arena and its mutation API.
pub mod tree;

pub use cache::{CachedMeasurement, MAX_CACHED_MEASUREMENTS, MeasureCache};
pub use config::{Config, Experiment, LogLevel, Logger};
pub use error::TreeError;
pub use instrumentation::{LayoutStats, Marker, MarkerSink};
pub use layout::{ComputedLayout, MeasureInput, Size};
pub use node::{BaselineFn, DirtiedFn, MeasureFn, Node};
pub use numeric::{UNDEFINED, float_eq, is_defined, is_undefined, resolve_value};
pub use style::{
    Align, Dimension, Direction, Display, Edge, EdgeValues, FlexDirection, Justify, MeasureMode,
    NodeType, Overflow, PhysicalEdge, PositionType, Style, StyleValue, Wrap,
};
pub use tree::{DumpOptions, NodeId, Tree};
