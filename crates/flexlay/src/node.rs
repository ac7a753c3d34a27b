//! A single element of a layout tree.
//!
//! Nodes are owned by a [`crate::Tree`] and addressed by [`NodeId`]. A node
//! exclusively owns the children it adopted; `owner` is a plain id pointing
//! back up and never keeps anything alive.

use std::fmt;
use std::sync::Arc;

use crate::cache::MeasureCache;
use crate::config::Config;
use crate::layout::{ComputedLayout, LayoutState, MeasureInput, Size};
use crate::style::{NodeType, Style};
use crate::tree::NodeId;

/// Intrinsic-size callback for leaf content the engine cannot size itself.
///
/// Must be a pure function of its input, or cached results go stale.
pub type MeasureFn = Arc<dyn Fn(MeasureInput) -> Size + Send + Sync>;

/// Baseline callback: `(width, height) -> baseline from the top edge`.
pub type BaselineFn = Arc<dyn Fn(f32, f32) -> f32 + Send + Sync>;

/// Called when a node transitions from clean to dirty.
pub type DirtiedFn = Arc<dyn Fn(NodeId) + Send + Sync>;

/// A styled box in the tree.
pub struct Node {
    pub(crate) style: Style,
    pub(crate) children: Vec<NodeId>,
    pub(crate) owner: Option<NodeId>,
    pub(crate) config: Arc<Config>,
    pub(crate) measure: Option<MeasureFn>,
    pub(crate) baseline: Option<BaselineFn>,
    pub(crate) dirtied: Option<DirtiedFn>,
    pub(crate) node_type: NodeType,
    pub(crate) is_dirty: bool,
    pub(crate) sealed: bool,
    pub(crate) layout_boundary: bool,
    pub(crate) is_reference_baseline: bool,
    pub(crate) has_new_layout: bool,
    /// Geometry as computed, before pixel rounding.
    pub(crate) unrounded: ComputedLayout,
    /// Geometry callers read.
    pub(crate) layout: ComputedLayout,
    pub(crate) state: LayoutState,
}

impl Node {
    pub(crate) fn new(config: Arc<Config>) -> Self {
        let style = if config.use_web_defaults() {
            Style::web()
        } else {
            Style::default()
        };
        Self {
            style,
            children: Vec::new(),
            owner: None,
            config,
            measure: None,
            baseline: None,
            dirtied: None,
            node_type: NodeType::Default,
            is_dirty: true,
            sealed: false,
            layout_boundary: false,
            is_reference_baseline: false,
            has_new_layout: true,
            unrounded: ComputedLayout::default(),
            layout: ComputedLayout::default(),
            state: LayoutState::default(),
        }
    }

    /// A detached copy with the same style, callbacks and child list.
    ///
    /// The copy lists the same children but owns none of them; its cache
    /// is empty.
    pub(crate) fn shallow_clone(&self) -> Self {
        Self {
            style: self.style,
            children: self.children.clone(),
            owner: None,
            config: Arc::clone(&self.config),
            measure: self.measure.clone(),
            baseline: self.baseline.clone(),
            dirtied: self.dirtied.clone(),
            node_type: self.node_type,
            is_dirty: self.is_dirty,
            sealed: false,
            layout_boundary: self.layout_boundary,
            is_reference_baseline: self.is_reference_baseline,
            has_new_layout: self.has_new_layout,
            unrounded: self.unrounded,
            layout: self.layout,
            state: LayoutState {
                cache: MeasureCache::default(),
                ..self.state.clone()
            },
        }
    }

    /// The node's style.
    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    /// Child ids in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The node that owns this one, if attached.
    #[must_use]
    pub const fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    /// The rounded geometry from the last pass that reached this node.
    #[must_use]
    pub const fn layout(&self) -> &ComputedLayout {
        &self.layout
    }

    /// The geometry before rounding.
    #[must_use]
    pub const fn unrounded_layout(&self) -> &ComputedLayout {
        &self.unrounded
    }

    /// The policy this node follows.
    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Rounding behavior.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Whether the node needs layout.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Whether mutation is currently rejected.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Whether dirtiness stops propagating at this node.
    #[must_use]
    pub const fn is_layout_boundary(&self) -> bool {
        self.layout_boundary
    }

    /// Whether this node is preferred when its owner picks a baseline child.
    #[must_use]
    pub const fn is_reference_baseline(&self) -> bool {
        self.is_reference_baseline
    }

    /// Whether the last pass moved or resized this node and nobody has
    /// acknowledged it yet.
    #[must_use]
    pub const fn has_new_layout(&self) -> bool {
        self.has_new_layout
    }

    /// Whether a measure callback is attached.
    #[must_use]
    pub const fn has_measure_func(&self) -> bool {
        self.measure.is_some()
    }

    /// Whether a baseline callback is attached.
    #[must_use]
    pub const fn has_baseline_func(&self) -> bool {
        self.baseline.is_some()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("owner", &self.owner)
            .field("children", &self.children)
            .field("node_type", &self.node_type)
            .field("is_dirty", &self.is_dirty)
            .field("sealed", &self.sealed)
            .field("has_measure_func", &self.measure.is_some())
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
