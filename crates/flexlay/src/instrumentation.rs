//! Observational hooks around layout phases.
//!
//! A [`MarkerSink`] registered on the [`crate::Config`] is told when a phase
//! starts and ends. Sinks cannot influence the algorithm. Counters for the
//! whole pass are also kept on the tree and read back with
//! [`crate::Tree::last_layout_stats`].

use std::sync::Arc;

use serde::Serialize;
use strum_macros::Display;

use crate::config::Config;
use crate::tree::NodeId;

/// A phase of work the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
pub enum Marker {
    /// A whole `compute_layout` call, reported against the root.
    Layout,
    /// One invocation of a node's measure callback.
    Measure,
    /// One invocation of a node's baseline callback.
    BaselineFn,
}

/// Work counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    /// Nodes laid out from scratch.
    pub layouts: u32,
    /// Nodes measured from scratch.
    pub measures: u32,
    /// Layout requests answered from the cache.
    pub cached_layouts: u32,
    /// Measure requests answered from the cache.
    pub cached_measures: u32,
    /// Measure callback invocations.
    pub measure_callbacks: u32,
    /// Highest number of measure-cache slots any node used.
    pub max_measure_cache: u32,
    /// Measure-cache entries evicted because a node's ring was full.
    pub cache_evictions: u32,
}

impl LayoutStats {
    /// Nodes whose size was reused rather than recomputed.
    #[must_use]
    pub const fn cache_hits(&self) -> u32 {
        self.cached_layouts + self.cached_measures
    }
}

/// Receives phase notifications.
pub trait MarkerSink: Send + Sync {
    /// A phase began on `node`.
    fn start(&self, marker: Marker, node: NodeId);

    /// A phase ended on `node`. `stats` is only populated for [`Marker::Layout`].
    fn end(&self, marker: Marker, node: NodeId, stats: &LayoutStats);
}

/// Brackets a phase: notifies the sink on creation and again on drop.
pub(crate) struct MarkerSection {
    sink: Option<Arc<dyn MarkerSink>>,
    marker: Marker,
    node: NodeId,
    pub stats: LayoutStats,
}

impl MarkerSection {
    pub fn begin(config: &Config, marker: Marker, node: NodeId) -> Self {
        let sink = config.markers().cloned();
        if let Some(sink) = &sink {
            sink.start(marker, node);
        }
        Self {
            sink,
            marker,
            node,
            stats: LayoutStats::default(),
        }
    }
}

impl Drop for MarkerSection {
    fn drop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.end(self.marker, self.node, &self.stats);
        }
    }
}
