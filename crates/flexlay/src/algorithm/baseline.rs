//! [§ 8.5 Flex Container Baselines](https://www.w3.org/TR/css-flexbox-1/#flex-baselines)

use std::sync::Arc;

use crate::config::LogLevel;
use crate::instrumentation::{Marker, MarkerSection};
use crate::numeric::is_undefined;
use crate::style::{Align, PositionType};
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Distance from the top of `node`'s border box to its first baseline.
    ///
    /// A baseline callback answers for its node. Otherwise the baseline is
    /// taken from the first item on the first line that participates in
    /// baseline alignment, or failing that the first item. A node with no
    /// items has its baseline at its bottom edge.
    pub(crate) fn baseline(&self, node: NodeId) -> f32 {
        let n = &self.nodes[node];
        let [width, height] = n.state.measured;
        if let Some(baseline) = n.baseline.as_ref() {
            let baseline = Arc::clone(baseline);
            let value = {
                let _section = MarkerSection::begin(&n.config, Marker::BaselineFn, node);
                baseline(width, height)
            };
            if is_undefined(value) {
                n.config.log(
                    Some(node),
                    LogLevel::Warn,
                    "baseline function returned NaN; using the node's height",
                );
                return height;
            }
            return value;
        }

        let mut reference = None;
        for child in &n.children {
            let c = &self.nodes[*child];
            if c.state.line_index > 0 {
                break;
            }
            if !self.is_in_flow(*child) {
                continue;
            }
            if self.align_item(node, *child) == Align::Baseline || c.is_reference_baseline {
                reference = Some(*child);
                break;
            }
            if reference.is_none() {
                reference = Some(*child);
            }
        }

        match reference {
            Some(child) => self.baseline(child) + self.nodes[child].unrounded.top(),
            None => height,
        }
    }

    /// Whether items of `node` are aligned by their baselines.
    ///
    /// Only rows have a baseline to share.
    pub(crate) fn is_baseline_layout(&self, node: NodeId) -> bool {
        let style = &self.nodes[node].style;
        if style.flex_direction.is_column() {
            return false;
        }
        if style.align_items == Align::Baseline {
            return true;
        }
        self.nodes[node].children.iter().any(|child| {
            let s = &self.nodes[*child].style;
            s.position_type == PositionType::Relative && s.align_self == Align::Baseline
        })
    }
}
