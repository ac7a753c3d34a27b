//! Snapping finished layouts to the pixel grid.
//!
//! Edges are rounded in absolute coordinates and sizes derived from the
//! rounded edges, so adjacent boxes never open a gap or overlap by a pixel.

use crate::numeric::{float_eq, round_to_pixel_grid};
use crate::style::{NodeType, PhysicalEdge};
use crate::tree::{NodeId, Tree};

impl Tree {
    /// Publish the layout of `node` and its subtree.
    ///
    /// `absolute_left` and `absolute_top` locate the owner's border box,
    /// unrounded, relative to the root. A node whose published geometry
    /// changes gets its new-layout flag set.
    pub(crate) fn finalize(&mut self, node: NodeId, absolute_left: f32, absolute_top: f32) {
        let scale = self.nodes[node].config.point_scale_factor();
        let baseline = self.baseline(node);

        let n = &mut self.nodes[node];
        n.unrounded.baseline = baseline;
        let unrounded = n.unrounded;
        let node_left = unrounded.left();
        let node_top = unrounded.top();
        let absolute_node_left = absolute_left + node_left;
        let absolute_node_top = absolute_top + node_top;

        let mut layout = unrounded;
        if scale != 0.0 {
            let text = n.node_type == NodeType::Text;
            let width = unrounded.width();
            let height = unrounded.height();
            let absolute_right = absolute_node_left + width;
            let absolute_bottom = absolute_node_top + height;

            layout.position[PhysicalEdge::Left.index()] =
                round_to_pixel_grid(node_left, scale, false, text);
            layout.position[PhysicalEdge::Top.index()] =
                round_to_pixel_grid(node_top, scale, false, text);
            for edge in [PhysicalEdge::Right, PhysicalEdge::Bottom] {
                layout.position[edge.index()] =
                    round_to_pixel_grid(unrounded.position[edge.index()], scale, false, false);
            }

            // Text keeps its full extent: a fractional size rounds up, a whole one stays put.
            let fractional = |size: f32| {
                let fraction = (size * scale).rem_euclid(1.0);
                !float_eq(fraction, 0.0) && !float_eq(fraction, 1.0)
            };
            let width_fractional = fractional(width);
            let height_fractional = fractional(height);
            layout.dimensions[0] = round_to_pixel_grid(
                absolute_right,
                scale,
                text && width_fractional,
                text && !width_fractional,
            ) - round_to_pixel_grid(absolute_node_left, scale, false, text);
            layout.dimensions[1] = round_to_pixel_grid(
                absolute_bottom,
                scale,
                text && height_fractional,
                text && !height_fractional,
            ) - round_to_pixel_grid(absolute_node_top, scale, false, text);
            layout.baseline = round_to_pixel_grid(baseline, scale, false, false);
        }

        if !n.layout.same_geometry(&layout) {
            n.has_new_layout = true;
        }
        n.layout = layout;

        let children = n.children.clone();
        for child in children {
            self.finalize(child, absolute_node_left, absolute_node_top);
        }
    }
}
