//! Layout collaborators
//!
//! A layout takes the whole graph and hands back the same forest with node rects
//! (and ideally edge points) filled in. It may be asynchronous; the renderer waits
//! for it before reconciling.

use crate::config::LayoutConfig;
use async_trait::async_trait;
use std::collections::HashMap;
use trellis_core::{Graph, Node, NodeId, Point, Rect};

/// Assigns geometry to a graph.
#[async_trait]
pub trait LayoutEngine: Send + Sync {
    async fn layout(&self, graph: Graph) -> anyhow::Result<Graph>;
}

/// Keeps whatever geometry the graph already carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughLayout;

#[async_trait]
impl LayoutEngine for PassthroughLayout {
    async fn layout(&self, graph: Graph) -> anyhow::Result<Graph> {
        Ok(graph)
    }
}

/// Packs siblings left to right and grows containers around their children.
/// Edges get a straight segment between node centres.
#[derive(Debug, Clone, Default)]
pub struct StackLayout {
    config: LayoutConfig,
}

impl StackLayout {
    pub fn new(config: LayoutConfig) -> Self {
        StackLayout { config }
    }

    /// Place `nodes` in a row starting at `origin`; returns the row's extent.
    fn place_row(&self, nodes: &mut [Node], origin: Point) -> (f64, f64) {
        let c = &self.config;
        let mut x = origin.x;
        let mut height: f64 = 0.0;

        for (i, node) in nodes.iter_mut().enumerate() {
            if i > 0 {
                x += c.spacing;
            }
            let (w, h) = if node.children.is_empty() {
                (c.node_width, c.node_height)
            } else {
                let inner = Point::new(x + c.padding, origin.y + c.header);
                let (cw, ch) = self.place_row(&mut node.children, inner);
                (
                    (cw + c.padding * 2.0).max(c.node_width),
                    ch + c.header + c.padding,
                )
            };
            node.rect = Rect::new(x, origin.y, w, h);
            x += w;
            height = height.max(h);
        }

        (x - origin.x, height)
    }
}

#[async_trait]
impl LayoutEngine for StackLayout {
    async fn layout(&self, mut graph: Graph) -> anyhow::Result<Graph> {
        let origin = Point::new(self.config.spacing, self.config.spacing);
        let (width, height) = self.place_row(&mut graph.nodes, origin);
        graph.width = width + self.config.spacing * 2.0;
        graph.height = height + self.config.spacing * 2.0;

        let centres: HashMap<NodeId, Point> = graph
            .walk()
            .map(|(_, node)| (node.id.clone(), node.rect.center()))
            .collect();
        for edge in &mut graph.edges {
            let ends = (centres.get(&edge.source), centres.get(&edge.target));
            if let (Some(&from), Some(&to)) = ends {
                edge.points = vec![from, to];
            } else {
                tracing::warn!("Edge {} references a node that is not in the graph", edge.id);
                edge.points.clear();
            }
        }

        tracing::debug!(
            "Stack layout placed {} nodes in {}x{}",
            centres.len(),
            graph.width,
            graph.height
        );
        Ok(graph)
    }
}
