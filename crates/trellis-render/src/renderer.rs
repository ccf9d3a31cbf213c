//! Render passes, drag re-routing, and grouping on top of the core engine

use crate::config::RenderConfig;
use crate::draw::DrawSink;
use crate::layout::LayoutEngine;
use anyhow::{Context, Result};
use std::collections::HashSet;
use trellis_core::{
    group, ungroup, EdgeId, Graph, GroupError, Node, NodeId, ParentIndex, Point, Reconciler,
    Reconciliation,
};
use trellis_router::{find_simplified_path, RectCollider};

/// Owns the graph model and the rendered scene state.
///
/// The model is only mutated between passes, through `&mut self`, so a pass never
/// observes a half-applied change.
pub struct Renderer<L, D> {
    graph: Graph,
    index: ParentIndex,
    reconciler: Reconciler,
    layout: L,
    sink: D,
    config: RenderConfig,
    dirty: bool,
}

impl<L, D> std::fmt::Debug for Renderer<L, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("graph", &self.graph)
            .field("sequence", &self.reconciler.sequence())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<L, D> Renderer<L, D>
where
    L: LayoutEngine,
    D: DrawSink,
{
    pub fn new(layout: L, sink: D, config: RenderConfig) -> Self {
        Renderer {
            graph: Graph::new(),
            index: ParentIndex::default(),
            reconciler: Reconciler::new(),
            layout,
            sink,
            config,
            dirty: true,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn index(&self) -> &ParentIndex {
        &self.index
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut D {
        &mut self.sink
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// True when the model changed since the last layout.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replace the model wholesale, e.g. with a new snapshot from an external store.
    pub fn set_graph(&mut self, graph: Graph) {
        self.graph = graph;
        self.rebuild_index();
        self.dirty = true;
    }

    pub fn rebuild_index(&mut self) {
        self.index.rebuild(&self.graph);
    }

    /// Full pass: layout, rebuild the parent index, reconcile, draw.
    pub async fn render(&mut self) -> Result<Reconciliation> {
        let laid_out = self
            .layout
            .layout(self.graph.clone())
            .await
            .context("layout failed")?;
        self.graph = laid_out;
        self.rebuild_index();
        self.dirty = false;
        Ok(self.draw())
    }

    /// Reconcile and draw the current geometry without running layout. Used while
    /// dragging, where layout would undo the move.
    pub fn redraw(&mut self) -> Reconciliation {
        self.draw()
    }

    /// [`Renderer::render`] when the model is dirty, [`Renderer::redraw`] otherwise.
    pub async fn refresh(&mut self) -> Result<Reconciliation> {
        if self.dirty {
            self.render().await
        } else {
            Ok(self.redraw())
        }
    }

    fn draw(&mut self) -> Reconciliation {
        let pass = self.reconciler.reconcile(&self.graph);
        self.sink.draw_nodes(&pass.nodes);
        self.sink.draw_edges(&pass.edges);
        if self.config.auto_prune {
            self.reconciler.prune_removed();
        }

        let (nn, nu, nr) = pass.nodes.counts();
        tracing::info!(
            "Pass #{}: {} nodes (+{} -{}), {} edges",
            pass.sequence,
            nn + nu,
            nn,
            nr,
            pass.edges.new.len() + pass.edges.updated.len()
        );
        pass
    }

    /// Drag `id` (and its subtree) by `(dx, dy)` and re-route every edge touching a
    /// moved node. Returns the ids of the re-routed edges.
    pub fn move_node(&mut self, id: &NodeId, dx: f64, dy: f64) -> Result<Vec<EdgeId>> {
        let node = self
            .graph
            .find_node_mut(id)
            .with_context(|| format!("unknown node {id}"))?;
        node.translate(dx, dy);

        let mut moved = Vec::new();
        collect_ids(node, &mut moved);
        let moved_set: HashSet<&NodeId> = moved.iter().collect();

        for edge in &mut self.graph.edges {
            if edge.points.len() < 2 {
                continue;
            }
            let last = edge.points.len() - 1;
            if moved_set.contains(&edge.source) {
                edge.points[0] = edge.points[0].translate(dx, dy);
            }
            if moved_set.contains(&edge.target) {
                edge.points[last] = edge.points[last].translate(dx, dy);
            }
        }

        self.reroute_edges_for(&moved)
    }

    /// Re-route every edge touching any of `ids` with A* against the current node
    /// geometry, replacing the edge points. Edges whose endpoints cannot be
    /// resolved are left alone.
    pub fn reroute_edges_for(&mut self, ids: &[NodeId]) -> Result<Vec<EdgeId>> {
        let touching: Vec<EdgeId> = self
            .graph
            .edges
            .iter()
            .filter(|e| ids.iter().any(|id| e.touches(id)))
            .map(|e| e.id.clone())
            .collect();

        let mut rerouted = Vec::with_capacity(touching.len());
        for edge_id in touching {
            let Some(edge) = self.graph.edge(&edge_id) else {
                continue;
            };
            let endpoints = self.endpoints(&edge.points, &edge.source, &edge.target);
            let Some((start, goal)) = endpoints else {
                tracing::warn!("Cannot re-route {}: endpoint geometry unknown", edge_id);
                continue;
            };

            let exempt = [edge.source.clone(), edge.target.clone()];
            let padding = self.config.router.padding;
            let collider = RectCollider::from_graph(&self.graph, &self.index, &exempt, padding);
            let route = find_simplified_path(start, goal, &collider, &self.config.router)
                .with_context(|| format!("routing edge {edge_id}"))?;
            if route.is_fallback() {
                tracing::debug!(
                    "Edge {} fell back to a straight line ({:?})",
                    edge_id,
                    route.outcome
                );
            }

            if let Some(edge) = self.graph.edge_mut(&edge_id) {
                edge.points = route.points;
            }
            rerouted.push(edge_id);
        }

        Ok(rerouted)
    }

    /// Current route endpoints, or the node centres when the edge has no route yet.
    fn endpoints(
        &self,
        points: &[Point],
        source: &NodeId,
        target: &NodeId,
    ) -> Option<(Point, Point)> {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            if points.len() >= 2 {
                return Some((*first, *last));
            }
        }
        let from = self.graph.find_node(source)?.rect.center();
        let to = self.graph.find_node(target)?.rect.center();
        Some((from, to))
    }

    /// Wrap sibling nodes `ids` in a new container. The next pass re-lays-out.
    pub fn group(
        &mut self,
        ids: &[NodeId],
        group_id: NodeId,
        label: &str,
    ) -> Result<NodeId, GroupError> {
        let id = group(&mut self.graph, &self.index, ids, group_id, label)?;
        self.rebuild_index();
        self.dirty = true;
        Ok(id)
    }

    /// Dissolve container `group_id` into its parent. The next pass re-lays-out.
    pub fn ungroup(&mut self, group_id: &NodeId) -> Result<Vec<NodeId>, GroupError> {
        let released = ungroup(&mut self.graph, &self.index, group_id)?;
        self.rebuild_index();
        self.dirty = true;
        Ok(released)
    }
}

fn collect_ids(node: &Node, out: &mut Vec<NodeId>) {
    out.push(node.id.clone());
    for child in &node.children {
        collect_ids(child, out);
    }
}
