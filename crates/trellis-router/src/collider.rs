//! Collision predicates for the grid router

use std::collections::HashSet;
use trellis_core::{Graph, NodeId, ParentIndex, Point, Rect};

/// Tells the router whether a point is blocked.
pub trait Collider {
    fn is_blocked(&self, point: Point) -> bool;
}

impl<F> Collider for F
where
    F: Fn(Point) -> bool,
{
    fn is_blocked(&self, point: Point) -> bool {
        self(point)
    }
}

/// Blocks every point inside any of a set of (padded) rectangles.
#[derive(Debug, Clone, Default)]
pub struct RectCollider {
    rects: Vec<Rect>,
}

impl RectCollider {
    pub fn new(rects: Vec<Rect>) -> Self {
        RectCollider { rects }
    }

    /// Obstacles from the current node geometry of `graph`.
    ///
    /// The `exempt` nodes (normally an edge's two endpoints) do not block, and
    /// neither do their ancestors, which enclose them, nor their descendants.
    /// Nodes without a laid-out size are skipped.
    pub fn from_graph(graph: &Graph, index: &ParentIndex, exempt: &[NodeId], padding: f64) -> Self {
        let endpoints: HashSet<&NodeId> = exempt.iter().collect();
        let mut skip: HashSet<NodeId> = exempt.iter().cloned().collect();
        for id in exempt {
            skip.extend(index.ancestors(id));
        }

        let rects = graph
            .walk()
            .map(|(_, node)| node)
            .filter(|node| node.rect.width > 0.0 && node.rect.height > 0.0)
            .filter(|node| !skip.contains(&node.id))
            .filter(|node| !index.ancestors(&node.id).iter().any(|a| endpoints.contains(a)))
            .map(|node| node.rect.inflate(padding))
            .collect::<Vec<_>>();

        tracing::trace!("Collider built with {} obstacles", rects.len());
        RectCollider { rects }
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl Collider for RectCollider {
    fn is_blocked(&self, point: Point) -> bool {
        self.rects.iter().any(|r| r.contains(point))
    }
}
