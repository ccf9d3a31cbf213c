//! Test fixtures for Trellis

use crate::graph::Graph;
use crate::model::{Edge, Node, NodeId, Rect};

/// `A:[B, C]` plus a top-level `D`, with edges `B→C` and `C→D`.
///
/// ```text
/// A (0,0 110x50)
/// ├── B (10,10 30x30)
/// └── C (70,10 30x30)
/// D (200,0 40x40)
/// ```
pub fn sample_graph() -> Graph {
    let b = Node::new("B", "b").with_rect(Rect::new(10.0, 10.0, 30.0, 30.0));
    let c = Node::new("C", "c").with_rect(Rect::new(70.0, 10.0, 30.0, 30.0));
    let a = Node::new("A", "a")
        .with_rect(Rect::new(0.0, 0.0, 110.0, 50.0))
        .with_children(vec![b, c]);
    let d = Node::new("D", "d").with_rect(Rect::new(200.0, 0.0, 40.0, 40.0));

    let mut graph = Graph::from_parts(
        vec![a, d],
        vec![Edge::new("e1", "B", "C"), Edge::new("e2", "C", "D")],
    );
    graph.width = 240.0;
    graph.height = 50.0;
    graph
}

/// Build a forest from a compact `(id, children)` description, no geometry.
pub fn tree(shape: &[(&str, &[&str])]) -> Vec<Node> {
    shape
        .iter()
        .map(|(id, children)| {
            let leaves = children.iter().map(|c| Node::new(*c, *c)).collect();
            Node::new(*id, *id).with_children(leaves)
        })
        .collect()
}

pub fn ids(raw: &[&str]) -> Vec<NodeId> {
    raw.iter().map(|s| NodeId::from(*s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_graph_is_valid() {
        let graph = sample_graph();
        assert!(graph.validate().is_ok());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
    }
}
