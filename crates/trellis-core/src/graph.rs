//! Graph forest plus the derived parent index

use crate::error::ModelError;
use crate::model::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The graph model: an ordered forest of nodes and a flat edge list.
#[derive(Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.node_count())
            .field("edge_count", &self.edge_count())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Graph {
            nodes,
            edges,
            ..Default::default()
        }
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Depth-first, pre-order walk yielding each node with its direct parent id.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.nodes.iter().rev().map(|n| (None, n)).collect(),
        }
    }

    /// Get a node by ID, searching the whole forest.
    pub fn find_node(&self, id: &NodeId) -> Option<&Node> {
        self.walk().map(|(_, node)| node).find(|node| &node.id == id)
    }

    /// Get a mutable node by ID.
    pub fn find_node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        find_in_mut(&mut self.nodes, id)
    }

    /// Direct children of `parent`, or the top-level list when `parent` is `None`.
    pub fn children_of(&self, parent: Option<&NodeId>) -> Option<&[Node]> {
        match parent {
            None => Some(&self.nodes),
            Some(id) => self.find_node(id).map(|n| n.children.as_slice()),
        }
    }

    /// Mutable sibling list for `parent`.
    pub fn children_of_mut(&mut self, parent: Option<&NodeId>) -> Option<&mut Vec<Node>> {
        match parent {
            None => Some(&mut self.nodes),
            Some(id) => self.find_node_mut(id).map(|n| &mut n.children),
        }
    }

    /// Get an edge by ID.
    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    /// Get a mutable edge by ID.
    pub fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    /// All edges whose source or target is `node`.
    pub fn edges_touching<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node))
    }

    /// Check the forest invariants the rest of the crate assumes but never re-checks:
    /// unique node ids, unique edge ids, and edges that reference existing nodes.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for (_, node) in self.walk() {
            if !seen.insert(&node.id) {
                return Err(ModelError::DuplicateNode(node.id.clone()));
            }
        }

        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if !edge_ids.insert(&edge.id) {
                return Err(ModelError::DuplicateEdge(edge.id.clone()));
            }
            for end in [&edge.source, &edge.target] {
                if !seen.contains(end) {
                    return Err(ModelError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: end.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

fn find_in_mut<'a>(nodes: &'a mut [Node], id: &NodeId) -> Option<&'a mut Node> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Iterator returned by [`Graph::walk`].
pub struct Walk<'a> {
    stack: Vec<(Option<&'a NodeId>, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (Option<&'a NodeId>, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (parent, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (Some(&node.id), child)));
        Some((parent, node))
    }
}

/// Map from node id to its direct parent id (`None` for top-level nodes).
///
/// Derived from a [`Graph`]; it does not follow later mutations on its own.
/// Call [`ParentIndex::rebuild`] after every change to the forest.
#[derive(Debug, Clone, Default)]
pub struct ParentIndex {
    parents: HashMap<NodeId, Option<NodeId>>,
}

impl ParentIndex {
    pub fn build(graph: &Graph) -> Self {
        let mut index = ParentIndex::default();
        index.rebuild(graph);
        index
    }

    /// Discard the current mapping and re-derive it from `graph`.
    pub fn rebuild(&mut self, graph: &Graph) {
        self.parents.clear();
        for (parent, node) in graph.walk() {
            if self.parents.contains_key(&node.id) {
                tracing::warn!("Duplicate node id {} in forest, keeping first occurrence", node.id);
                continue;
            }
            self.parents.insert(node.id.clone(), parent.cloned());
        }
        tracing::debug!("Parent index rebuilt with {} entries", self.parents.len());
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.parents.contains_key(id)
    }

    /// Direct parent of `id`. `None` for top-level and unknown nodes alike.
    pub fn parent(&self, id: &NodeId) -> Option<&NodeId> {
        self.parents.get(id).and_then(|p| p.as_ref())
    }

    /// Ancestor chain of `id`, nearest first.
    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            // a malformed forest must not spin forever
            if chain.len() > self.parents.len() {
                break;
            }
            chain.push(parent.clone());
            current = parent;
        }
        chain
    }

    /// Nesting depth (0 for top-level), or `None` for unknown ids.
    pub fn depth(&self, id: &NodeId) -> Option<usize> {
        self.contains(id).then(|| self.ancestors(id).len())
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
