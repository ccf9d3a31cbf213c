//! Hierarchical reconciliation of graph snapshots against the rendered scene
//!
//! Each pass keys the incoming children of every parent scope by id against the
//! children tracked for that same scope, and sorts them into new / updated /
//! removed. Matching is strictly scope-local: a node that changes parent is
//! removed from the old scope and new in the other. Edges are not nested and are
//! matched globally by id.
//!
//! Classification is returned out of band as a [`Reconciliation`]; neither the
//! graph nor its nodes are tagged.

use crate::graph::Graph;
use crate::model::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Where an entity stands relative to the previously rendered scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Present now, absent from this scope before.
    New,
    /// Present before and now. Always reprocessed; there is no content check.
    Updated,
    /// Present before, absent now.
    Removed,
}

/// Three-way split handed to the drawing collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Partition<T> {
    pub new: Vec<T>,
    pub updated: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> Partition<T> {
    pub fn new() -> Self {
        Partition {
            new: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn get(&self, lifecycle: Lifecycle) -> &[T] {
        match lifecycle {
            Lifecycle::New => &self.new,
            Lifecycle::Updated => &self.updated,
            Lifecycle::Removed => &self.removed,
        }
    }

    pub fn len(&self) -> usize {
        self.new.len() + self.updated.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(new, updated, removed)` counts.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.new.len(), self.updated.len(), self.removed.len())
    }
}

impl<T> Default for Partition<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// What the scene knows about a node for one pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    /// Scope the node was matched in. `None` for top-level nodes.
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub label: String,
    /// Recomputed from the model every pass, whatever the classification.
    pub rect: Rect,
    pub payload: serde_json::Value,
}

impl NodeRecord {
    fn from_node(node: &Node, parent: Option<&NodeId>, depth: usize) -> Self {
        NodeRecord {
            id: node.id.clone(),
            parent: parent.cloned(),
            depth,
            label: node.label.clone(),
            rect: node.rect,
            payload: node.payload.clone(),
        }
    }
}

/// What the scene knows about an edge for one pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub points: Vec<Point>,
    pub payload: serde_json::Value,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        EdgeRecord {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            points: edge.points.clone(),
            payload: edge.payload.clone(),
        }
    }
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reconciliation {
    /// Monotonically increasing pass number.
    pub sequence: u64,
    pub nodes: Partition<NodeRecord>,
    pub edges: Partition<EdgeRecord>,
}

impl Reconciliation {
    /// Node ids in one partition, in emission order.
    pub fn node_ids(&self, lifecycle: Lifecycle) -> Vec<&NodeId> {
        self.nodes.get(lifecycle).iter().map(|r| &r.id).collect()
    }

    /// Edge ids in one partition, in emission order.
    pub fn edge_ids(&self, lifecycle: Lifecycle) -> Vec<&EdgeId> {
        self.edges.get(lifecycle).iter().map(|r| &r.id).collect()
    }

    /// Every classification `id` received this pass. A re-parented node shows up
    /// twice: removed from its old scope, new in its new one.
    pub fn node_lifecycles(&self, id: &NodeId) -> Vec<Lifecycle> {
        [Lifecycle::New, Lifecycle::Updated, Lifecycle::Removed]
            .into_iter()
            .flat_map(|l| {
                self.nodes
                    .get(l)
                    .iter()
                    .filter(move |r| &r.id == id)
                    .map(move |_| l)
            })
            .collect()
    }

    pub fn edge_lifecycle(&self, id: &EdgeId) -> Option<Lifecycle> {
        [Lifecycle::New, Lifecycle::Updated, Lifecycle::Removed]
            .into_iter()
            .find(|&l| self.edges.get(l).iter().any(|r| &r.id == id))
    }

    /// True when anything entered or left the scene.
    pub fn has_structural_changes(&self) -> bool {
        !self.nodes.new.is_empty()
            || !self.nodes.removed.is_empty()
            || !self.edges.new.is_empty()
            || !self.edges.removed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// One tracked node: its self slot plus its children slot.
#[derive(Debug, Clone)]
struct TrackedNode {
    record: NodeRecord,
    /// Emitted as removed; kept until pruned or confirmed absent next pass.
    retired: bool,
    children: Vec<TrackedNode>,
}

impl TrackedNode {
    fn new(record: NodeRecord) -> Self {
        TrackedNode {
            record,
            retired: false,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct TrackedEdge {
    record: EdgeRecord,
    retired: bool,
}

/// Owner of the previously rendered scene.
#[derive(Debug, Default)]
pub struct Reconciler {
    sequence: u64,
    roots: Vec<TrackedNode>,
    edges: Vec<TrackedEdge>,
}

impl Reconciler {
    pub fn new() -> Self {
        Reconciler::default()
    }

    /// Classify every node and edge of `graph` against the tracked scene, then
    /// make `graph` the tracked scene.
    pub fn reconcile(&mut self, graph: &Graph) -> Reconciliation {
        let mut nodes = Partition::new();
        reconcile_scope(&mut self.roots, &graph.nodes, None, 0, &mut nodes);
        let edges = reconcile_edges(&mut self.edges, &graph.edges);

        self.sequence += 1;
        let (nn, nu, nr) = nodes.counts();
        let (en, eu, er) = edges.counts();
        tracing::debug!(
            "Reconciliation #{}: nodes +{} ~{} -{}, edges +{} ~{} -{}",
            self.sequence,
            nn,
            nu,
            nr,
            en,
            eu,
            er
        );

        Reconciliation {
            sequence: self.sequence,
            nodes,
            edges,
        }
    }

    /// Forget entries already reported as removed. Called by the drawing side once
    /// it has taken them off screen.
    pub fn prune_removed(&mut self) {
        prune_scope(&mut self.roots);
        self.edges.retain(|e| !e.retired);
    }

    /// Number of passes run so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Nodes currently on screen (retired entries excluded).
    pub fn live_node_count(&self) -> usize {
        fn count(scope: &[TrackedNode]) -> usize {
            scope
                .iter()
                .filter(|n| !n.retired)
                .map(|n| 1 + count(&n.children))
                .sum()
        }
        count(&self.roots)
    }

    pub fn live_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| !e.retired).count()
    }

    /// Drop the tracked scene; the next pass classifies everything as new.
    pub fn reset(&mut self) {
        self.roots.clear();
        self.edges.clear();
    }
}

fn reconcile_scope(
    tracked: &mut Vec<TrackedNode>,
    incoming: &[Node],
    parent: Option<&NodeId>,
    depth: usize,
    out: &mut Partition<NodeRecord>,
) {
    let incoming_ids: HashSet<&NodeId> = incoming.iter().map(|n| &n.id).collect();

    let mut previous: HashMap<NodeId, TrackedNode> = HashMap::new();
    let mut retired = Vec::new();
    for entry in std::mem::take(tracked) {
        // Retired last pass: still absent means gone for good, present again
        // means it is rebuilt below as new.
        if entry.retired {
            continue;
        }
        if incoming_ids.contains(&entry.record.id) {
            previous.insert(entry.record.id.clone(), entry);
        } else {
            out.removed.push(entry.record.clone());
            retired.push(TrackedNode {
                retired: true,
                ..entry
            });
        }
    }

    let mut next = Vec::with_capacity(incoming.len() + retired.len());
    for node in incoming {
        let record = NodeRecord::from_node(node, parent, depth);
        let mut slot = match previous.remove(&node.id) {
            Some(mut existing) => {
                existing.record = record.clone();
                out.updated.push(record);
                existing
            }
            None => {
                out.new.push(record.clone());
                TrackedNode::new(record)
            }
        };
        reconcile_scope(&mut slot.children, &node.children, Some(&node.id), depth + 1, out);
        next.push(slot);
    }

    next.extend(retired);
    *tracked = next;
}

fn reconcile_edges(tracked: &mut Vec<TrackedEdge>, incoming: &[Edge]) -> Partition<EdgeRecord> {
    let mut out = Partition::new();
    let incoming_ids: HashSet<&EdgeId> = incoming.iter().map(|e| &e.id).collect();

    let mut previous: HashSet<EdgeId> = HashSet::new();
    let mut retired = Vec::new();
    for entry in std::mem::take(tracked) {
        if entry.retired {
            continue;
        }
        if incoming_ids.contains(&entry.record.id) {
            previous.insert(entry.record.id);
        } else {
            out.removed.push(entry.record.clone());
            retired.push(TrackedEdge {
                record: entry.record,
                retired: true,
            });
        }
    }

    let mut next = Vec::with_capacity(incoming.len() + retired.len());
    for edge in incoming {
        let record = EdgeRecord::from(edge);
        if previous.remove(&edge.id) {
            out.updated.push(record.clone());
        } else {
            out.new.push(record.clone());
        }
        next.push(TrackedEdge {
            record,
            retired: false,
        });
    }

    next.extend(retired);
    *tracked = next;
    out
}

fn prune_scope(scope: &mut Vec<TrackedNode>) {
    scope.retain(|n| !n.retired);
    for node in scope {
        prune_scope(&mut node.children);
    }
}
