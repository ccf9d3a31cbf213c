//! Drawing collaborators
//!
//! The only way visual output is produced: after every pass the renderer hands
//! the node partition and then the edge partition to a [`DrawSink`].

use trellis_core::{EdgeRecord, NodeRecord, Partition};

/// Receives the three-way partitions of each reconciliation pass.
pub trait DrawSink: Send {
    fn draw_nodes(&mut self, nodes: &Partition<NodeRecord>);
    fn draw_edges(&mut self, edges: &Partition<EdgeRecord>);
}

/// Keeps every partition it receives, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub node_batches: Vec<Partition<NodeRecord>>,
    pub edge_batches: Vec<Partition<EdgeRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_nodes(&self) -> Option<&Partition<NodeRecord>> {
        self.node_batches.last()
    }

    pub fn last_edges(&self) -> Option<&Partition<EdgeRecord>> {
        self.edge_batches.last()
    }

    /// Number of passes drawn.
    pub fn passes(&self) -> usize {
        self.node_batches.len()
    }
}

impl DrawSink for RecordingSink {
    fn draw_nodes(&mut self, nodes: &Partition<NodeRecord>) {
        self.node_batches.push(nodes.clone());
    }

    fn draw_edges(&mut self, edges: &Partition<EdgeRecord>) {
        self.edge_batches.push(edges.clone());
    }
}

/// Writes a one-line summary of each partition to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DrawSink for LogSink {
    fn draw_nodes(&mut self, nodes: &Partition<NodeRecord>) {
        let (new, updated, removed) = nodes.counts();
        tracing::info!("nodes: {} new, {} updated, {} removed", new, updated, removed);
        for record in &nodes.removed {
            tracing::debug!("  - node {}", record.id);
        }
    }

    fn draw_edges(&mut self, edges: &Partition<EdgeRecord>) {
        let (new, updated, removed) = edges.counts();
        tracing::info!("edges: {} new, {} updated, {} removed", new, updated, removed);
    }
}
