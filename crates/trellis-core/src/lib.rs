//! Trellis Core — Graph model, parent index, grouping, and reconciliation engine

pub mod error;
pub mod graph;
pub mod grouping;
pub mod model;
pub mod reconcile;


#[cfg(test)]
pub mod test_utils;

pub use error::{GroupError, ModelError};
pub use graph::{Graph, ParentIndex, Walk};
pub use grouping::{group, ungroup};
pub use model::{Edge, EdgeId, Node, NodeId, Point, Rect};
pub use reconcile::{EdgeRecord, Lifecycle, NodeRecord, Partition, Reconciler, Reconciliation};
