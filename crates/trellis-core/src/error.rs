//! Error types for model validation and grouping

use crate::model::{EdgeId, NodeId};
use thiserror::Error;

/// Structural problems found by [`crate::Graph::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("node id `{0}` appears more than once in the forest")]
    DuplicateNode(NodeId),
    #[error("edge `{edge}` references unknown node `{node}`")]
    DanglingEdge { edge: EdgeId, node: NodeId },
    #[error("edge id `{0}` appears more than once")]
    DuplicateEdge(EdgeId),
}

/// Reasons a group/ungroup request was rejected. The graph is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GroupError {
    #[error("no nodes selected")]
    EmptySelection,
    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),
    #[error("node id `{0}` is already in use")]
    IdInUse(NodeId),
    #[error("selected nodes do not share a single parent")]
    MixedParents,
    #[error("node `{0}` has no children to ungroup")]
    NotAContainer(NodeId),
}
