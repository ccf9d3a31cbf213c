//! Group/ungroup mutators that splice nodes into and out of a container node
//!
//! Both operations only touch the forest. The caller is expected to rebuild the
//! [`ParentIndex`] and schedule a new layout + reconciliation pass afterwards.

use crate::error::GroupError;
use crate::graph::{Graph, ParentIndex};
use crate::model::{Node, NodeId, Rect};
use std::collections::HashSet;

/// Move `ids` (which must be siblings) into a new container node `group_id`.
///
/// The container takes the slot of the first selected sibling and its rect is the
/// bounding box of its members until the next layout pass replaces it.
pub fn group(
    graph: &mut Graph,
    index: &ParentIndex,
    ids: &[NodeId],
    group_id: NodeId,
    label: &str,
) -> Result<NodeId, GroupError> {
    let first = ids.first().ok_or(GroupError::EmptySelection)?;
    if index.contains(&group_id) {
        return Err(GroupError::IdInUse(group_id));
    }
    if let Some(missing) = ids.iter().find(|id| !index.contains(id)) {
        return Err(GroupError::UnknownNode(missing.clone()));
    }

    let parent = index.parent(first).cloned();
    if ids.iter().any(|id| index.parent(id) != parent.as_ref()) {
        tracing::warn!(
            "Refusing to group {} nodes across different parents",
            ids.len()
        );
        return Err(GroupError::MixedParents);
    }

    let siblings = graph
        .children_of_mut(parent.as_ref())
        .ok_or_else(|| GroupError::UnknownNode(first.clone()))?;

    let selected: HashSet<&NodeId> = ids.iter().collect();
    let insert_at = siblings
        .iter()
        .position(|n| selected.contains(&n.id))
        .ok_or_else(|| GroupError::UnknownNode(first.clone()))?;

    let (members, mut rest): (Vec<Node>, Vec<Node>) = std::mem::take(siblings)
        .into_iter()
        .partition(|n| selected.contains(&n.id));

    let rect = members
        .iter()
        .map(|n| n.rect)
        .reduce(|acc, r| acc.union(&r))
        .unwrap_or(Rect::default());

    let container = Node {
        id: group_id.clone(),
        label: label.to_string(),
        rect,
        payload: serde_json::Value::Null,
        children: members,
    };
    rest.insert(insert_at, container);
    *siblings = rest;

    tracing::debug!("Grouped {} nodes into {}", selected.len(), group_id);
    Ok(group_id)
}

/// Dissolve container `group_id`, splicing its children into its parent at the
/// container's position. Returns the ids of the released children.
pub fn ungroup(
    graph: &mut Graph,
    index: &ParentIndex,
    group_id: &NodeId,
) -> Result<Vec<NodeId>, GroupError> {
    if !index.contains(group_id) {
        return Err(GroupError::UnknownNode(group_id.clone()));
    }
    let parent = index.parent(group_id).cloned();
    let siblings = graph
        .children_of_mut(parent.as_ref())
        .ok_or_else(|| GroupError::UnknownNode(group_id.clone()))?;
    let position = siblings
        .iter()
        .position(|n| &n.id == group_id)
        .ok_or_else(|| GroupError::UnknownNode(group_id.clone()))?;

    if siblings[position].children.is_empty() {
        return Err(GroupError::NotAContainer(group_id.clone()));
    }

    let container = siblings.remove(position);
    let released: Vec<NodeId> = container.children.iter().map(|n| n.id.clone()).collect();
    siblings.splice(position..position, container.children);

    tracing::debug!("Ungrouped {} releasing {} nodes", group_id, released.len());
    Ok(released)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ids, sample_graph};

    #[test]
    fn test_group_siblings() {
        let mut graph = sample_graph();
        let index = ParentIndex::build(&graph);

        let group_id =
            group(&mut graph, &index, &ids(&["B", "C"]), NodeId::from("G"), "group").unwrap();
        assert_eq!(group_id, NodeId::from("G"));

        let index = ParentIndex::build(&graph);
        assert_eq!(index.parent(&NodeId::from("G")), Some(&NodeId::from("A")));
        assert_eq!(index.parent(&NodeId::from("B")), Some(&NodeId::from("G")));
        assert_eq!(index.parent(&NodeId::from("C")), Some(&NodeId::from("G")));

        let a = graph.find_node(&NodeId::from("A")).unwrap();
        let order: Vec<&str> = a.children.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["G"]);
    }

    #[test]
    fn test_group_rect_is_bounding_box() {
        let mut graph = sample_graph();
        let index = ParentIndex::build(&graph);
        group(&mut graph, &index, &ids(&["B", "C"]), NodeId::from("G"), "").unwrap();

        let g = graph.find_node(&NodeId::from("G")).unwrap();
        assert_eq!(g.rect, Rect::new(10.0, 10.0, 90.0, 30.0));
    }

    #[test]
    fn test_group_across_parents_is_rejected() {
        let mut graph = sample_graph();
        let before = graph.clone();
        let index = ParentIndex::build(&graph);

        let result = group(&mut graph, &index, &ids(&["B", "D"]), NodeId::from("G"), "");
        assert_eq!(result, Err(GroupError::MixedParents));
        assert_eq!(graph, before);
    }

    #[test]
    fn test_group_rejects_bad_input() {
        let mut graph = sample_graph();
        let index = ParentIndex::build(&graph);

        assert_eq!(
            group(&mut graph, &index, &[], NodeId::from("G"), ""),
            Err(GroupError::EmptySelection)
        );
        assert_eq!(
            group(&mut graph, &index, &ids(&["B"]), NodeId::from("A"), ""),
            Err(GroupError::IdInUse(NodeId::from("A")))
        );
        assert_eq!(
            group(&mut graph, &index, &ids(&["Z"]), NodeId::from("G"), ""),
            Err(GroupError::UnknownNode(NodeId::from("Z")))
        );
    }

    #[test]
    fn test_ungroup_restores_position() {
        let mut graph = sample_graph();
        let index = ParentIndex::build(&graph);

        let released = ungroup(&mut graph, &index, &NodeId::from("A")).unwrap();
        assert_eq!(released, ids(&["B", "C"]));

        let top: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(top, vec!["B", "C", "D"]);
    }

    #[test]
    fn test_ungroup_leaf_is_rejected() {
        let mut graph = sample_graph();
        let index = ParentIndex::build(&graph);
        assert_eq!(
            ungroup(&mut graph, &index, &NodeId::from("D")),
            Err(GroupError::NotAContainer(NodeId::from("D")))
        );
    }
}
