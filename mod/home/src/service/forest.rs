use std::collections::HashSet;

use crate::model::{PersistedLandingNode, ROOT_PARENT};
use crate::service::HomeError;

/// The persisted shape of the whole landing hierarchy: one inner group per
/// independent tree. Node ids are unique across the forest.
pub type Forest = Vec<Vec<PersistedLandingNode>>;

/// Whether a group already contains a node with the given id.
pub fn is_member(group: &[PersistedLandingNode], id: &str) -> bool {
    group.iter().any(|node| node.id == id)
}

/// Whether a group already contains any node of an incoming edit unit.
/// Membership is decided over the whole flattened unit, not just its head:
/// a new wrapper node adopting a stored child still belongs to that
/// child's group.
pub fn contains_any(group: &[PersistedLandingNode], incoming: &[PersistedLandingNode]) -> bool {
    incoming.iter().any(|node| is_member(group, &node.id))
}

/// Union-merge incoming nodes into a group: a node with a known id replaces
/// the stored one in place, an unknown id is appended, and stored nodes the
/// incoming set does not mention are left untouched. Saving one subtree
/// never discards its siblings.
pub fn merge_into_group(group: &mut Vec<PersistedLandingNode>, incoming: Vec<PersistedLandingNode>) {
    for node in incoming {
        match group.iter_mut().find(|existing| existing.id == node.id) {
            Some(existing) => *existing = node,
            None => group.push(node),
        }
    }
}

/// Start a new independent tree.
pub fn append_group(forest: &mut Forest, group: Vec<PersistedLandingNode>) {
    forest.push(group);
}

/// Attach nodes to the group that holds their parent. Ids the group
/// already knows are replaced, never duplicated.
pub fn attach_to_parent(
    forest: &mut Forest,
    parent: &str,
    nodes: Vec<PersistedLandingNode>,
) -> Result<(), HomeError> {
    let group = forest
        .iter_mut()
        .find(|group| is_member(group, parent))
        .ok_or_else(|| HomeError::NotFound(format!("parent landing page not found: {parent}")))?;
    merge_into_group(group, nodes);
    Ok(())
}

/// Remove the listed nodes and everything that hangs off them.
///
/// Each group is rebuilt from its root by reachability, so children of a
/// deleted node go with it and pre-existing orphans are swept out too. A
/// group whose root is deleted disappears entirely.
pub fn delete_nodes(forest: Forest, ids: &[String]) -> Forest {
    let doomed: HashSet<&str> = ids.iter().map(String::as_str).collect();

    forest
        .into_iter()
        .filter_map(|group| {
            let survivors: Vec<PersistedLandingNode> = group
                .into_iter()
                .filter(|node| !doomed.contains(node.id.as_str()))
                .collect();
            let kept = reachable_from_root(survivors);
            if kept.is_empty() {
                None
            } else {
                Some(kept)
            }
        })
        .collect()
}

fn reachable_from_root(group: Vec<PersistedLandingNode>) -> Vec<PersistedLandingNode> {
    let mut reachable: HashSet<String> = group
        .iter()
        .filter(|node| node.parent == ROOT_PARENT)
        .map(|node| node.id.clone())
        .collect();

    // Fixpoint over parent links; terminates because each pass only grows
    // the set.
    loop {
        let before = reachable.len();
        for node in &group {
            if reachable.contains(&node.parent) {
                reachable.insert(node.id.clone());
            }
        }
        if reachable.len() == before {
            break;
        }
    }

    group
        .into_iter()
        .filter(|node| reachable.contains(&node.id))
        .collect()
}

/// Exchange the persisted order values of two nodes, leaving everything
/// else where it is.
pub fn swap_order(forest: &mut Forest, id_a: &str, id_b: &str) -> Result<(), HomeError> {
    let order_a = order_of(forest, id_a)?;
    let order_b = order_of(forest, id_b)?;
    set_order(forest, id_a, order_b);
    set_order(forest, id_b, order_a);
    Ok(())
}

fn order_of(forest: &Forest, id: &str) -> Result<Option<i64>, HomeError> {
    forest
        .iter()
        .flatten()
        .find(|node| node.id == id)
        .map(|node| node.order)
        .ok_or_else(|| HomeError::NotFound(format!("landing page not found: {id}")))
}

fn set_order(forest: &mut Forest, id: &str, order: Option<i64>) {
    for node in forest.iter_mut().flatten() {
        if node.id == id {
            node.order = order;
        }
    }
}
