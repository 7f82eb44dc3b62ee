use std::collections::HashSet;

use crate::model::{LandingNode, PersistedLandingNode};
use crate::service::HomeError;

/// Rebuild a nested tree from the flat node list of a group.
///
/// Children are the items whose `parent` is the current node, sorted by
/// their persisted order (missing orders sort last) and then densely
/// renumbered from zero. The renumbering is a view-side derivation; it only
/// reaches the store if the caller saves the tree back.
///
/// A node whose ancestor chain revisits its own id fails with
/// [`HomeError::CyclicTree`] instead of recursing forever.
pub fn assemble(
    root: &PersistedLandingNode,
    items: &[PersistedLandingNode],
) -> Result<LandingNode, HomeError> {
    let mut visited = HashSet::new();
    assemble_inner(root, items, &mut visited)
}

fn assemble_inner(
    node: &PersistedLandingNode,
    items: &[PersistedLandingNode],
    visited: &mut HashSet<String>,
) -> Result<LandingNode, HomeError> {
    if !visited.insert(node.id.clone()) {
        return Err(HomeError::CyclicTree(node.id.clone()));
    }

    let mut matches: Vec<&PersistedLandingNode> =
        items.iter().filter(|item| item.parent == node.id).collect();
    matches.sort_by_key(|item| item.sort_key());

    let children = matches
        .into_iter()
        .enumerate()
        .map(|(index, child)| {
            let mut child = assemble_inner(child, items, visited)?;
            child.order = Some(index as i64);
            Ok(child)
        })
        .collect::<Result<Vec<_>, HomeError>>()?;

    Ok(LandingNode::from_persisted(node.clone(), children))
}

/// Flatten a tree into persisted nodes in pre-order, reparenting the head
/// node under `parent`. Inverse of [`assemble`] up to order renumbering.
pub fn disassemble(node: &LandingNode, parent: &str) -> Vec<PersistedLandingNode> {
    let mut flat = vec![node.to_persisted(parent)];
    for child in &node.children {
        flat.extend(disassemble(child, &node.id));
    }
    flat
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{LandingNodeType, TranslatableText, ROOT_PARENT};

    pub(crate) fn persisted(
        id: &str,
        parent: &str,
        node_type: LandingNodeType,
        order: Option<i64>,
    ) -> PersistedLandingNode {
        PersistedLandingNode {
            id: id.to_string(),
            parent: parent.to_string(),
            node_type,
            icon: String::new(),
            icon_location: String::new(),
            page_rendering: None,
            order,
            name: TranslatableText::new(&format!("{id}-name"), id),
            title: None,
            content: None,
            actions: Vec::new(),
            background_color: String::new(),
            secondary: false,
        }
    }

    #[test]
    fn test_assemble_sorts_and_renumbers_children() {
        let root = persisted("r", ROOT_PARENT, LandingNodeType::Root, None);
        let items = vec![
            root.clone(),
            persisted("s-late", "r", LandingNodeType::Section, Some(5)),
            persisted("s-unordered", "r", LandingNodeType::Section, None),
            persisted("s-first", "r", LandingNodeType::Section, Some(0)),
        ];

        let tree = assemble(&root, &items).unwrap();
        let ids: Vec<&str> = tree.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["s-first", "s-late", "s-unordered"]);
        let orders: Vec<Option<i64>> = tree.children.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_assemble_recurses() {
        let root = persisted("r", ROOT_PARENT, LandingNodeType::Root, None);
        let items = vec![
            root.clone(),
            persisted("s1", "r", LandingNodeType::Section, Some(0)),
            persisted("sub1", "s1", LandingNodeType::SubSection, Some(0)),
            persisted("cat1", "sub1", LandingNodeType::Category, Some(0)),
        ];

        let tree = assemble(&root, &items).unwrap();
        assert_eq!(tree.children[0].children[0].children[0].id, "cat1");
    }

    #[test]
    fn test_assemble_detects_cycle() {
        // s1 and s2 are each other's parent.
        let root = persisted("s1", "s2", LandingNodeType::Section, None);
        let items = vec![
            root.clone(),
            persisted("s2", "s1", LandingNodeType::Section, None),
        ];

        let result = assemble(&root, &items);
        assert!(matches!(result, Err(HomeError::CyclicTree(_))));
    }

    #[test]
    fn test_disassemble_is_preorder() {
        let root = persisted("r", ROOT_PARENT, LandingNodeType::Root, None);
        let items = vec![
            root.clone(),
            persisted("s1", "r", LandingNodeType::Section, Some(0)),
            persisted("s2", "r", LandingNodeType::Section, Some(1)),
            persisted("sub1", "s1", LandingNodeType::SubSection, Some(0)),
        ];

        let tree = assemble(&root, &items).unwrap();
        let flat = disassemble(&tree, ROOT_PARENT);
        let ids: Vec<&str> = flat.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["r", "s1", "sub1", "s2"]);
    }

    #[test]
    fn test_roundtrip_preserves_ids_and_parents() {
        let root = persisted("r", ROOT_PARENT, LandingNodeType::Root, None);
        let items = vec![
            root.clone(),
            persisted("s1", "r", LandingNodeType::Section, Some(1)),
            persisted("s2", "r", LandingNodeType::Section, Some(7)),
            persisted("sub1", "s2", LandingNodeType::SubSection, None),
        ];

        let flat = disassemble(&assemble(&root, &items).unwrap(), ROOT_PARENT);
        assert_eq!(flat.len(), items.len());
        for item in &items {
            let found = flat.iter().find(|n| n.id == item.id).unwrap();
            assert_eq!(found.parent, item.parent);
        }
        // Sibling relative order survives even though orders were renumbered.
        let s1 = flat.iter().position(|n| n.id == "s1").unwrap();
        let s2 = flat.iter().position(|n| n.id == "s2").unwrap();
        assert!(s1 < s2);
    }
}
