use serde::{Deserialize, Serialize};

use crate::model::text::TranslatableText;

/// Sentinel `parent` value marking a tree's root node.
pub const ROOT_PARENT: &str = "none";

/// Sort key for siblings persisted without an explicit order: they rank
/// after every explicitly ordered sibling.
pub const UNORDERED_SORT_KEY: i64 = 1000;

/// Position of a landing page in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingNodeType {
    #[serde(rename = "root")]
    Root,
    #[serde(rename = "section")]
    Section,
    #[serde(rename = "sub-section")]
    SubSection,
    #[serde(rename = "category")]
    Category,
}

/// How a root page lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageRendering {
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "multiple")]
    Multiple,
}

/// The persisted unit of the landing hierarchy: one node, linked to its
/// parent by id. A forest is `Vec<Vec<PersistedLandingNode>>` — one inner
/// group per independent tree, ids unique across the whole forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLandingNode {
    pub id: String,
    pub parent: String,
    #[serde(rename = "type")]
    pub node_type: LandingNodeType,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icon_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_rendering: Option<PageRendering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub name: TranslatableText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TranslatableText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TranslatableText>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub secondary: bool,
}

impl PersistedLandingNode {
    /// Sibling rank used when ordering children.
    pub fn sort_key(&self) -> i64 {
        self.order.unwrap_or(UNORDERED_SORT_KEY)
    }
}

/// In-memory tree form of a landing node. `children` is derived from the
/// flat persisted representation and never persisted itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingNode {
    pub id: String,
    pub parent: String,
    #[serde(rename = "type")]
    pub node_type: LandingNodeType,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icon_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_rendering: Option<PageRendering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    pub name: TranslatableText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TranslatableText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TranslatableText>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub secondary: bool,
    #[serde(default)]
    pub children: Vec<LandingNode>,
}

impl LandingNode {
    /// Wrap a persisted node with its assembled children.
    pub fn from_persisted(node: PersistedLandingNode, children: Vec<LandingNode>) -> Self {
        Self {
            id: node.id,
            parent: node.parent,
            node_type: node.node_type,
            icon: node.icon,
            icon_location: node.icon_location,
            page_rendering: node.page_rendering,
            order: node.order,
            name: node.name,
            title: node.title,
            content: node.content,
            actions: node.actions,
            background_color: node.background_color,
            secondary: node.secondary,
            children,
        }
    }

    /// Strip `children`, reparenting the node under `parent`.
    pub fn to_persisted(&self, parent: &str) -> PersistedLandingNode {
        PersistedLandingNode {
            id: self.id.clone(),
            parent: parent.to_string(),
            node_type: self.node_type,
            icon: self.icon.clone(),
            icon_location: self.icon_location.clone(),
            page_rendering: self.page_rendering,
            order: self.order,
            name: self.name.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            actions: self.actions.clone(),
            background_color: self.background_color.clone(),
            secondary: self.secondary,
        }
    }

    pub fn is_root(&self) -> bool {
        self.node_type == LandingNodeType::Root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_serde_names() {
        assert_eq!(
            serde_json::to_string(&LandingNodeType::SubSection).unwrap(),
            "\"sub-section\""
        );
        let parsed: LandingNodeType = serde_json::from_str("\"category\"").unwrap();
        assert_eq!(parsed, LandingNodeType::Category);
    }

    #[test]
    fn test_unknown_node_type_is_rejected() {
        let result: Result<LandingNodeType, _> = serde_json::from_str("\"widget\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_persisted_decode_fills_defaults() {
        let node: PersistedLandingNode = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "parent": "none",
            "type": "root",
            "name": { "key": "root-name", "referenceValue": "Main" }
        }))
        .unwrap();

        assert_eq!(node.icon, "");
        assert_eq!(node.order, None);
        assert_eq!(node.sort_key(), UNORDERED_SORT_KEY);
        assert!(node.actions.is_empty());
        assert!(!node.secondary);
    }

    #[test]
    fn test_to_persisted_reparents() {
        let node = LandingNode {
            id: "s1".into(),
            parent: "old".into(),
            node_type: LandingNodeType::Section,
            icon: String::new(),
            icon_location: String::new(),
            page_rendering: None,
            order: Some(2),
            name: TranslatableText::new("s1-name", "Section"),
            title: None,
            content: None,
            actions: vec!["a1".into()],
            background_color: String::new(),
            secondary: false,
            children: Vec::new(),
        };

        let persisted = node.to_persisted("r1");
        assert_eq!(persisted.parent, "r1");
        assert_eq!(persisted.order, Some(2));
        assert_eq!(persisted.actions, vec!["a1".to_string()]);
    }
}
