use launchpad_core::new_id;
use tracing::warn;

use crate::model::{
    LandingNode, LandingNodeType, PageRendering, PersistedLandingNode, TranslatableText,
    ROOT_PARENT,
};
use crate::service::forest::{self, Forest};
use crate::service::{namespaces, tree, HomeError, HomeService};

impl HomeService {
    /// Load the whole landing-pages document. Reads fail open: a missing or
    /// unreadable document is logged and treated as empty so the launcher
    /// can still render.
    pub(crate) fn load_forest(&self) -> Forest {
        match self.store.get_object::<Forest>(namespaces::LANDING_PAGES) {
            Ok(Some(forest)) => forest,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load landing pages, treating as empty");
                Vec::new()
            }
        }
    }

    pub(crate) fn save_forest(&self, forest: &Forest) -> Result<(), HomeError> {
        Ok(self
            .store
            .save_object(namespaces::LANDING_PAGES, forest)?)
    }

    /// All landing trees, assembled. An empty store is seeded with a default
    /// single-root tree so a fresh install always has a home page.
    pub fn list_trees(&self) -> Result<Vec<LandingNode>, HomeError> {
        let forest = self.load_forest();

        let has_root = forest
            .iter()
            .flatten()
            .any(|node| node.node_type == LandingNodeType::Root);
        if !has_root {
            let root = default_root();
            self.save_forest(&vec![vec![root.clone()]])?;
            return Ok(vec![LandingNode::from_persisted(root, Vec::new())]);
        }

        forest
            .iter()
            .filter_map(|group| {
                group
                    .iter()
                    .find(|node| node.node_type == LandingNodeType::Root)
                    .map(|root| tree::assemble(root, group))
            })
            .collect()
    }

    /// The tree whose root carries the given id.
    pub fn get_tree_by_id(&self, id: &str) -> Result<LandingNode, HomeError> {
        let forest = self.load_forest();
        let group = forest
            .iter()
            .find(|group| {
                group
                    .iter()
                    .any(|node| node.id == id && node.node_type == LandingNodeType::Root)
            })
            .ok_or_else(|| HomeError::NotFound(format!("landing page not found: {id}")))?;
        let root = group
            .iter()
            .find(|node| node.id == id)
            .ok_or_else(|| HomeError::Internal("root vanished from its group".into()))?;
        tree::assemble(root, group)
    }

    /// Add a tree (or subtree) to the forest. Same reconciliation as
    /// [`update_tree`]; the stored state decides which branch applies.
    ///
    /// [`update_tree`]: HomeService::update_tree
    pub fn create_tree(&self, node: &LandingNode) -> Result<(), HomeError> {
        self.save_tree(node)
    }

    /// Save an edited tree back into the forest.
    pub fn update_tree(&self, node: &LandingNode) -> Result<(), HomeError> {
        self.save_tree(node)
    }

    /// Save a tree (or subtree) into the forest.
    ///
    /// If any stored group already knows any id of the flattened edit
    /// unit, the unit is union-merged into that group. A new root starts a
    /// new group. A new non-root must name a stored parent to attach
    /// under.
    pub fn save_tree(&self, node: &LandingNode) -> Result<(), HomeError> {
        let incoming = tree::disassemble(node, &node.parent);
        let mut forest = self.load_forest();

        match forest
            .iter()
            .position(|group| forest::contains_any(group, &incoming))
        {
            Some(index) => forest::merge_into_group(&mut forest[index], incoming),
            None if node.is_root() => forest::append_group(&mut forest, incoming),
            None => forest::attach_to_parent(&mut forest, &node.parent, incoming)?,
        }

        self.save_forest(&forest)
    }

    /// Delete nodes and every descendant below them. Deleting a root drops
    /// its whole tree.
    pub fn delete_trees(&self, ids: &[String]) -> Result<(), HomeError> {
        let forest = forest::delete_nodes(self.load_forest(), ids);
        self.save_forest(&forest)
    }

    /// Exchange the order values of two sibling nodes.
    pub fn swap_node_order(&self, id_a: &str, id_b: &str) -> Result<(), HomeError> {
        let mut forest = self.load_forest();
        forest::swap_order(&mut forest, id_a, id_b)?;
        self.save_forest(&forest)
    }

    /// The stored groups containing any of the given node ids, ready to be
    /// serialized out as a transfer file.
    pub fn export_trees(&self, ids: &[String]) -> Result<Forest, HomeError> {
        let forest = self.load_forest();
        let exported: Forest = forest
            .into_iter()
            .filter(|group| ids.iter().any(|id| forest::is_member(group, id)))
            .collect();
        if exported.is_empty() {
            return Err(HomeError::NotFound(format!(
                "no landing pages match: {}",
                ids.join(", ")
            )));
        }
        Ok(exported)
    }

    /// Import transfer-file groups. A group sharing any id with a stored
    /// group union-merges into it; otherwise the group is added as a new
    /// independent tree.
    pub fn import_trees(&self, groups: Forest) -> Result<(), HomeError> {
        let mut forest = self.load_forest();

        for incoming in groups {
            let root = incoming
                .iter()
                .find(|node| node.node_type == LandingNodeType::Root)
                .ok_or_else(|| {
                    HomeError::Validation("imported landing page group has no root".into())
                })?;
            // Assembly doubles as a cycle and shape check before anything
            // is written.
            tree::assemble(root, &incoming)?;

            match forest
                .iter()
                .position(|group| forest::contains_any(group, &incoming))
            {
                Some(index) => forest::merge_into_group(&mut forest[index], incoming),
                None => forest::append_group(&mut forest, incoming),
            }
        }

        self.save_forest(&forest)
    }
}

fn default_root() -> PersistedLandingNode {
    PersistedLandingNode {
        id: new_id(),
        parent: ROOT_PARENT.to_string(),
        node_type: LandingNodeType::Root,
        icon: "img/logo.png".to_string(),
        icon_location: "top".to_string(),
        page_rendering: Some(PageRendering::Multiple),
        order: None,
        name: TranslatableText::new("root-name", "Main landing page"),
        title: Some(TranslatableText::new("root-title", "Welcome to Home Page App")),
        content: None,
        actions: Vec::new(),
        background_color: "#276696".to_string(),
        secondary: false,
    }
}
