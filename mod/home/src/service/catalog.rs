use std::collections::HashSet;

use crate::model::{Action, LandingNode, User};
use crate::service::{HomeError, HomeService};

/// The feature level of a platform version string: the second dotted
/// component ("2.36.4" has feature level 36). Malformed strings have none.
pub fn major_version(version: &str) -> Option<u32> {
    version.split('.').nth(1)?.trim().parse().ok()
}

/// Whether a comma-separated version range admits the platform version.
/// An empty range is always compatible; entries that do not parse are
/// skipped.
pub fn version_compatible(range: &str, platform_version: &str) -> bool {
    let entries: Vec<&str> = range
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .collect();
    if entries.is_empty() {
        return true;
    }
    let Some(platform) = major_version(platform_version) else {
        return false;
    };
    entries
        .iter()
        .any(|entry| major_version(entry) == Some(platform))
}

/// The actions a landing page presents. A root page with the show-all
/// toggle on lists the whole catalog; otherwise the node's declared action
/// ids resolve in order. Unknown ids, platform-incompatible actions and
/// actions not shared with the viewer are dropped either way.
pub fn page_actions<'a>(
    node: &LandingNode,
    show_all_actions: bool,
    actions: &'a [Action],
    viewer: &User,
) -> Vec<&'a Action> {
    let presentable = |action: &&'a Action| action.compatible && action.is_visible_to(viewer);
    if node.is_root() && show_all_actions {
        return actions.iter().filter(presentable).collect();
    }
    node.actions
        .iter()
        .filter_map(|id| actions.iter().find(|action| action.id() == id))
        .filter(presentable)
        .collect()
}

/// Decide whether opening a landing node should skip the launcher and jump
/// straight into an application.
///
/// Candidates are the node's own actions plus those of its non-secondary
/// subtrees, minus disabled entries and entries the viewer cannot see. The
/// redirect fires only when they all agree on a single launch URL; any
/// ambiguity keeps the launcher visible.
pub fn resolve_primary_redirect<'a>(
    node: &LandingNode,
    actions: &'a [Action],
    viewer: &User,
) -> Option<&'a str> {
    let mut action_ids = Vec::new();
    collect_primary_actions(node, &mut action_ids);

    let urls: HashSet<&str> = action_ids
        .iter()
        .filter_map(|id| actions.iter().find(|action| action.id() == *id))
        .filter(|action| !action.persisted.disabled && action.is_visible_to(viewer))
        .map(|action| action.launch_url())
        .collect();

    match urls.len() {
        1 => urls.into_iter().next(),
        _ => None,
    }
}

fn collect_primary_actions<'a>(node: &'a LandingNode, out: &mut Vec<&'a String>) {
    out.extend(node.actions.iter());
    for child in &node.children {
        if !child.secondary {
            collect_primary_actions(child, out);
        }
    }
}

impl HomeService {
    /// The actions to render on a landing page, honoring the show-all
    /// toggle and the current user's catalog view.
    pub fn actions_for_page(&self, node: &LandingNode) -> Result<Vec<Action>, HomeError> {
        let viewer = self.identity.current_user()?;
        let actions = self.list_actions()?;
        let show_all = self.show_all_actions();
        Ok(page_actions(node, show_all, &actions, &viewer)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Resolve the redirect for a tree as the current user sees it.
    pub fn primary_redirect(&self, node_id: &str) -> Result<Option<String>, HomeError> {
        let viewer = self.identity.current_user()?;
        let tree = self.get_tree_by_id(node_id)?;
        let actions = self.list_actions()?;
        Ok(resolve_primary_redirect(&tree, &actions, &viewer).map(str::to_string))
    }
}
