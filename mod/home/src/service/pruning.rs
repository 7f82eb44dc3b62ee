use crate::model::{LandingNode, LandingPagePermission, User, PUBLIC_ACCESS_NONE};
use crate::service::{HomeError, HomeService};

/// Excise every node the viewer may not see, together with its whole
/// subtree. A node without a permission record is public.
pub fn filter_for_viewer(
    nodes: Vec<LandingNode>,
    permissions: &[LandingPagePermission],
    viewer: &User,
) -> Vec<LandingNode> {
    nodes
        .into_iter()
        .filter_map(|mut node| {
            if !node_visible(&node, permissions, viewer) {
                return None;
            }
            node.children = filter_for_viewer(node.children, permissions, viewer);
            Some(node)
        })
        .collect()
}

fn node_visible(node: &LandingNode, permissions: &[LandingPagePermission], viewer: &User) -> bool {
    let Some(permission) = permissions.iter().find(|p| p.id == node.id) else {
        return true;
    };
    let has_user_access = permission.users.iter().any(|user| user.id == viewer.id);
    let has_group_access = permission
        .user_groups
        .iter()
        .any(|group| viewer.user_groups.iter().any(|mine| mine.id == group.id));
    let has_public_access = permission.public_access != PUBLIC_ACCESS_NONE;

    has_user_access || has_group_access || has_public_access
}

impl HomeService {
    /// The landing trees as the current user sees them, with forbidden
    /// subtrees pruned away.
    pub fn list_visible_trees(&self) -> Result<Vec<LandingNode>, HomeError> {
        let viewer = self.identity.current_user()?;
        let trees = self.list_trees()?;
        let permissions = self.landing_page_permissions()?;
        Ok(filter_for_viewer(trees, &permissions, &viewer))
    }
}
