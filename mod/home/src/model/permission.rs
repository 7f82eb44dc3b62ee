use launchpad_core::NamedRef;
use serde::{Deserialize, Serialize};

use crate::model::user::User;

/// Sharing string meaning "no public access".
pub const PUBLIC_ACCESS_NONE: &str = "--------";

/// Sharing string granting public metadata read.
pub const PUBLIC_ACCESS_READ: &str = "r-------";

/// One entry of a sharing table: a user or user group plus its own
/// 8-char access string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingSetting {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub access: String,
}

/// Who may open the settings surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub users: Vec<NamedRef>,
    #[serde(default)]
    pub user_groups: Vec<NamedRef>,
}

/// Per-landing-node sharing record, keyed by the node's id. A node with no
/// record is implicitly public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPagePermission {
    pub id: String,
    #[serde(default = "public_access_read")]
    pub public_access: String,
    #[serde(default)]
    pub users: Vec<NamedRef>,
    #[serde(default)]
    pub user_groups: Vec<NamedRef>,
}

fn public_access_read() -> String {
    PUBLIC_ACCESS_READ.to_string()
}

impl LandingPagePermission {
    /// Default record: public read, no explicit user or group grants.
    pub fn public_read(id: &str) -> Self {
        Self {
            id: id.to_string(),
            public_access: public_access_read(),
            users: Vec::new(),
            user_groups: Vec::new(),
        }
    }
}

/// Partial update of a landing-page permission record; `None` fields keep
/// the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPagePermissionUpdate {
    #[serde(default)]
    pub users: Option<Vec<NamedRef>>,
    #[serde(default)]
    pub user_groups: Option<Vec<NamedRef>>,
    #[serde(default)]
    pub public_access: Option<String>,
}

/// The listing-visibility rule shared by landing nodes and actions: the
/// viewer is explicitly listed, one of their groups is listed, or the
/// public access string is not the all-zero sentinel.
pub fn sharing_visible(
    public_access: &str,
    user_accesses: &[SharingSetting],
    user_group_accesses: &[SharingSetting],
    viewer: &User,
) -> bool {
    let has_user_access = user_accesses.iter().any(|access| access.id == viewer.id);
    let has_group_access = user_group_accesses
        .iter()
        .any(|access| viewer.user_groups.iter().any(|group| group.id == access.id));
    let has_public_access = public_access != PUBLIC_ACCESS_NONE;

    has_user_access || has_group_access || has_public_access
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::User;

    fn viewer() -> User {
        User {
            id: "u1".into(),
            name: "Alice".into(),
            username: "alice".into(),
            user_roles: Vec::new(),
            user_groups: vec![NamedRef::new("g1", "Group 1")],
        }
    }

    fn setting(id: &str) -> SharingSetting {
        SharingSetting {
            id: id.into(),
            name: String::new(),
            access: "r-------".into(),
        }
    }

    #[test]
    fn test_public_access_grants_visibility() {
        assert!(sharing_visible("r-------", &[], &[], &viewer()));
        assert!(!sharing_visible(PUBLIC_ACCESS_NONE, &[], &[], &viewer()));
    }

    #[test]
    fn test_explicit_user_access() {
        assert!(sharing_visible(PUBLIC_ACCESS_NONE, &[setting("u1")], &[], &viewer()));
        assert!(!sharing_visible(PUBLIC_ACCESS_NONE, &[setting("u2")], &[], &viewer()));
    }

    #[test]
    fn test_group_access() {
        assert!(sharing_visible(PUBLIC_ACCESS_NONE, &[], &[setting("g1")], &viewer()));
        assert!(!sharing_visible(PUBLIC_ACCESS_NONE, &[], &[setting("g2")], &viewer()));
    }

    #[test]
    fn test_permission_decode_defaults() {
        let permission: LandingPagePermission =
            serde_json::from_value(serde_json::json!({ "id": "n1" })).unwrap();
        assert_eq!(permission.public_access, PUBLIC_ACCESS_READ);
        assert!(permission.users.is_empty());
    }
}
