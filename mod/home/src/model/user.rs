use std::collections::HashSet;

use launchpad_core::NamedRef;
use serde::{Deserialize, Serialize};

/// The universal authority: a role granting it bypasses every authority
/// and sharing check.
pub const AUTHORITY_ALL: &str = "ALL";

/// A role held by a viewer, carrying the capability strings it grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub authorities: Vec<String>,
}

/// The current viewer as reported by the identity collaborator: id, group
/// memberships, and the authorities granted by their roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub user_roles: Vec<UserRole>,
    #[serde(default)]
    pub user_groups: Vec<NamedRef>,
}

impl User {
    /// True if any role grants the universal `ALL` authority.
    pub fn is_super_admin(&self) -> bool {
        self.user_roles
            .iter()
            .any(|role| role.authorities.iter().any(|a| a == AUTHORITY_ALL))
    }

    /// Flattened authority set across all roles.
    pub fn authorities(&self) -> HashSet<&str> {
        self.user_roles
            .iter()
            .flat_map(|role| role.authorities.iter().map(String::as_str))
            .collect()
    }

    pub fn as_ref(&self) -> NamedRef {
        NamedRef::new(&self.id, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_authorities(authorities: &[&[&str]]) -> User {
        User {
            id: "1".into(),
            name: "example".into(),
            username: "example".into(),
            user_roles: authorities
                .iter()
                .enumerate()
                .map(|(i, auths)| UserRole {
                    id: format!("{i}"),
                    name: format!("role {i}"),
                    authorities: auths.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
            user_groups: Vec::new(),
        }
    }

    #[test]
    fn test_super_admin_when_any_role_grants_all() {
        let user = user_with_authorities(&[&["ALL"], &[]]);
        assert!(user.is_super_admin());
    }

    #[test]
    fn test_not_super_admin_without_all() {
        let user = user_with_authorities(&[&[], &["F_DATA_READ"]]);
        assert!(!user.is_super_admin());
    }

    #[test]
    fn test_authorities_are_flattened() {
        let user = user_with_authorities(&[&["F_A", "F_B"], &["F_B", "F_C"]]);
        let authorities = user.authorities();
        assert_eq!(authorities.len(), 3);
        assert!(authorities.contains("F_C"));
    }
}
