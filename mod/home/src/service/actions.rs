use std::collections::HashSet;

use launchpad_core::now_rfc3339;
use tracing::warn;

use crate::model::{AccessMode, Action, PersistedAction, User, ACTION_SCHEMA_VERSION};
use crate::service::catalog::version_compatible;
use crate::service::{namespaces, HomeError, HomeService};

impl HomeService {
    /// Load the whole action catalog. Reads fail open like the landing
    /// pages document.
    pub(crate) fn load_actions(&self) -> Vec<PersistedAction> {
        match self
            .store
            .get_object::<Vec<PersistedAction>>(namespaces::ACTIONS)
        {
            Ok(Some(actions)) => actions,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to load actions, treating as empty");
                Vec::new()
            }
        }
    }

    pub(crate) fn save_actions(&self, actions: &[PersistedAction]) -> Result<(), HomeError> {
        Ok(self.store.save_object(namespaces::ACTIONS, &actions)?)
    }

    /// The action catalog as the current user sees it: duplicate ids
    /// dropped, authority and sharing filters applied, derived flags
    /// computed. Records on an unknown schema revision are skipped with a
    /// warning rather than hiding the whole catalog.
    pub fn list_actions(&self) -> Result<Vec<Action>, HomeError> {
        let viewer = self.identity.current_user()?;
        let platform_version = self.platform.version()?;
        let authorities = viewer.authorities();
        let is_super = viewer.is_super_admin();

        let mut seen = HashSet::new();
        let mut listed = Vec::new();
        for persisted in self.load_actions() {
            if !seen.insert(persisted.id.clone()) {
                continue;
            }
            let authorized = is_super
                || persisted
                    .dhis_authorities
                    .iter()
                    .all(|authority| authorities.contains(authority.as_str()));
            if !authorized || !persisted.allows(&viewer, AccessMode::Read) {
                continue;
            }
            if persisted.version != ACTION_SCHEMA_VERSION {
                warn!(id = %persisted.id, version = persisted.version, "skipping action on unsupported schema revision");
                continue;
            }
            listed.push(self.build_domain_action(persisted, &viewer, &platform_version));
        }
        Ok(listed)
    }

    /// One action by id, with derived flags, regardless of sharing filters.
    pub fn get_action(&self, id: &str) -> Result<Action, HomeError> {
        let viewer = self.identity.current_user()?;
        let platform_version = self.platform.version()?;
        let persisted = self
            .load_actions()
            .into_iter()
            .find(|action| action.id == id)
            .ok_or_else(|| HomeError::NotFound(format!("action not found: {id}")))?;
        if persisted.version != ACTION_SCHEMA_VERSION {
            return Err(HomeError::SchemaVersion(persisted.version));
        }
        Ok(self.build_domain_action(persisted, &viewer, &platform_version))
    }

    fn build_domain_action(
        &self,
        persisted: PersistedAction,
        viewer: &User,
        platform_version: &str,
    ) -> Action {
        let installed = self.platform.is_app_installed(&persisted.dhis_launch_url);
        let compatible = version_compatible(&persisted.dhis_version_range, platform_version);
        let editable = persisted.allows(viewer, AccessMode::Write);
        Action::from_persisted(persisted, installed, compatible, editable)
    }

    /// Create or replace an action from editor input.
    pub fn update_action(&self, action: Action) -> Result<(), HomeError> {
        let persisted = action.to_persisted();
        if persisted.id.trim().is_empty() {
            return Err(HomeError::Validation("action id must not be empty".into()));
        }
        if persisted.name.reference_value.trim().is_empty() {
            return Err(HomeError::Validation("action name must not be empty".into()));
        }
        if persisted.dhis_launch_url.trim().is_empty() {
            return Err(HomeError::Validation(
                "action launch URL must not be empty".into(),
            ));
        }
        self.save_persisted_action(persisted, false)
    }

    /// Upsert one record into the catalog, stamping the audit fields.
    ///
    /// `recreate` marks a fresh install (import): ownership and creation
    /// move to the current user and the dirty flag clears. A plain save
    /// keeps the original owner and marks the record dirty.
    pub(crate) fn save_persisted_action(
        &self,
        mut action: PersistedAction,
        recreate: bool,
    ) -> Result<(), HomeError> {
        let editor = self.identity.current_user()?.as_ref();
        let now = now_rfc3339();

        action.last_updated_by = editor.clone();
        action.last_updated = now.clone();
        if recreate {
            action.user = editor;
            action.created = now;
        }
        action.dirty = !recreate;

        let mut actions = self.load_actions();
        match actions.iter_mut().find(|stored| stored.id == action.id) {
            Some(stored) => *stored = action,
            None => actions.push(action),
        }
        self.save_actions(&actions)
    }

    pub fn delete_actions(&self, ids: &[String]) -> Result<(), HomeError> {
        let actions: Vec<PersistedAction> = self
            .load_actions()
            .into_iter()
            .filter(|action| !ids.contains(&action.id))
            .collect();
        self.save_actions(&actions)
    }

    /// Exchange the catalog positions of two actions. Listing order is
    /// positional, so this reorders the launcher grid.
    pub fn swap_action_order(&self, id_a: &str, id_b: &str) -> Result<(), HomeError> {
        let mut actions = self.load_actions();
        let pos_a = position_of(&actions, id_a)?;
        let pos_b = position_of(&actions, id_b)?;
        actions.swap(pos_a, pos_b);
        self.save_actions(&actions)
    }

    /// Install actions from a transfer file. Imported records become owned
    /// by the importer and start clean.
    pub fn import_actions(&self, items: Vec<PersistedAction>) -> Result<(), HomeError> {
        for action in items {
            self.save_persisted_action(action, true)?;
        }
        Ok(())
    }

    pub fn export_actions(&self, ids: &[String]) -> Result<Vec<PersistedAction>, HomeError> {
        let actions = self.load_actions();
        ids.iter()
            .map(|id| {
                actions
                    .iter()
                    .find(|action| &action.id == id)
                    .cloned()
                    .ok_or_else(|| HomeError::NotFound(format!("action not found: {id}")))
            })
            .collect()
    }
}

fn position_of(actions: &[PersistedAction], id: &str) -> Result<usize, HomeError> {
    actions
        .iter()
        .position(|action| action.id == id)
        .ok_or_else(|| HomeError::NotFound(format!("action not found: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::action::tests::sample_action;
    use crate::model::PUBLIC_ACCESS_READ;
    use crate::service::testing::{test_service, test_user};

    fn readable(id: &str) -> PersistedAction {
        let mut action = sample_action(id);
        action.public_access = PUBLIC_ACCESS_READ.to_string();
        action
    }

    #[test]
    fn test_list_filters_unreadable_and_duplicate_actions() {
        let svc = test_service();
        svc.save_actions(&[
            readable("a1"),
            sample_action("hidden"),
            readable("a1"),
            readable("a2"),
        ])
        .unwrap();

        let listed = svc.list_actions().unwrap();
        let ids: Vec<&str> = listed.iter().map(Action::id).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn test_list_requires_all_authorities() {
        let svc = test_service();
        let mut gated = readable("gated");
        gated.dhis_authorities = vec!["F_VIEW".into(), "F_ADMIN".into()];
        let mut open = readable("open");
        open.dhis_authorities = vec!["F_VIEW".into()];
        svc.save_actions(&[gated, open]).unwrap();

        // test_user holds F_VIEW only.
        let ids: Vec<String> = svc
            .list_actions()
            .unwrap()
            .iter()
            .map(|a| a.id().to_string())
            .collect();
        assert_eq!(ids, vec!["open"]);
    }

    #[test]
    fn test_super_admin_bypasses_authority_filter() {
        let mut admin = test_user();
        admin.user_roles[0].authorities = vec!["ALL".into()];
        let svc = crate::service::testing::test_service_for(admin);

        let mut gated = readable("gated");
        gated.dhis_authorities = vec!["F_ADMIN".into()];
        svc.save_actions(&[gated]).unwrap();

        assert_eq!(svc.list_actions().unwrap().len(), 1);
    }

    #[test]
    fn test_list_skips_unknown_schema_revision() {
        let svc = test_service();
        let mut stale = readable("stale");
        stale.version = 2;
        svc.save_actions(&[stale, readable("ok")]).unwrap();

        let listed = svc.list_actions().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), "ok");

        assert!(matches!(
            svc.get_action("stale"),
            Err(HomeError::SchemaVersion(2))
        ));
    }

    #[test]
    fn test_derived_flags() {
        let svc = test_service();
        let mut action = readable("a1");
        action.dhis_version_range = "2.37".into();
        svc.save_actions(&[action]).unwrap();

        // FixedPlatform reports 2.37.1 and installs every relative URL.
        let got = svc.get_action("a1").unwrap();
        assert!(got.installed);
        assert!(got.compatible);
        assert!(!got.editable);
    }

    #[test]
    fn test_update_validates_and_stamps() {
        let svc = test_service();
        let action = Action::from_persisted(readable("a1"), false, false, false);
        svc.update_action(action.clone()).unwrap();

        let stored = svc.load_actions();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].dirty);
        assert_eq!(stored[0].last_updated_by.id, "u1");
        // Ownership is untouched by a plain save.
        assert_eq!(stored[0].user.id, "owner");

        let mut invalid = action;
        invalid.persisted.dhis_launch_url = String::new();
        assert!(matches!(
            svc.update_action(invalid),
            Err(HomeError::Validation(_))
        ));
    }

    #[test]
    fn test_import_recreates_ownership() {
        let svc = test_service();
        svc.import_actions(vec![readable("a1")]).unwrap();

        let stored = svc.load_actions();
        assert_eq!(stored[0].user.id, "u1");
        assert!(!stored[0].dirty);
    }

    #[test]
    fn test_swap_action_order_is_positional() {
        let svc = test_service();
        svc.save_actions(&[readable("a1"), readable("a2"), readable("a3")])
            .unwrap();

        svc.swap_action_order("a1", "a3").unwrap();
        let ids: Vec<String> = svc.load_actions().iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["a3", "a2", "a1"]);

        assert!(matches!(
            svc.swap_action_order("a1", "ghost"),
            Err(HomeError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_and_export() {
        let svc = test_service();
        svc.save_actions(&[readable("a1"), readable("a2")]).unwrap();

        let exported = svc.export_actions(&["a2".to_string()]).unwrap();
        assert_eq!(exported[0].id, "a2");
        assert!(matches!(
            svc.export_actions(&["ghost".to_string()]),
            Err(HomeError::NotFound(_))
        ));

        svc.delete_actions(&["a1".to_string()]).unwrap();
        let ids: Vec<String> = svc.load_actions().iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec!["a2"]);
    }
}
