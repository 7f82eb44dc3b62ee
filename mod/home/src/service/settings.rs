use tracing::warn;

use launchpad_core::NamedRef;

use crate::model::{
    LandingPagePermission, LandingPagePermissionUpdate, Permission, PersistedSettings,
};
use crate::service::{namespaces, HomeError, HomeService};

impl HomeService {
    pub(crate) fn load_settings(&self) -> PersistedSettings {
        match self
            .store
            .get_object::<PersistedSettings>(namespaces::CONFIG)
        {
            Ok(Some(settings)) => settings,
            Ok(None) => PersistedSettings::default(),
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                PersistedSettings::default()
            }
        }
    }

    pub(crate) fn save_settings(&self, settings: &PersistedSettings) -> Result<(), HomeError> {
        Ok(self.store.save_object(namespaces::CONFIG, settings)?)
    }

    /// App to open from the launcher header; empty means none configured.
    pub fn default_application(&self) -> String {
        self.load_settings().default_application.unwrap_or_default()
    }

    pub fn update_default_application(&self, application: &str) -> Result<(), HomeError> {
        let mut settings = self.load_settings();
        settings.default_application = Some(application.to_string());
        self.save_settings(&settings)
    }

    /// Whether the launcher lists the full catalog alongside the landing
    /// trees. On unless explicitly turned off.
    pub fn show_all_actions(&self) -> bool {
        self.load_settings().show_all_actions.unwrap_or(true)
    }

    pub fn set_show_all_actions(&self, show: bool) -> Result<(), HomeError> {
        let mut settings = self.load_settings();
        settings.show_all_actions = Some(show);
        self.save_settings(&settings)
    }

    pub fn poeditor_token(&self) -> Option<String> {
        self.load_settings().poeditor_token
    }

    pub fn update_poeditor_token(&self, token: &str) -> Result<(), HomeError> {
        let mut settings = self.load_settings();
        settings.poeditor_token = Some(token.to_string());
        self.save_settings(&settings)
    }

    pub fn google_analytics_code(&self) -> Option<String> {
        self.load_settings().google_analytics_code
    }

    pub fn update_google_analytics_code(&self, code: &str) -> Result<(), HomeError> {
        let mut settings = self.load_settings();
        settings.google_analytics_code = Some(code.to_string());
        self.save_settings(&settings)
    }

    pub fn settings_permissions(&self) -> Permission {
        self.load_settings().settings_permissions.unwrap_or_default()
    }

    /// Partial update; omitted lists keep their stored value.
    pub fn update_settings_permissions(
        &self,
        users: Option<Vec<NamedRef>>,
        user_groups: Option<Vec<NamedRef>>,
    ) -> Result<(), HomeError> {
        let mut settings = self.load_settings();
        let current = settings.settings_permissions.take().unwrap_or_default();
        settings.settings_permissions = Some(Permission {
            users: users.unwrap_or(current.users),
            user_groups: user_groups.unwrap_or(current.user_groups),
        });
        self.save_settings(&settings)
    }

    /// Per-tree sharing records. When none were ever saved, the first
    /// stored node gets an implicit public-read record so a fresh install
    /// is readable by everyone. No stored nodes means no records at all.
    pub fn landing_page_permissions(&self) -> Result<Vec<LandingPagePermission>, HomeError> {
        let stored = self.load_settings().landing_page_permissions.unwrap_or_default();
        if !stored.is_empty() {
            return Ok(stored);
        }

        let forest = self.load_forest();
        match forest.iter().flatten().next() {
            Some(node) => Ok(vec![LandingPagePermission::public_read(&node.id)]),
            None => Ok(Vec::new()),
        }
    }

    /// Upsert the sharing record of one landing node. Omitted fields keep
    /// their stored value; a brand-new record starts from public read.
    pub fn update_landing_page_permissions(
        &self,
        id: &str,
        update: LandingPagePermissionUpdate,
    ) -> Result<(), HomeError> {
        let mut settings = self.load_settings();
        let mut permissions = settings.landing_page_permissions.take().unwrap_or_default();

        let current = permissions
            .iter()
            .find(|permission| permission.id == id)
            .cloned()
            .unwrap_or_else(|| LandingPagePermission::public_read(id));
        let merged = LandingPagePermission {
            id: id.to_string(),
            users: update.users.unwrap_or(current.users),
            user_groups: update.user_groups.unwrap_or(current.user_groups),
            public_access: update.public_access.unwrap_or(current.public_access),
        };

        match permissions.iter_mut().find(|permission| permission.id == id) {
            Some(stored) => *stored = merged,
            None => permissions.push(merged),
        }

        settings.landing_page_permissions = Some(permissions);
        self.save_settings(&settings)
    }

    /// Whether the current user may open the settings surface: super admin,
    /// or their id or one of their group ids appears in the settings
    /// permission lists.
    pub fn check_settings_access(&self) -> Result<bool, HomeError> {
        let viewer = self.identity.current_user()?;
        if viewer.is_super_admin() {
            return Ok(true);
        }

        let permissions = self.settings_permissions();
        let mut mine = vec![viewer.id.as_str()];
        mine.extend(viewer.user_groups.iter().map(|group| group.id.as_str()));

        let listed = permissions
            .users
            .iter()
            .chain(permissions.user_groups.iter())
            .any(|entry| mine.contains(&entry.id.as_str()));
        Ok(listed)
    }
}
