use launchpad_core::NamedRef;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::permission::{sharing_visible, SharingSetting, PUBLIC_ACCESS_NONE};
use crate::model::text::TranslatableText;
use crate::model::user::User;

/// The single persisted schema revision this engine understands. Any other
/// value is fatal for that record.
pub const ACTION_SCHEMA_VERSION: i64 = 1;

/// Default tile colors for newly created actions.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#276696";
pub const DEFAULT_FONT_COLOR: &str = "#ffffff";

/// What launching an action does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// Launches an external app by URL.
    #[default]
    App,
    /// Launches another landing node instead of an external URL.
    Page,
}

// Legacy documents carry action types this revision no longer knows;
// they decode as App rather than failing the whole catalog.
impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "page" => ActionType::Page,
            _ => ActionType::App,
        })
    }
}

/// Requested sharing capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

/// The persisted form of a launchable action. `id` is a stable, user-chosen
/// code; the whole catalog is one flat JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAction {
    #[serde(rename = "_version")]
    pub version: i64,
    pub id: String,
    pub name: TranslatableText,
    #[serde(default = "default_description")]
    pub description: TranslatableText,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub icon_location: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub font_color: String,
    #[serde(default)]
    pub text_alignment: String,
    #[serde(rename = "type", default)]
    pub action_type: ActionType,
    #[serde(default)]
    pub disabled: bool,
    /// Comma-separated list of compatible platform versions; empty = always
    /// compatible.
    #[serde(default)]
    pub dhis_version_range: String,
    #[serde(default)]
    pub dhis_app_key: String,
    #[serde(default)]
    pub dhis_launch_url: String,
    /// Authorities the viewer must all hold to see this action listed.
    #[serde(default)]
    pub dhis_authorities: Vec<String>,
    #[serde(default = "no_public_access")]
    pub public_access: String,
    #[serde(default)]
    pub user_accesses: Vec<SharingSetting>,
    #[serde(default)]
    pub user_group_accesses: Vec<SharingSetting>,
    #[serde(default)]
    pub user: NamedRef,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub last_updated_by: NamedRef,
    #[serde(default)]
    pub dirty: bool,
}

fn default_description() -> TranslatableText {
    TranslatableText::new("action-description", "")
}

fn no_public_access() -> String {
    PUBLIC_ACCESS_NONE.to_string()
}

impl PersistedAction {
    /// Sharing check with DHIS2-style access strings: super admins and the
    /// owner always pass; otherwise the public access string or a matching
    /// user/group entry must grant the mode.
    pub fn allows(&self, viewer: &User, mode: AccessMode) -> bool {
        if viewer.is_super_admin() || self.user.id == viewer.id {
            return true;
        }
        if access_grants(&self.public_access, mode) {
            return true;
        }
        let user_grant = self
            .user_accesses
            .iter()
            .any(|access| access.id == viewer.id && access_grants(&access.access, mode));
        let group_grant = self.user_group_accesses.iter().any(|access| {
            viewer.user_groups.iter().any(|group| group.id == access.id)
                && access_grants(&access.access, mode)
        });
        user_grant || group_grant
    }

    /// The page-listing visibility rule (4.5): looser than [`allows`] — any
    /// non-sentinel public access string counts.
    pub fn is_visible_to(&self, viewer: &User) -> bool {
        sharing_visible(
            &self.public_access,
            &self.user_accesses,
            &self.user_group_accesses,
            viewer,
        )
    }
}

// "rw------": metadata read at position 0, metadata write at position 1.
fn access_grants(access: &str, mode: AccessMode) -> bool {
    let bytes = access.as_bytes();
    match mode {
        AccessMode::Read => bytes.first() == Some(&b'r'),
        AccessMode::Write => bytes.get(1) == Some(&b'w'),
    }
}

/// Domain form of an action: the persisted fields plus derived flags that
/// are never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(flatten)]
    pub persisted: PersistedAction,
    /// The launch URL resolves to an installed app.
    #[serde(default)]
    pub installed: bool,
    /// The version range matches the host platform.
    #[serde(default)]
    pub compatible: bool,
    /// The viewer holds write access.
    #[serde(default)]
    pub editable: bool,
}

impl Action {
    pub fn from_persisted(
        persisted: PersistedAction,
        installed: bool,
        compatible: bool,
        editable: bool,
    ) -> Self {
        Self {
            persisted,
            installed,
            compatible,
            editable,
        }
    }

    /// Drop the derived flags for persistence.
    pub fn to_persisted(&self) -> PersistedAction {
        self.persisted.clone()
    }

    pub fn id(&self) -> &str {
        &self.persisted.id
    }

    pub fn launch_url(&self) -> &str {
        &self.persisted.dhis_launch_url
    }

    pub fn is_visible_to(&self, viewer: &User) -> bool {
        self.persisted.is_visible_to(viewer)
    }
}
