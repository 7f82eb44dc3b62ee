use serde::{Deserialize, Serialize};

use crate::model::permission::{LandingPagePermission, Permission};

/// The single `config` namespace document. Every field is optional so that
/// documents written by older revisions keep decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poeditor_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_permissions: Option<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page_permissions: Option<Vec<LandingPagePermission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_all_actions: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_analytics_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_decodes() {
        let settings: PersistedSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, PersistedSettings::default());
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let settings = PersistedSettings {
            default_application: Some("/apps/dashboard".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(json, r#"{"defaultApplication":"/apps/dashboard"}"#);
    }
}
