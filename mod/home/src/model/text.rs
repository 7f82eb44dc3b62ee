use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Locale whose value lives in `reference_value` rather than the translation map.
pub const REFERENCE_LOCALE: &str = "en";

/// A translatable string: a stable key, a reference-language value, and
/// per-locale overrides.
///
/// Keys are scoped per text field instance (`root-title`, `action-name`, ...)
/// so two different nodes never collide in an exported term dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatableText {
    pub key: String,
    pub reference_value: String,
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl TranslatableText {
    pub fn new(key: &str, reference_value: &str) -> Self {
        Self {
            key: key.to_string(),
            reference_value: reference_value.to_string(),
            translations: BTreeMap::new(),
        }
    }

    /// Value for a locale, falling back to the reference value.
    pub fn translated(&self, locale: &str) -> &str {
        if locale == REFERENCE_LOCALE {
            return &self.reference_value;
        }
        self.translations
            .get(locale)
            .map(String::as_str)
            .unwrap_or(&self.reference_value)
    }

    /// Apply an uploaded term. A reference-locale term overwrites the
    /// reference value; any other locale writes that locale's entry, leaving
    /// the rest of the map untouched. `None` leaves the text as-is.
    pub fn apply_term(&self, locale: &str, term: Option<&str>) -> TranslatableText {
        let Some(term) = term else {
            return self.clone();
        };
        let mut text = self.clone();
        if locale == REFERENCE_LOCALE {
            text.reference_value = term.to_string();
        } else {
            text.translations.insert(locale.to_string(), term.to_string());
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translated_fallback() {
        let mut text = TranslatableText::new("root-name", "Main landing page");
        text.translations.insert("fr".to_string(), "Page principale".to_string());

        assert_eq!(text.translated("en"), "Main landing page");
        assert_eq!(text.translated("fr"), "Page principale");
        assert_eq!(text.translated("es"), "Main landing page");
    }

    #[test]
    fn test_apply_term_reference_locale() {
        let text = TranslatableText::new("root-name", "Old");
        let updated = text.apply_term("en", Some("New"));
        assert_eq!(updated.reference_value, "New");
        assert!(updated.translations.is_empty());
    }

    #[test]
    fn test_apply_term_other_locale() {
        let mut text = TranslatableText::new("root-name", "Main");
        text.translations.insert("fr".to_string(), "Ancien".to_string());
        text.translations.insert("es".to_string(), "Principal".to_string());

        let updated = text.apply_term("fr", Some("Nouveau"));
        assert_eq!(updated.reference_value, "Main");
        assert_eq!(updated.translations["fr"], "Nouveau");
        // Other locales stay untouched.
        assert_eq!(updated.translations["es"], "Principal");
    }

    #[test]
    fn test_apply_term_none_is_identity() {
        let text = TranslatableText::new("k", "v");
        assert_eq!(text.apply_term("fr", None), text);
    }

    #[test]
    fn test_json_shape() {
        let text = TranslatableText::new("root-title", "Welcome");
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "key": "root-title",
                "referenceValue": "Welcome",
                "translations": {}
            })
        );
    }
}
