use std::collections::BTreeMap;

use crate::model::{PersistedLandingNode, TranslatableText, REFERENCE_LOCALE};
use crate::service::{forest, HomeError, HomeService};

/// Locale to key-to-term maps. The reference locale entry is always present
/// and holds the reference values.
pub type TranslationCatalog = BTreeMap<String, BTreeMap<String, String>>;

/// Collect the translation catalog of a set of texts.
pub fn extract<'a>(texts: impl IntoIterator<Item = &'a TranslatableText>) -> TranslationCatalog {
    let mut catalog = TranslationCatalog::new();
    catalog.insert(REFERENCE_LOCALE.to_string(), BTreeMap::new());

    for text in texts {
        catalog
            .entry(REFERENCE_LOCALE.to_string())
            .or_default()
            .insert(text.key.clone(), text.reference_value.clone());
        for (locale, term) in &text.translations {
            catalog
                .entry(locale.clone())
                .or_default()
                .insert(text.key.clone(), term.clone());
        }
    }
    catalog
}

fn node_texts(node: &PersistedLandingNode) -> impl Iterator<Item = &TranslatableText> {
    [Some(&node.name), node.title.as_ref(), node.content.as_ref()]
        .into_iter()
        .flatten()
}

/// Terms acknowledged by an import: reference keys that the term file
/// actually mentions.
fn applied_count(catalog: &TranslationCatalog, terms: &BTreeMap<String, String>) -> usize {
    catalog
        .get(REFERENCE_LOCALE)
        .map(|reference| reference.keys().filter(|key| terms.contains_key(*key)).count())
        .unwrap_or(0)
}

impl HomeService {
    /// Translation catalog of the tree containing the given node ids.
    pub fn export_tree_translations(&self, ids: &[String]) -> Result<TranslationCatalog, HomeError> {
        let stored = self.load_forest();
        let group = stored
            .iter()
            .find(|group| ids.iter().any(|id| forest::is_member(group, id)))
            .ok_or_else(|| {
                HomeError::NotFound(format!("no landing pages match: {}", ids.join(", ")))
            })?;
        Ok(extract(group.iter().flat_map(node_texts)))
    }

    /// Apply a term file to the tree containing `node_id`, returning how
    /// many of the tree's keys the file covered. Terms for unknown keys are
    /// ignored; applying the same file twice is a no-op.
    pub fn import_tree_translations(
        &self,
        node_id: &str,
        locale: &str,
        terms: &BTreeMap<String, String>,
    ) -> Result<usize, HomeError> {
        let mut stored = self.load_forest();
        let index = stored
            .iter()
            .position(|group| forest::is_member(group, node_id))
            .ok_or_else(|| HomeError::NotFound(format!("landing page not found: {node_id}")))?;

        let translated: Vec<PersistedLandingNode> = stored[index]
            .iter()
            .map(|node| PersistedLandingNode {
                name: node.name.apply_term(locale, terms.get(&node.name.key).map(String::as_str)),
                title: node.title.as_ref().map(|text| {
                    text.apply_term(locale, terms.get(&text.key).map(String::as_str))
                }),
                content: node.content.as_ref().map(|text| {
                    text.apply_term(locale, terms.get(&text.key).map(String::as_str))
                }),
                ..node.clone()
            })
            .collect();

        let catalog = extract(translated.iter().flat_map(node_texts));
        stored[index] = translated;
        self.save_forest(&stored)?;

        Ok(applied_count(&catalog, terms))
    }

    /// Translation catalog of one action. Only the name is translatable.
    pub fn export_action_translations(&self, id: &str) -> Result<TranslationCatalog, HomeError> {
        let actions = self.load_actions();
        let action = actions
            .iter()
            .find(|action| action.id == id)
            .ok_or_else(|| HomeError::NotFound(format!("action not found: {id}")))?;
        Ok(extract([&action.name]))
    }

    /// Apply a term file to one action's name.
    pub fn import_action_translations(
        &self,
        id: &str,
        locale: &str,
        terms: &BTreeMap<String, String>,
    ) -> Result<usize, HomeError> {
        let actions = self.load_actions();
        let action = actions
            .iter()
            .find(|action| action.id == id)
            .ok_or_else(|| HomeError::NotFound(format!("action not found: {id}")))?;

        let mut translated = action.clone();
        translated.name = translated
            .name
            .apply_term(locale, terms.get(&translated.name.key).map(String::as_str));

        let catalog = extract([&translated.name]);
        self.save_persisted_action(translated, false)?;

        Ok(applied_count(&catalog, terms))
    }
}
