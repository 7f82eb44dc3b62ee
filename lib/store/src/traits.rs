use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// ObjectStore provides whole-document storage keyed by namespace.
///
/// Namespaces follow a flat convention: `actions`, `landing-pages`, `config`.
/// Documents are opaque JSON payloads. A save replaces the entire document:
/// there are no partial updates, no transactions spanning namespaces, and no
/// optimistic concurrency. The last writer wins.
pub trait ObjectStore: Send + Sync {
    /// Get the raw document stored under a namespace. Returns None if absent.
    fn get(&self, namespace: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Save the document for a namespace, replacing any previous value.
    fn save(&self, namespace: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Delete a namespace's document. Deleting an absent namespace is a no-op.
    fn delete(&self, namespace: &str) -> Result<(), StoreError>;
}

impl dyn ObjectStore {
    /// Get and decode the JSON document stored under a namespace.
    pub fn get_object<T: DeserializeOwned>(&self, namespace: &str) -> Result<Option<T>, StoreError> {
        match self.get(namespace)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Encode and save a JSON document under a namespace.
    pub fn save_object<T: Serialize>(&self, namespace: &str, value: &T) -> Result<(), StoreError> {
        let bytes =
            serde_json::to_vec(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.save(namespace, &bytes)
    }
}
