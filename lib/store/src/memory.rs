use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::traits::ObjectStore;

/// MemoryStore is an in-memory ObjectStore used by tests and tooling.
///
/// Documents live in a namespace-keyed map behind an RwLock. Semantics match
/// the persistent backends: whole-document replace, last writer wins.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of namespaces currently holding a document.
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().unwrap().is_empty()
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, namespace: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let documents = self.documents.read().unwrap();
        Ok(documents.get(namespace).cloned())
    }

    fn save(&self, namespace: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut documents = self.documents.write().unwrap();
        documents.insert(namespace.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, namespace: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write().unwrap();
        documents.remove(namespace);
        Ok(())
    }
}
