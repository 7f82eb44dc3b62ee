use std::path::Path;
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::error::StoreError;
use crate::traits::ObjectStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("objects");

/// RedbStore is an ObjectStore backed by redb — a pure-Rust embedded
/// key-value database. One table row per namespace document.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::Storage(e.to_string()))?;

        // Ensure the table exists by doing a write transaction.
        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl ObjectStore for RedbStore {
    fn get(&self, namespace: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        let table = read_txn
            .open_table(TABLE)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        match table.get(namespace) {
            Ok(Some(val)) => Ok(Some(val.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StoreError::Storage(e.to_string())),
        }
    }

    fn save(&self, namespace: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .insert(namespace, value)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, namespace: &str) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(TABLE)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            table
                .remove(namespace)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_roundtrip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let store = RedbStore::open(tmp.path()).unwrap();

        assert_eq!(store.get("landing-pages").unwrap(), None);

        store.save("landing-pages", b"[[]]").unwrap();
        assert_eq!(store.get("landing-pages").unwrap(), Some(b"[[]]".to_vec()));

        store.save("landing-pages", b"[]").unwrap();
        assert_eq!(store.get("landing-pages").unwrap(), Some(b"[]".to_vec()));

        store.delete("landing-pages").unwrap();
        assert_eq!(store.get("landing-pages").unwrap(), None);
    }

    #[test]
    fn test_delete_absent_namespace_is_noop() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let store = RedbStore::open(tmp.path()).unwrap();
        store.delete("missing").unwrap();
    }

    #[test]
    fn test_namespaces_are_independent() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let store = RedbStore::open(tmp.path()).unwrap();

        store.save("actions", b"[1]").unwrap();
        store.save("config", b"{}").unwrap();
        store.delete("actions").unwrap();

        assert_eq!(store.get("actions").unwrap(), None);
        assert_eq!(store.get("config").unwrap(), Some(b"{}".to_vec()));
    }
}
