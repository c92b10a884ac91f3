//! In-memory key-value store.
//!
//! Implements the same contract as the SQLite store; used by tests and by
//! callers that do not need durability.

use super::kv::{KvStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::LockPoisoned("memory_kv"))
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let entries = self.lock()?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect())
    }

    fn delete_many(&self, keys: &[String]) -> StoreResult<usize> {
        let mut entries = self.lock()?;
        Ok(keys
            .iter()
            .filter(|key| entries.remove(key.as_str()).is_some())
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKvStore;
    use crate::repo::kv::KvStore;

    #[test]
    fn list_keys_is_prefix_scoped_and_sorted() {
        let store = MemoryKvStore::new();
        store.set("daily:2024-01-02", b"b").unwrap();
        store.set("daily:2024-01-01", b"a").unwrap();
        store.set("monthly:2024-01", b"m").unwrap();

        assert_eq!(
            store.list_keys("daily:").unwrap(),
            vec!["daily:2024-01-01".to_string(), "daily:2024-01-02".to_string()]
        );
        assert_eq!(store.list_keys("").unwrap().len(), 3);
    }

    #[test]
    fn delete_many_counts_only_existing_keys() {
        let store = MemoryKvStore::new();
        store.set("a", b"1").unwrap();
        let removed = store
            .delete_many(&["a".to_string(), "missing".to_string()])
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.is_empty().unwrap());
    }
}
