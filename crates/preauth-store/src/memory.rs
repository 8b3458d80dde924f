use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::EntityStore;

/// In-memory, `BTreeMap`-based entity store.
///
/// Intended for tests and embedding. The keyspace lives behind a `RwLock`;
/// values are cloned on read and write.
pub struct InMemoryEntityStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryEntityStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.keys()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect()
    }
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).filter(|v| !v.is_empty()).cloned())
    }
}

impl std::fmt::Debug for InMemoryEntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryEntityStore")
            .field("key_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get() {
        let store = InMemoryEntityStore::new();
        store.put("PRO1", b"{\"a\":1}").unwrap();
        assert_eq!(store.get("PRO1").unwrap().as_deref(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let store = InMemoryEntityStore::new();
        assert!(store.get("nope").unwrap().is_none());
        assert!(!store.exists("nope").unwrap());
    }

    #[test]
    fn empty_value_reads_as_absent() {
        let store = InMemoryEntityStore::new();
        store.put("MEM1", b"").unwrap();
        assert!(store.get("MEM1").unwrap().is_none());
        assert!(!store.exists("MEM1").unwrap());
    }

    #[test]
    fn put_overwrites() {
        let store = InMemoryEntityStore::new();
        store.put("k", b"one").unwrap();
        store.put("k", b"two").unwrap();
        assert_eq!(store.get("k").unwrap().unwrap(), b"two");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn keys_are_sorted_and_filterable() {
        let store = InMemoryEntityStore::new();
        store.put("SRV2", b"x").unwrap();
        store.put("MEM9", b"x").unwrap();
        store.put("SRV1", b"x").unwrap();
        assert_eq!(store.keys(), vec!["MEM9", "SRV1", "SRV2"]);
        assert_eq!(store.keys_with_prefix("SRV"), vec!["SRV1", "SRV2"]);
    }

    #[test]
    fn usable_through_reference() {
        let store = InMemoryEntityStore::new();
        let by_ref: &dyn EntityStore = &store;
        by_ref.put("PA1", b"form").unwrap();
        assert!(store.exists("PA1").unwrap());
    }
}
