use crate::error::StoreResult;

/// Flat key-value store holding serialized records.
///
/// All implementations must satisfy these invariants:
/// - `get` returns exactly the bytes of the last successful `put` for a key.
/// - `get` returns `Ok(None)` for absent keys and for empty values.
/// - A failed `put` leaves the previous value (or absence) in place.
/// - The store never interprets values.
pub trait EntityStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Check whether a non-empty value exists under `key`.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: EntityStore + ?Sized> EntityStore for &S {
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }
}
