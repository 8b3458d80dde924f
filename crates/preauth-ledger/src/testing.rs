//! Test fixtures shared by the unit tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::SeedableRng;

use preauth_store::{EntityStore, InMemoryEntityStore, StoreError, StoreResult};

use crate::config::RegistryConfig;
use crate::registry::PreAuthRegistry;

pub(crate) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Registry with default configuration and a fixed seed.
pub(crate) fn registry<S: EntityStore>(store: S) -> PreAuthRegistry<S, StdRng> {
    registry_with(store, RegistryConfig::default())
}

pub(crate) fn registry_with<S: EntityStore>(
    store: S,
    config: RegistryConfig,
) -> PreAuthRegistry<S, StdRng> {
    PreAuthRegistry::with_rng(store, config, StdRng::seed_from_u64(7)).unwrap()
}

/// In-memory store with injected failures.
pub(crate) struct FlakyStore {
    inner: InMemoryEntityStore,
    /// 1-based index of the `put` that fails; 0 never fails.
    fail_put_at: usize,
    fail_gets: bool,
    puts: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn failing_put(n: usize) -> Self {
        Self {
            inner: InMemoryEntityStore::new(),
            fail_put_at: n,
            fail_gets: false,
            puts: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing_get() -> Self {
        Self {
            fail_gets: true,
            ..Self::failing_put(0)
        }
    }

    pub(crate) fn inner(&self) -> &InMemoryEntityStore {
        &self.inner
    }
}

impl EntityStore for FlakyStore {
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let n = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_put_at {
            return Err(StoreError::Io(io::Error::other(format!("injected put failure for {key}"))));
        }
        self.inner.put(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.fail_gets {
            return Err(StoreError::Io(io::Error::other(format!("injected get failure for {key}"))));
        }
        self.inner.get(key)
    }
}
