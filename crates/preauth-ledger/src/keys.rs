//! Record key generation.
//!
//! Keys are `prefix + random decimal suffix`. The entropy source is owned by
//! the generator so tests can seed it; nothing here reads process-wide
//! random state.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::debug;

use preauth_store::EntityStore;
use preauth_types::{EntityKind, RecordKey};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};

/// Generates type-prefixed record keys from an injected random source.
pub struct KeyGenerator<R> {
    rng: R,
    sub_record_range: u32,
    form_range: u32,
    max_attempts: u32,
}

impl KeyGenerator<StdRng> {
    /// Generator seeded from operating-system entropy.
    pub fn from_entropy(config: &RegistryConfig) -> Self {
        Self::new(config, StdRng::from_entropy())
    }

    /// Deterministic generator for reproducible runs.
    pub fn seeded(config: &RegistryConfig, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> KeyGenerator<R> {
    pub fn new(config: &RegistryConfig, rng: R) -> Self {
        Self {
            rng,
            sub_record_range: config.sub_record_key_range.max(1),
            form_range: config.form_key_range.max(1),
            max_attempts: config.max_key_attempts.max(1),
        }
    }

    /// Exclusive bound of the suffix for keys of `kind`.
    pub fn range(&self, kind: EntityKind) -> u32 {
        if kind.is_sub_record() {
            self.sub_record_range
        } else {
            self.form_range
        }
    }

    /// Draw a key without checking whether it is already in use.
    pub fn next_key(&mut self, kind: EntityKind) -> RecordKey {
        let suffix = self.rng.gen_range(0..self.range(kind));
        RecordKey::generated(kind, suffix)
    }

    /// Draw keys until one is absent from `store`.
    ///
    /// Probing is a read, so a concurrent writer can still claim the key
    /// between the probe and the caller's `put`.
    pub fn next_unique_key<S: EntityStore + ?Sized>(
        &mut self,
        kind: EntityKind,
        store: &S,
    ) -> RegistryResult<RecordKey> {
        for attempt in 1..=self.max_attempts {
            let key = self.next_key(kind);
            if !store.exists(key.as_str())? {
                return Ok(key);
            }
            debug!(kind = %kind, key = %key, attempt, "generated key already taken");
        }
        Err(RegistryError::KeySpaceExhausted {
            kind,
            attempts: self.max_attempts,
        })
    }
}

impl<R> fmt::Debug for KeyGenerator<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyGenerator")
            .field("sub_record_range", &self.sub_record_range)
            .field("form_range", &self.form_range)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
