//! Sub-record writer and reader.

use rand::RngCore;
use serde::de::DeserializeOwned;
use tracing::debug;

use preauth_store::EntityStore;
use preauth_types::{EntityKind, EntityRecord, RecordKey, SubRecord};

use crate::error::{RegistryError, RegistryResult};
use crate::registry::PreAuthRegistry;

impl<S: EntityStore, R: RngCore> PreAuthRegistry<S, R> {
    /// Validate `args` against the schema of `kind` and persist the record.
    ///
    /// Arity is checked before anything else, so a rejected call neither
    /// draws a key nor touches the store.
    pub fn write_subrecord(&mut self, kind: EntityKind, args: &[String]) -> RegistryResult<RecordKey> {
        if !kind.is_sub_record() {
            return Err(RegistryError::InvalidRequest(format!(
                "{kind} is not a sub-record kind"
            )));
        }
        let record = EntityRecord::from_fields(kind, args)?;
        self.persist_record(&record)
    }

    /// Persist an already-typed sub-record under a fresh key.
    pub fn write_record<T: SubRecord>(&mut self, record: T) -> RegistryResult<RecordKey> {
        self.persist_record(&record.into())
    }

    pub(crate) fn persist_record(&mut self, record: &EntityRecord) -> RegistryResult<RecordKey> {
        let kind = record.kind();
        let bytes = record.to_json().map_err(|e| RegistryError::Encode {
            kind,
            reason: e.to_string(),
        })?;
        let key = self.next_key(kind)?;
        self.store.put(key.as_str(), &bytes)?;
        debug!(kind = %kind, key = %key, "sub-record written");
        Ok(key)
    }

    /// Fetch and decode a sub-record of schema `T`.
    pub fn read_subrecord<T: SubRecord>(&self, key: &RecordKey) -> RegistryResult<T> {
        let bytes = self.fetch(T::KIND, key)?;
        decode(T::KIND, key, &bytes)
    }

    /// Fetch and decode a sub-record whose schema is chosen at runtime.
    pub fn read_entity(&self, kind: EntityKind, key: &RecordKey) -> RegistryResult<EntityRecord> {
        let bytes = self.fetch(kind, key)?;
        EntityRecord::from_json(kind, &bytes).map_err(|e| RegistryError::Decode {
            kind,
            key: key.clone(),
            reason: e.to_string(),
        })
    }

    /// Raw stored bytes; absence is `NotFound` for `kind`.
    pub(crate) fn fetch(&self, kind: EntityKind, key: &RecordKey) -> RegistryResult<Vec<u8>> {
        debug!(kind = %kind, key = %key, "reading");
        self.store
            .get(key.as_str())?
            .ok_or_else(|| RegistryError::NotFound {
                kind,
                key: key.clone(),
            })
    }
}

pub(crate) fn decode<T: DeserializeOwned>(
    kind: EntityKind,
    key: &RecordKey,
    bytes: &[u8],
) -> RegistryResult<T> {
    serde_json::from_slice(bytes).map_err(|e| RegistryError::Decode {
        kind,
        key: key.clone(),
        reason: e.to_string(),
    })
}
