//! Composite-write protocol for pre-authorization forms.
//!
//! This crate turns inbound write and read requests into entity store
//! operations. It provides:
//! - [`KeyGenerator`] -- type-prefixed random keys from an injected RNG,
//!   with optional collision probing against the store
//! - sub-record writer and reader (`write_subrecord`, `read_subrecord`,
//!   `read_entity` on [`PreAuthRegistry`])
//! - the composite assembler ([`WriteRequest`], `write`, `write_form`)
//! - the query router ([`Query`], `read`, `read_args`)
//! - named dispatch (`init`, `invoke`, `query`) over the operation names
//!   used by existing clients
//!
//! Ordering and isolation between concurrent writers are the store's
//! business; nothing here locks or retries.

pub mod assembler;
pub mod config;
pub mod error;
pub mod keys;
pub mod query;
pub mod registry;
pub mod subrecord;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::WriteRequest;
pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult, WriteStage};
pub use keys::KeyGenerator;
pub use query::Query;
pub use registry::{Invocation, PreAuthRegistry};

pub use preauth_store::{EntityStore, FileEntityStore, InMemoryEntityStore, StoreError};
pub use preauth_types::{
    EntityKind, EntityRecord, FormStatus, Member, Payer, PreAuthForm, Provider, RecordKey, Service,
    SubRecord,
};
