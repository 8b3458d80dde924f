//! Key-value entity store for pre-authorization records.
//!
//! The store is the ledger boundary: a flat keyspace of textual keys mapping
//! to opaque bytes, with `put` and `get` and nothing else. It never interprets
//! values and never enforces that a key's prefix matches what is stored
//! under it.
//!
//! # Storage Backends
//!
//! All backends implement the [`EntityStore`] trait:
//!
//! - [`InMemoryEntityStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileEntityStore`] -- single JSON document on disk, used by the CLI
//!
//! # Design Rules
//!
//! 1. An empty stored value is indistinguishable from an absent one.
//! 2. `put` overwrites; callers that must not overwrite probe with `exists`.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileEntityStore;
pub use memory::InMemoryEntityStore;
pub use traits::EntityStore;
