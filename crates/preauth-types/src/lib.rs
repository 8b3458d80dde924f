//! Entity schemas for pre-authorization requests.
//!
//! A pre-authorization request is a composite form built from four
//! independently persisted sub-records. Every other preauth crate depends on
//! `preauth-types`.
//!
//! # Key Types
//!
//! - [`Provider`], [`Member`], [`Service`], [`Payer`] — fixed-arity sub-records
//! - [`SubRecord`] — positional construction and arity metadata for sub-records
//! - [`EntityRecord`] — a sub-record of any kind, tagged by its [`EntityKind`]
//! - [`PreAuthForm`] — the composite form embedding point-in-time copies
//! - [`EntityKind`] — entity-type tag carrying key prefix and key range
//! - [`RecordKey`] — textual store key with a type-indicative prefix

pub mod error;
pub mod form;
pub mod kind;
pub mod records;

pub use error::TypeError;
pub use form::{FormStatus, PreAuthForm};
pub use kind::{EntityKind, RecordKey};
pub use records::{EntityRecord, Member, Payer, Provider, Service, SubRecord};
