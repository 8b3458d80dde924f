//! Composite form assembly.
//!
//! One call writes exactly one sub-record, reads it back, embeds the copy in
//! a fresh form and persists the form:
//!
//! ```text
//! Start -> SubWritten -> SubRead -> Embedded -> Persisted
//!   \__________\____________\__________\______-> Failed
//! ```
//!
//! The steps are not atomic. A failure after the sub-record `put` leaves that
//! record in the store with no form referring to it; the error reports its
//! key as the orphan instead of compensating.

use rand::RngCore;
use tracing::{info, warn};

use preauth_store::EntityStore;
use preauth_types::{
    EntityKind, EntityRecord, Member, Payer, PreAuthForm, Provider, RecordKey, Service, TypeError,
};

use crate::error::{RegistryError, RegistryResult, WriteStage};
use crate::registry::PreAuthRegistry;

/// Composite routes keyed by total argument count: target kind and the
/// argument positions handed to its writer.
///
/// Only the 6-argument route hands the writer a slice of its own arity. The
/// other three slices are shorter than their targets' schemas and always
/// fail at the sub-record write, before anything is stored.
const ARITY_ROUTES: [(usize, EntityKind, usize, usize); 4] = [
    (6, EntityKind::Provider, 0, 6),
    (10, EntityKind::Provider, 5, 9),
    (22, EntityKind::Service, 10, 21),
    (31, EntityKind::Payer, 22, 30),
];

/// A composite write targeting one sub-record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteRequest {
    Provider(Provider),
    Member(Member),
    Service(Service),
    Payer(Payer),
}

impl WriteRequest {
    /// Build a request for an explicit sub-record kind.
    ///
    /// `args` must match the target schema's arity exactly.
    pub fn tagged(kind: EntityKind, args: &[String]) -> RegistryResult<Self> {
        Ok(EntityRecord::from_fields(kind, args)?.into())
    }

    /// Select the target kind and argument slice for a composite argument
    /// vector by its total length.
    ///
    /// | len | target   | fields used |
    /// |-----|----------|-------------|
    /// | 6   | provider | `[0..6]`    |
    /// | 10  | provider | `[5..9]`    |
    /// | 22  | service  | `[10..21]`  |
    /// | 31  | payer    | `[22..30]`  |
    ///
    /// Any other length is an arity error. The slice is not checked against
    /// the target schema here.
    pub fn route(args: &[String]) -> RegistryResult<(EntityKind, &[String])> {
        ARITY_ROUTES
            .iter()
            .find(|(len, ..)| *len == args.len())
            .map(|&(_, kind, start, end)| (kind, &args[start..end]))
            .ok_or_else(|| TypeError::UnroutableArity { actual: args.len() }.into())
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Provider(_) => EntityKind::Provider,
            Self::Member(_) => EntityKind::Member,
            Self::Service(_) => EntityKind::Service,
            Self::Payer(_) => EntityKind::Payer,
        }
    }
}

impl From<EntityRecord> for WriteRequest {
    fn from(record: EntityRecord) -> Self {
        match record {
            EntityRecord::Provider(r) => Self::Provider(r),
            EntityRecord::Member(r) => Self::Member(r),
            EntityRecord::Service(r) => Self::Service(r),
            EntityRecord::Payer(r) => Self::Payer(r),
        }
    }
}

impl From<WriteRequest> for EntityRecord {
    fn from(request: WriteRequest) -> Self {
        match request {
            WriteRequest::Provider(r) => Self::Provider(r),
            WriteRequest::Member(r) => Self::Member(r),
            WriteRequest::Service(r) => Self::Service(r),
            WriteRequest::Payer(r) => Self::Payer(r),
        }
    }
}

impl<S: EntityStore, R: RngCore> PreAuthRegistry<S, R> {
    /// Entry point for all writes.
    ///
    /// A sub-record kind writes just that sub-record and returns its key.
    /// `None` or [`EntityKind::PreAuth`] is a composite write routed by
    /// argument count (see [`WriteRequest::route`]). A length with no route
    /// is an arity error; a routed slice that does not fit its target schema
    /// fails the sub-record write. Neither stores anything.
    pub fn write(&mut self, kind: Option<EntityKind>, args: &[String]) -> RegistryResult<RecordKey> {
        match kind {
            Some(kind) if kind.is_sub_record() => self.write_subrecord(kind, args),
            _ => {
                let (kind, fields) = WriteRequest::route(args)?;
                let request = WriteRequest::tagged(kind, fields)
                    .map_err(|e| abort(WriteStage::SubRecordWrite, None, e))?;
                self.write_form(request)
            }
        }
    }

    /// Persist one sub-record and a new form embedding it; returns the form key.
    pub fn write_form(&mut self, request: WriteRequest) -> RegistryResult<RecordKey> {
        let form_key = self
            .next_key(EntityKind::PreAuth)
            .map_err(|e| abort(WriteStage::FormKey, None, e))?;
        let mut form = PreAuthForm::new(form_key.clone());
        let kind = request.kind();

        let sub_key = self
            .persist_record(&request.into())
            .map_err(|e| abort(WriteStage::SubRecordWrite, None, e))?;

        let embedded = self
            .read_entity(kind, &sub_key)
            .map_err(|e| abort(WriteStage::SubRecordRead, Some(&sub_key), e))?;
        form.embed(embedded);

        let bytes = serde_json::to_vec(&form)
            .map_err(|e| RegistryError::Encode {
                kind: EntityKind::PreAuth,
                reason: e.to_string(),
            })
            .map_err(|e| abort(WriteStage::FormWrite, Some(&sub_key), e))?;
        self.store
            .put(form_key.as_str(), &bytes)
            .map_err(|e| abort(WriteStage::FormWrite, Some(&sub_key), e.into()))?;

        info!(form = %form_key, kind = %kind, sub_record = %sub_key, "pre-auth form submitted");
        Ok(form_key)
    }
}

fn abort(stage: WriteStage, orphan: Option<&RecordKey>, source: RegistryError) -> RegistryError {
    if let Some(key) = orphan {
        warn!(stage = %stage, orphan = %key, error = %source, "composite write failed after sub-record was stored");
    } else {
        warn!(stage = %stage, error = %source, "composite write failed");
    }
    RegistryError::OperationFailed {
        stage,
        orphan: orphan.cloned(),
        source: Box::new(source),
    }
}
