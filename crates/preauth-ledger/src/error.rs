use std::fmt;

use preauth_store::StoreError;
use preauth_types::{EntityKind, RecordKey, TypeError};

/// Step of a composite write at which it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteStage {
    /// Drawing the composite form's key.
    FormKey,
    /// Persisting the sub-record.
    SubRecordWrite,
    /// Reading the just-written sub-record back for embedding.
    SubRecordRead,
    /// Persisting the composite form.
    FormWrite,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormKey => write!(f, "form key generation"),
            Self::SubRecordWrite => write!(f, "sub-record write"),
            Self::SubRecordRead => write!(f, "sub-record read-back"),
            Self::FormWrite => write!(f, "form write"),
        }
    }
}

fn orphan_suffix(orphan: &Option<RecordKey>) -> String {
    match orphan {
        Some(key) => format!(" (sub-record {key} left without a form)"),
        None => String::new(),
    }
}

/// Errors surfaced by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Argument count does not match the schema (or selects none).
    #[error("{0}")]
    Arity(TypeError),

    /// No value stored under the key.
    #[error("failed to get {kind} for {key}: not found")]
    NotFound { kind: EntityKind, key: RecordKey },

    /// Stored bytes do not decode as the expected schema.
    #[error("failed to get {kind} for {key}: {reason}")]
    Decode {
        kind: EntityKind,
        key: RecordKey,
        reason: String,
    },

    /// A record could not be serialized.
    #[error("failed to encode {kind}: {reason}")]
    Encode { kind: EntityKind, reason: String },

    /// The entity store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A composite write aborted. `orphan` names a sub-record that was
    /// persisted before the failure and is not referenced by any form.
    #[error("failed to perform operation during {stage}{}", orphan_suffix(.orphan))]
    OperationFailed {
        stage: WriteStage,
        orphan: Option<RecordKey>,
        #[source]
        source: Box<RegistryError>,
    },

    /// Unknown operation or unsupported argument shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Every probed key was already taken.
    #[error("no free {kind} key after {attempts} attempts")]
    KeySpaceExhausted { kind: EntityKind, attempts: u32 },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RegistryError {
    /// The orphaned sub-record key of a failed composite write, if any.
    pub fn orphan(&self) -> Option<&RecordKey> {
        match self {
            Self::OperationFailed { orphan, .. } => orphan.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<TypeError> for RegistryError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnknownEntity(tag) => {
                Self::InvalidRequest(format!("unknown entity tag: {tag}"))
            }
            other => Self::Arity(other),
        }
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
