use thiserror::Error;

use crate::kind::EntityKind;

/// Errors produced while building or naming entity records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Positional arguments do not match the schema's field count.
    #[error("incorrect number of arguments for {kind}: expected {expected}, got {actual}")]
    Arity {
        kind: EntityKind,
        expected: usize,
        actual: usize,
    },

    /// A composite write whose total argument count selects no sub-record.
    #[error("incorrect number of arguments received: {actual} does not select a sub-record")]
    UnroutableArity { actual: usize },

    /// The entity tag is not one of the known kinds.
    #[error("unknown entity tag: {0}")]
    UnknownEntity(String),
}
