/// Errors from entity store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A lock guarding the keyspace was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// The store was opened read-only.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
