use metaroute_types::ObjectId;

/// Errors from meta store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage backend is read-only or otherwise refuses writes.
    #[error("store is read-only")]
    ReadOnly,

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The backend refused the operation for a specific entry.
    #[error("backend rejected {key:?} on object {object_id}: {reason}")]
    Rejected {
        object_id: ObjectId,
        key: String,
        reason: String,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
