use metaroute_types::{MetaValue, ObjectId};

use crate::error::StoreResult;

/// Meta entry store for one object family.
///
/// Implementations must satisfy these invariants:
/// - Reading a missing key is not an error; it returns `Ok(None)`.
/// - Writes and deletes against [`ObjectId::none`] are no-ops returning
///   `Ok(false)`.
/// - `delete` is idempotent: deleting an absent key returns `Ok(false)`
///   every time.
/// - Implementations provide their own synchronization (`Send + Sync`).
pub trait MetaStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, object_id: ObjectId, key: &str) -> StoreResult<Option<MetaValue>>;

    /// Store `value` under `key`.
    ///
    /// Returns `true` if the stored value changed, `false` if the same value
    /// was already present.
    fn set(&self, object_id: ObjectId, key: &str, value: &str) -> StoreResult<bool>;

    /// Delete `key`. Returns `true` if the key existed.
    fn delete(&self, object_id: ObjectId, key: &str) -> StoreResult<bool>;
}
