use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use metaroute_types::{MetaValue, ObjectId};

use crate::error::{StoreError, StoreResult};
use crate::traits::MetaStore;

/// In-memory, HashMap-based meta store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock` for
/// safe concurrent access and cloned on read.
pub struct InMemoryMetaStore {
    entries: RwLock<HashMap<ObjectId, BTreeMap<String, MetaValue>>>,
    read_only: bool,
}

impl InMemoryMetaStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            read_only: false,
        }
    }

    /// A store that rejects every write and delete with [`StoreError::ReadOnly`].
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::new()
        }
    }

    /// Seed an entry, bypassing the read-only flag.
    pub fn insert(&self, object_id: ObjectId, key: impl Into<String>, value: impl Into<String>) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        map.entry(object_id).or_default().insert(key.into(), value.into());
        Ok(())
    }

    /// All entries of one object, sorted by key.
    pub fn entries(&self, object_id: ObjectId) -> StoreResult<Vec<(String, MetaValue)>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map
            .get(&object_id)
            .map(|meta| meta.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    /// Total number of entries across all objects.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .map(|map| map.values().map(BTreeMap::len).sum())
            .unwrap_or(0)
    }

    /// Returns `true` if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        Ok(())
    }
}

impl Default for InMemoryMetaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetaStore for InMemoryMetaStore {
    fn get(&self, object_id: ObjectId, key: &str) -> StoreResult<Option<MetaValue>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(&object_id).and_then(|meta| meta.get(key)).cloned())
    }

    fn set(&self, object_id: ObjectId, key: &str, value: &str) -> StoreResult<bool> {
        self.check_writable()?;
        if object_id.is_none() {
            return Ok(false);
        }
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let meta = map.entry(object_id).or_default();
        if meta.get(key).is_some_and(|existing| existing == value) {
            return Ok(false);
        }
        meta.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    fn delete(&self, object_id: ObjectId, key: &str) -> StoreResult<bool> {
        self.check_writable()?;
        if object_id.is_none() {
            return Ok(false);
        }
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let Some(meta) = map.get_mut(&object_id) else {
            return Ok(false);
        };
        let existed = meta.remove(key).is_some();
        if meta.is_empty() {
            map.remove(&object_id);
        }
        Ok(existed)
    }
}

impl std::fmt::Debug for InMemoryMetaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMetaStore")
            .field("entry_count", &self.len())
            .field("read_only", &self.read_only)
            .finish()
    }
}
