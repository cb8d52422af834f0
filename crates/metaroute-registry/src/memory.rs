//! In-memory [`KindRegistry`] backend.

use std::sync::RwLock;

use metaroute_types::{KindFamily, ObjectKind};

use crate::error::{RegistryError, RegistryResult};
use crate::traits::{KindQuery, KindRegistry};

/// A mutable, in-memory registry of the kinds of one family.
///
/// Registering a kind under an existing internal name replaces it in place,
/// keeping its original position.
#[derive(Debug)]
pub struct InMemoryKindRegistry {
    family: KindFamily,
    kinds: RwLock<Vec<ObjectKind>>,
}

impl InMemoryKindRegistry {
    pub fn new(family: KindFamily) -> Self {
        Self {
            family,
            kinds: RwLock::new(Vec::new()),
        }
    }

    /// Build a registry seeded with `kinds`.
    pub fn with_kinds(family: KindFamily, kinds: impl IntoIterator<Item = ObjectKind>) -> RegistryResult<Self> {
        let registry = Self::new(family);
        for kind in kinds {
            registry.register(kind)?;
        }
        Ok(registry)
    }

    pub fn family(&self) -> KindFamily {
        self.family
    }

    /// Register or replace a kind.
    pub fn register(&self, kind: ObjectKind) -> RegistryResult<()> {
        if kind.internal_name.is_empty() {
            return Err(RegistryError::EmptyName { family: self.family });
        }
        let mut kinds = self.kinds.write().map_err(|_| RegistryError::LockPoisoned)?;
        match kinds.iter_mut().find(|k| k.internal_name == kind.internal_name) {
            Some(existing) => *existing = kind,
            None => kinds.push(kind),
        }
        Ok(())
    }

    /// Remove a kind by internal name. Returns `true` if it was registered.
    pub fn unregister(&self, internal_name: &str) -> RegistryResult<bool> {
        let mut kinds = self.kinds.write().map_err(|_| RegistryError::LockPoisoned)?;
        let before = kinds.len();
        kinds.retain(|k| k.internal_name != internal_name);
        Ok(kinds.len() != before)
    }

    /// Number of registered kinds, exposed or not.
    pub fn len(&self) -> usize {
        self.kinds.read().map(|k| k.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KindRegistry for InMemoryKindRegistry {
    fn list_kinds(&self, query: &KindQuery) -> RegistryResult<Vec<ObjectKind>> {
        let kinds = self.kinds.read().map_err(|_| RegistryError::LockPoisoned)?;
        Ok(kinds.iter().filter(|k| query.matches(k)).cloned().collect())
    }
}
