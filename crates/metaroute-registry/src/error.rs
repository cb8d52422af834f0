//! Error types for registry operations.

use metaroute_types::KindFamily;
use thiserror::Error;

/// Errors that can occur while consulting a kind registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry backend could not be consulted.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// A kind with an empty internal name was registered.
    #[error("{family} kind must have a non-empty internal name")]
    EmptyName { family: KindFamily },

    /// A writer panicked while holding the registry lock.
    #[error("registry lock poisoned")]
    LockPoisoned,
}

/// Convenience type alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
