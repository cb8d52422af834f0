//! Object kind registry adapter for metaroute.
//!
//! The kind registries (one for content kinds, one for classification kinds)
//! are external collaborators. This crate wraps them and answers the one
//! question every request starts with: which kind does a collection base
//! name?
//!
//! # Architecture
//!
//! - [`KindRegistry`] is the collaborator interface; [`InMemoryKindRegistry`]
//!   is the bundled backend.
//! - [`KindDirectory`] holds both registries and only ever sees public,
//!   API-exposed kinds, queried fresh on every call. There is no cache.
//! - [`KindDirectory::classify`] resolves a base string to a
//!   [`KindResolution`]. Matching is purely string based: the declared route
//!   base and the internal name of every exposed kind in both registries.
//!   A base that matches both families is ambiguous and resolves to
//!   [`KindResolution::Unknown`], never to one family by precedence.
//! - [`required_capability`] maps an [`Action`](metaroute_types::Action)
//!   plus a resolution to the concrete capability an actor must hold,
//!   failing closed.

pub mod capability;
pub mod classify;
pub mod directory;
pub mod error;
pub mod memory;
pub mod traits;

pub use capability::{required_capability, CapabilityRequirement, DenyReason};
pub use classify::{KindResolution, UnknownReason};
pub use directory::{ExposedKind, KindDirectory};
pub use error::{RegistryError, RegistryResult};
pub use memory::InMemoryKindRegistry;
pub use traits::{KindFilter, KindQuery, KindRegistry};
