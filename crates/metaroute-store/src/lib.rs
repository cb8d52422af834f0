//! Meta entry storage for metaroute.
//!
//! A meta entry is a `(object id, key) -> value` pair attached to a content
//! or classification object. Storage is an external collaborator: metaroute
//! never caches entries and never holds them beyond one request.
//!
//! All backends implement the [`MetaStore`] trait:
//!
//! - [`InMemoryMetaStore`] -- `HashMap`-based store for tests and embedding
//!
//! Content objects and classification objects use separate stores; the HTTP
//! layer picks one per request after resolving the collection base.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryMetaStore;
pub use traits::MetaStore;
