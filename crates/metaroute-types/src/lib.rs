//! Foundation types for metaroute.
//!
//! metaroute exposes metadata key/value pairs attached to content objects
//! (posts, pages, ...) and classification objects (categories, tags, ...)
//! through a generic HTTP resource API. Every other metaroute crate depends
//! on `metaroute-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`]: Numeric id of the object that owns a meta entry
//! - [`KindFamily`]: Content or classification
//! - [`ObjectKind`]: A registered kind as the registry reports it
//! - [`Action`] / [`AbstractCapability`]: Generic mutating actions and the
//!   abstract capability each one requires per family
//! - [`RouteIdentity`]: `(collection base, object id, meta key)` of one request

pub mod capability;
pub mod error;
pub mod kind;
pub mod meta;
pub mod object;
pub mod route;

pub use capability::{AbstractCapability, Action};
pub use error::TypeError;
pub use kind::{KindFamily, ObjectKind};
pub use meta::{validate_meta_key, MetaValue};
pub use object::ObjectId;
pub use route::RouteIdentity;
