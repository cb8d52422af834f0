//! HTTP server for metaroute.
//!
//! Serves meta entries of every public, API-exposed content and
//! classification kind under `/{namespace}/{base}/{id}/meta[/{key}]`,
//! gating writes and deletes on the capabilities each kind declares.

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handler;
pub mod params;
pub mod router;
pub mod sanitize;
pub mod server;

pub use auth::{AllowAllAuth, AuthProvider, Credentials, Identity, TokenAuth};
pub use config::{ServerConfig, TokenConfig};
pub use error::{ApiError, ErrorBody, ServerError, ServerResult};
pub use handler::{BulkOutcome, MetaHandlers, MetaStores};
pub use router::{build_router, describe_routes, route_bases, AppState, RouteBase};
pub use sanitize::sanitize_text_field;
pub use server::{directory_from_config, MetaServer};
