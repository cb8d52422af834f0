//! Route registration and the HTTP glue around [`MetaHandlers`].
//!
//! Every public, API-exposed kind gets its own routes under the configured
//! namespace:
//!
//! - `GET    /{base}/{id}/meta/{key}`
//! - `POST   /{base}/{id}/meta/{key}` (`value`)
//! - `DELETE /{base}/{id}/meta/{key}`
//! - `DELETE /{base}/{id}/meta` (`keys`)
//!
//! Each route carries its collection base as a request extension, and the
//! id and key come from named captures. Mutating requests run argument
//! validation, classify the base once, then pass the resolved kind through
//! the permission gate to the handler.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequestParts, Path, Query, State};
use axum::http::request::Parts;
use axum::response::Json;
use axum::routing::{delete, get};
use axum::{Extension, Router};
use metaroute_registry::KindDirectory;
use metaroute_types::{validate_meta_key, Action, KindFamily, ObjectId, RouteIdentity};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{AuthProvider, Credentials, Identity};
use crate::error::{ApiError, ServerResult};
use crate::gate;
use crate::handler::{self, BulkOutcome, MetaHandlers};
use crate::params;

/// Shared state of every route.
#[derive(Clone)]
pub struct AppState {
    pub handlers: Arc<MetaHandlers>,
    pub auth: Arc<dyn AuthProvider>,
    pub max_bulk_keys: usize,
}

/// The collection base a route was registered for.
#[derive(Clone, Debug)]
struct CollectionBase(Arc<str>);

/// The authenticated actor of a request. Anonymous when no valid
/// credentials are presented.
pub struct Actor(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let credentials = Credentials::from_headers(&parts.headers);
        state.auth.authenticate(&credentials).await.map(Actor).map_err(|e| {
            warn!(error = %e, "authentication failed");
            ApiError::Forbidden { anonymous: true }
        })
    }
}

/// A collection base that will be served, with the kinds it names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteBase {
    pub base: String,
    /// `(family, internal name)` of every exposed kind serving this base.
    /// More than one entry means requests to the base are ambiguous.
    pub kinds: Vec<(KindFamily, String)>,
}

/// Collect the distinct, routable bases of every exposed kind, in registry
/// order (content first).
pub fn route_bases(directory: &KindDirectory) -> ServerResult<Vec<RouteBase>> {
    let mut bases: Vec<RouteBase> = Vec::new();
    for kind in directory.all_public_api_kinds()? {
        if !is_routable_base(&kind.route_base) {
            warn!(
                family = %kind.family,
                kind = %kind.internal_name,
                base = %kind.route_base,
                "skipping kind whose route base is not a single path segment"
            );
            continue;
        }
        match bases.iter_mut().find(|b| b.base == kind.route_base) {
            Some(existing) => existing.kinds.push((kind.family, kind.internal_name)),
            None => bases.push(RouteBase {
                base: kind.route_base,
                kinds: vec![(kind.family, kind.internal_name)],
            }),
        }
    }
    Ok(bases)
}

/// Human-readable `METHOD path` lines for every route of `bases`.
pub fn describe_routes(bases: &[RouteBase], namespace: &str) -> Vec<String> {
    bases
        .iter()
        .flat_map(|b| {
            let single = format!("/{namespace}/{}/{{id}}/meta/{{key}}", b.base);
            let bulk = format!("/{namespace}/{}/{{id}}/meta", b.base);
            [
                format!("GET    {single}"),
                format!("POST   {single}"),
                format!("DELETE {single}"),
                format!("DELETE {bulk}"),
            ]
        })
        .collect()
}

fn is_routable_base(base: &str) -> bool {
    !base.is_empty()
        && base != "."
        && base != ".."
        && base
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Build the axum router: `/health` plus the meta routes of every exposed
/// kind under `/{namespace}`.
pub fn build_router(state: AppState, namespace: &str) -> ServerResult<Router> {
    let bases = route_bases(state.handlers.directory())?;
    let mut router = Router::new().route("/health", get(handler::health_handler));

    if !bases.is_empty() {
        let mut api = Router::new();
        for route_base in &bases {
            info!(namespace, base = %route_base.base, kinds = ?route_base.kinds, "registering meta routes");
            api = api.merge(kind_routes(&route_base.base));
        }
        router = router.nest(&format!("/{namespace}"), api);
    }

    Ok(router
        .fallback(no_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn kind_routes(base: &str) -> Router<AppState> {
    Router::new()
        .route(
            &format!("/{base}/:id/meta/:key"),
            get(get_meta)
                .post(update_meta)
                .delete(delete_meta)
                .fallback(no_route),
        )
        .route(&format!("/{base}/:id/meta"), delete(delete_bulk).fallback(no_route))
        .layer(Extension(CollectionBase(Arc::from(base))))
}

async fn no_route() -> ApiError {
    ApiError::NoRoute
}

fn parse_object_id(segment: &str) -> Result<ObjectId, ApiError> {
    segment.parse().map_err(|_| ApiError::NoRoute)
}

/// Identity of a single-key route. Segments that violate the route pattern
/// answer as an unmatched route.
fn single_route(base: &CollectionBase, id: &str, key: &str) -> Result<RouteIdentity, ApiError> {
    let object_id = parse_object_id(id)?;
    validate_meta_key(key).map_err(|_| ApiError::NoRoute)?;
    Ok(RouteIdentity::single(&*base.0, object_id, key))
}

async fn get_meta(
    State(state): State<AppState>,
    Extension(base): Extension<CollectionBase>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<String>, ApiError> {
    let Path((id, key)) = path?;
    let route = single_route(&base, &id, &key)?;
    let kind = state.handlers.resolve(&route.collection_base)?;
    Ok(Json(state.handlers.get_meta(&kind, &route)?))
}

async fn update_meta(
    State(state): State<AppState>,
    Extension(base): Extension<CollectionBase>,
    path: Result<Path<(String, String)>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    Actor(identity): Actor,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<bool>, ApiError> {
    let Path((id, key)) = path?;
    let route = single_route(&base, &id, &key)?;
    let Query(query) = query?;
    let value = params::value_param(&body?, &query)?;
    let resolution = state.handlers.classify(&route.collection_base);
    let kind = gate::require(state.auth.as_ref(), &identity, Action::Create, resolution, &route).await?;
    Ok(Json(state.handlers.update_meta(&kind, &route, &value)?))
}

async fn delete_meta(
    State(state): State<AppState>,
    Extension(base): Extension<CollectionBase>,
    path: Result<Path<(String, String)>, PathRejection>,
    Actor(identity): Actor,
) -> Result<Json<bool>, ApiError> {
    let Path((id, key)) = path?;
    let route = single_route(&base, &id, &key)?;
    let resolution = state.handlers.classify(&route.collection_base);
    let kind = gate::require(state.auth.as_ref(), &identity, Action::Delete, resolution, &route).await?;
    Ok(Json(state.handlers.delete_meta(&kind, &route)?))
}

async fn delete_bulk(
    State(state): State<AppState>,
    Extension(base): Extension<CollectionBase>,
    path: Result<Path<String>, PathRejection>,
    Actor(identity): Actor,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Vec<BulkOutcome>>, ApiError> {
    let Path(id) = path?;
    let object_id = parse_object_id(&id)?;
    let keys = params::keys_param(&body?, state.max_bulk_keys)?;
    let route = RouteIdentity::bulk(&*base.0, object_id);
    let resolution = state.handlers.classify(&route.collection_base);
    let kind = gate::require(state.auth.as_ref(), &identity, Action::Delete, resolution, &route).await?;
    Ok(Json(state.handlers.delete_bulk(&kind, route.object_id, &keys)?))
}
