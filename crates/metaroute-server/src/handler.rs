//! Meta operations behind the HTTP routes.
//!
//! A request classifies its collection base once; the resolved kind picks
//! the store, and each handler calls exactly one storage primitive per key.
//! Handlers never check permissions; the routing layer gates mutating
//! requests against the same resolved kind before calling in.

use std::sync::Arc;

use axum::response::Json;
use metaroute_registry::{ExposedKind, KindDirectory, KindResolution};
use metaroute_store::MetaStore;
use metaroute_types::{KindFamily, MetaValue, ObjectId, RouteIdentity};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{ApiError, ErrorBody};

/// One meta store per kind family.
#[derive(Clone)]
pub struct MetaStores {
    content: Arc<dyn MetaStore>,
    classification: Arc<dyn MetaStore>,
}

impl MetaStores {
    pub fn new(content: Arc<dyn MetaStore>, classification: Arc<dyn MetaStore>) -> Self {
        Self {
            content,
            classification,
        }
    }

    pub fn for_family(&self, family: KindFamily) -> &dyn MetaStore {
        match family {
            KindFamily::Content => self.content.as_ref(),
            KindFamily::Classification => self.classification.as_ref(),
        }
    }
}

/// Outcome of deleting one key of a bulk request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BulkOutcome {
    /// `true` if the key existed.
    Deleted(bool),
    Failed(ErrorBody),
}

/// The registry and storage collaborators, shared by every route.
#[derive(Clone)]
pub struct MetaHandlers {
    directory: KindDirectory,
    stores: MetaStores,
}

impl MetaHandlers {
    pub fn new(directory: KindDirectory, stores: MetaStores) -> Self {
        Self { directory, stores }
    }

    pub fn directory(&self) -> &KindDirectory {
        &self.directory
    }

    /// Classify `base` once for a request.
    pub fn classify(&self, base: &str) -> KindResolution {
        self.directory.classify(base)
    }

    /// Classify `base` and require exactly one kind.
    pub fn resolve(&self, base: &str) -> Result<ExposedKind, ApiError> {
        resolved_kind(base, self.classify(base))
    }

    fn single_key(route: &RouteIdentity) -> Result<&str, ApiError> {
        route.meta_key.as_deref().ok_or(ApiError::NoRoute)
    }

    /// Read one meta value of an object of `kind`. A missing key reads as `""`.
    pub fn get_meta(&self, kind: &ExposedKind, route: &RouteIdentity) -> Result<MetaValue, ApiError> {
        let key = Self::single_key(route)?;
        debug!(family = %kind.family, object_id = %route.object_id, key, "get meta");
        let store = self.stores.for_family(kind.family);
        Ok(store.get(route.object_id, key)?.unwrap_or_default())
    }

    /// Write one meta value. Returns `true` if the stored value changed.
    pub fn update_meta(&self, kind: &ExposedKind, route: &RouteIdentity, value: &str) -> Result<bool, ApiError> {
        let key = Self::single_key(route)?;
        debug!(family = %kind.family, object_id = %route.object_id, key, "update meta");
        Ok(self.stores.for_family(kind.family).set(route.object_id, key, value)?)
    }

    /// Delete one meta key. Returns `true` if the key existed.
    pub fn delete_meta(&self, kind: &ExposedKind, route: &RouteIdentity) -> Result<bool, ApiError> {
        let key = Self::single_key(route)?;
        debug!(family = %kind.family, object_id = %route.object_id, key, "delete meta");
        Ok(self.stores.for_family(kind.family).delete(route.object_id, key)?)
    }

    /// Delete several keys of one object of `kind`.
    ///
    /// Every key is attempted in order against the same object id; a storage
    /// failure is recorded in that key's slot and the next key is still
    /// attempted. The result is aligned with `keys`.
    pub fn delete_bulk(
        &self,
        kind: &ExposedKind,
        object_id: ObjectId,
        keys: &[String],
    ) -> Result<Vec<BulkOutcome>, ApiError> {
        if keys.is_empty() {
            return Err(ApiError::InvalidKeysArray);
        }
        let family = kind.family;
        let store = self.stores.for_family(family);
        debug!(%family, %object_id, count = keys.len(), "bulk delete meta");

        let outcomes = keys
            .iter()
            .map(|key| match store.delete(object_id, key) {
                Ok(existed) => BulkOutcome::Deleted(existed),
                Err(e) => {
                    warn!(%family, %object_id, key, error = %e, "bulk delete failed for key");
                    BulkOutcome::Failed(ApiError::from(e).to_body())
                }
            })
            .collect();
        Ok(outcomes)
    }
}

/// The kind of a resolution, or a 400 when the base did not resolve to
/// exactly one kind.
pub fn resolved_kind(base: &str, resolution: KindResolution) -> Result<ExposedKind, ApiError> {
    match resolution {
        KindResolution::Content(kind) | KindResolution::Classification(kind) => Ok(kind),
        KindResolution::Unknown(reason) => {
            warn!(base, %reason, "cannot determine object type");
            Err(ApiError::CannotDetermineObjectType { base: base.to_string() })
        }
    }
}

impl std::fmt::Debug for MetaHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaHandlers")
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "metaroute",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use metaroute_registry::InMemoryKindRegistry;
    use metaroute_store::{InMemoryMetaStore, StoreError, StoreResult};
    use metaroute_types::ObjectKind;

    use super::*;

    const POST: ObjectId = ObjectId::new(57244);
    const TERM: ObjectId = ObjectId::new(12);

    /// Fails every delete of the listed keys.
    struct FlakyStore {
        inner: InMemoryMetaStore,
        failing: HashSet<String>,
    }

    impl MetaStore for FlakyStore {
        fn get(&self, object_id: ObjectId, key: &str) -> StoreResult<Option<MetaValue>> {
            self.inner.get(object_id, key)
        }

        fn set(&self, object_id: ObjectId, key: &str, value: &str) -> StoreResult<bool> {
            self.inner.set(object_id, key, value)
        }

        fn delete(&self, object_id: ObjectId, key: &str) -> StoreResult<bool> {
            if self.failing.contains(key) {
                return Err(StoreError::Rejected {
                    object_id,
                    key: key.to_string(),
                    reason: "simulated failure".into(),
                });
            }
            self.inner.delete(object_id, key)
        }
    }

    fn directory() -> KindDirectory {
        KindDirectory::new(
            Arc::new(
                InMemoryKindRegistry::with_kinds(
                    KindFamily::Content,
                    [
                        ObjectKind::new("article").with_route_base("articles"),
                        ObjectKind::new("topic"),
                    ],
                )
                .unwrap(),
            ),
            Arc::new(
                InMemoryKindRegistry::with_kinds(
                    KindFamily::Classification,
                    [
                        ObjectKind::new("category").with_route_base("categories"),
                        ObjectKind::new("topic"),
                    ],
                )
                .unwrap(),
            ),
        )
    }

    fn setup() -> (MetaHandlers, Arc<InMemoryMetaStore>, Arc<InMemoryMetaStore>) {
        let content = Arc::new(InMemoryMetaStore::new());
        let terms = Arc::new(InMemoryMetaStore::new());
        let handlers = MetaHandlers::new(directory(), MetaStores::new(content.clone(), terms.clone()));
        (handlers, content, terms)
    }

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn get_reads_from_the_resolved_family() {
        let (h, content, terms) = setup();
        content.insert(POST, "color", "blue").unwrap();
        terms.insert(POST, "color", "green").unwrap();

        let articles = h.resolve("articles").unwrap();
        let categories = h.resolve("categories").unwrap();
        assert_eq!(h.get_meta(&articles, &RouteIdentity::single("articles", POST, "color")).unwrap(), "blue");
        assert_eq!(h.get_meta(&categories, &RouteIdentity::single("categories", POST, "color")).unwrap(), "green");
    }

    #[test]
    fn get_missing_key_is_empty() {
        let (h, _, _) = setup();
        let kind = h.resolve("articles").unwrap();
        assert_eq!(h.get_meta(&kind, &RouteIdentity::single("articles", POST, "nope")).unwrap(), "");
    }

    #[test]
    fn update_writes_to_the_resolved_family() {
        let (h, content, terms) = setup();
        let kind = h.resolve("category").unwrap();
        let route = RouteIdentity::single("category", TERM, "icon");
        assert!(h.update_meta(&kind, &route, "star").unwrap());
        assert_eq!(terms.get(TERM, "icon").unwrap().as_deref(), Some("star"));
        assert!(content.is_empty());
        assert!(!h.update_meta(&kind, &route, "star").unwrap());
    }

    #[test]
    fn delete_twice_returns_the_same_noop() {
        let (h, content, _) = setup();
        content.insert(POST, "color", "blue").unwrap();
        let kind = h.resolve("articles").unwrap();
        let route = RouteIdentity::single("articles", POST, "color");
        assert!(h.delete_meta(&kind, &route).unwrap());
        assert!(!h.delete_meta(&kind, &route).unwrap());
        assert!(!h.delete_meta(&kind, &route).unwrap());
    }

    #[test]
    fn unknown_and_empty_bases_are_client_errors() {
        let (h, _, _) = setup();
        assert!(matches!(h.resolve("widgets"), Err(ApiError::CannotDetermineObjectType { .. })));
        let route = RouteIdentity::extract("/wp");
        assert!(matches!(
            h.resolve(&route.collection_base),
            Err(ApiError::CannotDetermineObjectType { .. })
        ));
    }

    // `topic` is both a content kind and a classification kind; the request
    // is rejected rather than defaulting to content.
    #[test]
    fn ambiguous_base_is_a_client_error() {
        let (h, _, _) = setup();
        match h.resolve("topic") {
            Err(ApiError::CannotDetermineObjectType { base }) => assert_eq!(base, "topic"),
            other => panic!("expected a classification error, got {other:?}"),
        }
    }

    #[test]
    fn single_key_handlers_need_a_key() {
        let (h, _, _) = setup();
        let kind = h.resolve("articles").unwrap();
        assert!(matches!(
            h.get_meta(&kind, &RouteIdentity::bulk("articles", POST)),
            Err(ApiError::NoRoute)
        ));
    }

    #[test]
    fn bulk_delete_reports_each_key() {
        let (h, content, _) = setup();
        content.insert(POST, "a", "1").unwrap();
        content.insert(POST, "b", "2").unwrap();

        let kind = h.resolve("articles").unwrap();
        let results = h.delete_bulk(&kind, POST, &keys(&["a", "missing", "b"])).unwrap();
        assert_eq!(
            results,
            vec![BulkOutcome::Deleted(true), BulkOutcome::Deleted(false), BulkOutcome::Deleted(true)]
        );
        assert!(content.is_empty());
    }

    #[test]
    fn bulk_delete_needs_keys() {
        let (h, _, _) = setup();
        let kind = h.resolve("articles").unwrap();
        assert!(matches!(h.delete_bulk(&kind, POST, &[]), Err(ApiError::InvalidKeysArray)));
    }

    #[test]
    fn bulk_delete_isolates_per_key_failures() {
        let inner = InMemoryMetaStore::new();
        inner.insert(TERM, "a", "1").unwrap();
        inner.insert(TERM, "broken", "2").unwrap();
        inner.insert(TERM, "b", "3").unwrap();
        let terms = Arc::new(FlakyStore {
            inner,
            failing: HashSet::from(["broken".to_string()]),
        });
        let h = MetaHandlers::new(
            directory(),
            MetaStores::new(Arc::new(InMemoryMetaStore::new()), terms.clone()),
        );

        let kind = h.resolve("categories").unwrap();
        let results = h.delete_bulk(&kind, TERM, &keys(&["a", "broken", "b"])).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], BulkOutcome::Deleted(true));
        match &results[1] {
            BulkOutcome::Failed(body) => {
                assert_eq!(body.code, "rest_storage_error");
                assert_eq!(body.data.status, 500);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(results[2], BulkOutcome::Deleted(true));
        assert_eq!(terms.inner.get(TERM, "broken").unwrap().as_deref(), Some("2"));
        assert_eq!(terms.inner.get(TERM, "b").unwrap(), None);
    }

    #[test]
    fn bulk_delete_uses_the_resolved_object_for_every_key() {
        let (h, _, terms) = setup();
        terms.insert(TERM, "a", "1").unwrap();
        terms.insert(TERM, "b", "2").unwrap();
        terms.insert(POST, "a", "other object").unwrap();

        let kind = h.resolve("categories").unwrap();
        h.delete_bulk(&kind, TERM, &keys(&["a", "b"])).unwrap();
        assert!(terms.entries(TERM).unwrap().is_empty());
        assert_eq!(terms.get(POST, "a").unwrap().as_deref(), Some("other object"));
    }

    #[test]
    fn bulk_outcome_wire_shape() {
        let outcomes = vec![
            BulkOutcome::Deleted(true),
            BulkOutcome::Failed(ApiError::Storage("x".into()).to_body()),
        ];
        let json = serde_json::to_value(&outcomes).unwrap();
        assert_eq!(json[0], true);
        assert_eq!(json[1]["code"], "rest_storage_error");
    }
}
