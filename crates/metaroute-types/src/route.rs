//! Route identities.
//!
//! A [`RouteIdentity`] names the object and meta key a single request
//! targets. The HTTP layer builds it from named route captures; the
//! positional [`RouteIdentity::extract`] exists for callers that only hold a
//! raw path of the shape `/{ns}/{ver}/{collection}/{id}/meta[/{key}]`.

use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

const BASE_SEGMENT: usize = 3;
const ID_SEGMENT: usize = 4;
const KEY_SEGMENT: usize = 6;

/// `(collection base, object id, meta key)` of one request.
///
/// `meta_key` is `None` for bulk operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteIdentity {
    pub collection_base: String,
    pub object_id: ObjectId,
    pub meta_key: Option<String>,
}

impl RouteIdentity {
    pub fn new(collection_base: impl Into<String>, object_id: ObjectId, meta_key: Option<String>) -> Self {
        Self {
            collection_base: collection_base.into(),
            object_id,
            meta_key,
        }
    }

    /// Identity of a single-key route.
    pub fn single(collection_base: impl Into<String>, object_id: ObjectId, key: impl Into<String>) -> Self {
        Self::new(collection_base, object_id, Some(key.into()))
    }

    /// Identity of a bulk route.
    pub fn bulk(collection_base: impl Into<String>, object_id: ObjectId) -> Self {
        Self::new(collection_base, object_id, None)
    }

    /// Read the identity from fixed positional segments of `path`.
    ///
    /// Splitting `/wp/v2/articles/57244/meta/color` on `/` yields
    /// `["", "wp", "v2", "articles", "57244", "meta", "color"]`: segment 3 is
    /// the collection base, 4 the object id, 6 the meta key. Absent segments
    /// produce an empty base, [`ObjectId::none`], or no key. Never fails.
    pub fn extract(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').collect();
        let base = segments.get(BASE_SEGMENT).copied().unwrap_or_default();
        let id = segments
            .get(ID_SEGMENT)
            .map(|s| ObjectId::from_segment(s))
            .unwrap_or_default();
        let key = segments
            .get(KEY_SEGMENT)
            .filter(|k| !k.is_empty())
            .map(|k| k.to_string());
        Self::new(base, id, key)
    }

    /// The meta key, or `""` for bulk identities.
    pub fn meta_key(&self) -> &str {
        self.meta_key.as_deref().unwrap_or_default()
    }
}
