//! The [`KindRegistry`] trait defining the registry interface.

use metaroute_types::ObjectKind;

use crate::error::RegistryResult;

/// Narrow a kind listing to a single route base or internal name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KindFilter {
    /// Kinds whose declared `route_base` equals the value.
    RouteBase(String),
    /// Kinds whose `internal_name` equals the value.
    Name(String),
}

/// Parameters of a registry listing. `None` flags do not filter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KindQuery {
    pub public: Option<bool>,
    pub api_exposed: Option<bool>,
    pub filter: Option<KindFilter>,
}

impl KindQuery {
    /// Public and API-exposed kinds.
    pub fn public_api() -> Self {
        Self {
            public: Some(true),
            api_exposed: Some(true),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: KindFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Returns `true` if `kind` satisfies every constraint of this query.
    pub fn matches(&self, kind: &ObjectKind) -> bool {
        if self.public.is_some_and(|public| kind.is_public != public) {
            return false;
        }
        if self.api_exposed.is_some_and(|exposed| kind.is_api_exposed != exposed) {
            return false;
        }
        match &self.filter {
            None => true,
            Some(KindFilter::RouteBase(base)) => kind.route_base.as_deref() == Some(base.as_str()),
            Some(KindFilter::Name(name)) => kind.internal_name == *name,
        }
    }
}

/// A registry of object kinds for one family.
///
/// Implementations must be thread-safe and reflect live state: every call
/// sees the kinds registered at that moment. Listings preserve registration
/// order.
pub trait KindRegistry: Send + Sync {
    /// List the kinds matching `query`.
    fn list_kinds(&self, query: &KindQuery) -> RegistryResult<Vec<ObjectKind>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_query_excludes_hidden_kinds() {
        let q = KindQuery::public_api();
        assert!(q.matches(&ObjectKind::new("post")));
        assert!(!q.matches(&ObjectKind::new("revision").private()));
        assert!(!q.matches(&ObjectKind::new("nav_menu_item").hidden_from_api()));
    }

    #[test]
    fn default_query_matches_everything() {
        let q = KindQuery::default();
        assert!(q.matches(&ObjectKind::new("revision").private().hidden_from_api()));
    }

    #[test]
    fn route_base_filter_uses_declared_base_only() {
        let q = KindQuery::public_api().with_filter(KindFilter::RouteBase("posts".into()));
        assert!(q.matches(&ObjectKind::new("post").with_route_base("posts")));
        assert!(!q.matches(&ObjectKind::new("posts")));
    }

    #[test]
    fn name_filter() {
        let q = KindQuery::public_api().with_filter(KindFilter::Name("post".into()));
        assert!(q.matches(&ObjectKind::new("post").with_route_base("posts")));
        assert!(!q.matches(&ObjectKind::new("page")));
    }
}
