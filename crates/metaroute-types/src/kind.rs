//! Registered object kinds.
//!
//! A kind is either a content kind (posts, pages, custom content types) or a
//! classification kind (categories, tags, custom taxonomies). Kinds are owned
//! by an external registry; this crate only describes their shape.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which registry a kind belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindFamily {
    /// Primary content objects (posts, pages).
    Content,
    /// Taxonomy objects (categories, tags).
    Classification,
}

impl KindFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Classification => "classification",
        }
    }
}

impl fmt::Display for KindFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered content or classification kind.
///
/// `capability_map` maps abstract capability names (`edit_post`,
/// `delete_terms`, ...) to the concrete capability an actor must hold for
/// objects of this kind. A missing or empty entry means nobody may perform
/// that action through the meta API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectKind {
    pub internal_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_base: Option<String>,
    #[serde(default)]
    pub capability_map: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default = "default_true")]
    pub is_api_exposed: bool,
}

fn default_true() -> bool {
    true
}

impl ObjectKind {
    /// A public, API-exposed kind with no route base override and no
    /// capabilities.
    pub fn new(internal_name: impl Into<String>) -> Self {
        Self {
            internal_name: internal_name.into(),
            route_base: None,
            capability_map: BTreeMap::new(),
            is_public: true,
            is_api_exposed: true,
        }
    }

    pub fn with_route_base(mut self, base: impl Into<String>) -> Self {
        self.route_base = Some(base.into());
        self
    }

    pub fn with_capability(mut self, abstract_name: impl Into<String>, concrete: impl Into<String>) -> Self {
        self.capability_map.insert(abstract_name.into(), concrete.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn hidden_from_api(mut self) -> Self {
        self.is_api_exposed = false;
        self
    }

    /// The collection base this kind is served under.
    ///
    /// A non-empty `route_base` wins; otherwise the internal name is used.
    /// Returns `""` when both are empty.
    pub fn resolved_route_base(&self) -> &str {
        match self.route_base.as_deref() {
            Some(base) if !base.is_empty() => base,
            _ => &self.internal_name,
        }
    }

    /// Public and externally exposed.
    pub fn is_exposed(&self) -> bool {
        self.is_public && self.is_api_exposed
    }

    /// Concrete capability for an abstract name, ignoring empty entries.
    pub fn capability(&self, abstract_name: &str) -> Option<&str> {
        self.capability_map
            .get(abstract_name)
            .map(String::as_str)
            .filter(|cap| !cap.is_empty())
    }
}
