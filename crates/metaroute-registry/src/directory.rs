//! The registry adapter: a read-only view over both kind registries.

use std::collections::BTreeMap;
use std::sync::Arc;

use metaroute_types::{AbstractCapability, Action, KindFamily, ObjectKind};
use serde::Serialize;

use crate::error::RegistryResult;
use crate::traits::{KindFilter, KindQuery, KindRegistry};

/// A public, API-exposed kind as the meta API sees it.
///
/// The concrete capability for each [`Action`] is resolved once, when the
/// view is built, from the kind's abstract capability map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExposedKind {
    pub family: KindFamily,
    pub internal_name: String,
    /// Declared route base, or the internal name when none is declared.
    pub route_base: String,
    capabilities: BTreeMap<Action, String>,
}

impl ExposedKind {
    pub fn from_kind(family: KindFamily, kind: &ObjectKind) -> Self {
        let capabilities = [Action::Create, Action::Delete]
            .into_iter()
            .filter_map(|action| {
                let abstract_cap = AbstractCapability::for_action(action, family);
                kind.capability(abstract_cap.as_str())
                    .map(|concrete| (action, concrete.to_string()))
            })
            .collect();
        Self {
            family,
            internal_name: kind.internal_name.clone(),
            route_base: kind.resolved_route_base().to_string(),
            capabilities,
        }
    }

    /// The concrete capability required to perform `action`, if any.
    pub fn capability_for(&self, action: Action) -> Option<&str> {
        self.capabilities.get(&action).map(String::as_str)
    }
}

/// Both kind registries behind one handle.
///
/// Cheap to clone. Holds no state of its own: every listing goes to the
/// registries, so registrations made after startup are visible immediately.
#[derive(Clone)]
pub struct KindDirectory {
    content: Arc<dyn KindRegistry>,
    classification: Arc<dyn KindRegistry>,
}

impl KindDirectory {
    pub fn new(content: Arc<dyn KindRegistry>, classification: Arc<dyn KindRegistry>) -> Self {
        Self {
            content,
            classification,
        }
    }

    pub fn registry(&self, family: KindFamily) -> &dyn KindRegistry {
        match family {
            KindFamily::Content => self.content.as_ref(),
            KindFamily::Classification => self.classification.as_ref(),
        }
    }

    /// Public, API-exposed kinds of `family`, optionally narrowed by `filter`.
    pub fn public_api_kinds(&self, family: KindFamily, filter: Option<KindFilter>) -> RegistryResult<Vec<ExposedKind>> {
        let query = KindQuery {
            filter,
            ..KindQuery::public_api()
        };
        Ok(self
            .registry(family)
            .list_kinds(&query)?
            .iter()
            .map(|kind| ExposedKind::from_kind(family, kind))
            .collect())
    }

    /// Every public, API-exposed kind: content kinds first, then
    /// classification kinds, each in registration order.
    pub fn all_public_api_kinds(&self) -> RegistryResult<Vec<ExposedKind>> {
        let mut kinds = self.public_api_kinds(KindFamily::Content, None)?;
        kinds.extend(self.public_api_kinds(KindFamily::Classification, None)?);
        Ok(kinds)
    }
}

impl std::fmt::Debug for KindDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindDirectory").finish_non_exhaustive()
    }
}
