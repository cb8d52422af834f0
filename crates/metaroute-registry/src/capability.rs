//! Capability resolution for mutating actions.
//!
//! `(action, family)` picks an abstract capability (`edit_post`,
//! `delete_terms`, ...); the resolved kind's capability map turns it into
//! the concrete capability the actor must hold. Every gap denies.

use std::fmt;

use metaroute_types::Action;
use tracing::debug;

use crate::classify::{KindResolution, UnknownReason};

/// Why no capability could grant an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// The collection base did not resolve to exactly one kind.
    UnresolvedKind(UnknownReason),
    /// The kind declares no capability for the action.
    NoCapability { kind: String, action: Action },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedKind(reason) => write!(f, "unresolved kind: {reason}"),
            Self::NoCapability { kind, action } => {
                write!(f, "kind `{kind}` declares no capability for {action}")
            }
        }
    }
}

/// What an actor needs to perform an action on a resolved kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapabilityRequirement {
    Required { kind: String, capability: String },
    Denied(DenyReason),
}

/// The concrete capability required to perform `action` on objects of the
/// kind a collection base resolved to.
///
/// Takes an existing resolution so callers that classify once per request
/// gate and dispatch against the same kind.
pub fn required_capability(resolution: &KindResolution, action: Action) -> CapabilityRequirement {
    let kind = match resolution {
        KindResolution::Content(kind) | KindResolution::Classification(kind) => kind,
        KindResolution::Unknown(reason) => {
            return CapabilityRequirement::Denied(DenyReason::UnresolvedKind(reason.clone()));
        }
    };
    match kind.capability_for(action) {
        Some(capability) => {
            debug!(kind = %kind.internal_name, %action, capability, "resolved required capability");
            CapabilityRequirement::Required {
                kind: kind.internal_name.clone(),
                capability: capability.to_string(),
            }
        }
        None => CapabilityRequirement::Denied(DenyReason::NoCapability {
            kind: kind.internal_name.clone(),
            action,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use metaroute_types::{KindFamily, ObjectKind};

    use super::*;
    use crate::directory::KindDirectory;
    use crate::memory::InMemoryKindRegistry;

    fn directory() -> KindDirectory {
        let content = InMemoryKindRegistry::with_kinds(
            KindFamily::Content,
            [
                ObjectKind::new("post")
                    .with_route_base("posts")
                    .with_capability("edit_post", "edit_post")
                    .with_capability("delete_post", "delete_post"),
                ObjectKind::new("book")
                    .with_route_base("books")
                    .with_capability("edit_post", "edit_book"),
            ],
        )
        .unwrap();
        let classification = InMemoryKindRegistry::with_kinds(
            KindFamily::Classification,
            [ObjectKind::new("category")
                .with_route_base("categories")
                .with_capability("edit_terms", "manage_categories")
                .with_capability("delete_terms", "manage_categories")],
        )
        .unwrap();
        KindDirectory::new(Arc::new(content), Arc::new(classification))
    }

    fn capability(dir: &KindDirectory, base: &str, action: Action) -> Option<String> {
        match required_capability(&dir.classify(base), action) {
            CapabilityRequirement::Required { capability, .. } => Some(capability),
            CapabilityRequirement::Denied(_) => None,
        }
    }

    #[test]
    fn content_capabilities() {
        let dir = directory();
        assert_eq!(capability(&dir, "posts", Action::Create).as_deref(), Some("edit_post"));
        assert_eq!(capability(&dir, "posts", Action::Delete).as_deref(), Some("delete_post"));
        assert_eq!(capability(&dir, "books", Action::Create).as_deref(), Some("edit_book"));
    }

    #[test]
    fn classification_capabilities() {
        let dir = directory();
        assert_eq!(capability(&dir, "categories", Action::Create).as_deref(), Some("manage_categories"));
        assert_eq!(capability(&dir, "category", Action::Delete).as_deref(), Some("manage_categories"));
    }

    #[test]
    fn missing_capability_denies() {
        let dir = directory();
        assert_eq!(
            required_capability(&dir.classify("books"), Action::Delete),
            CapabilityRequirement::Denied(DenyReason::NoCapability {
                kind: "book".into(),
                action: Action::Delete,
            })
        );
    }

    #[test]
    fn unknown_base_denies() {
        let dir = directory();
        assert!(matches!(
            required_capability(&dir.classify("widgets"), Action::Create),
            CapabilityRequirement::Denied(DenyReason::UnresolvedKind(UnknownReason::NoMatch))
        ));
        assert!(matches!(
            required_capability(&dir.classify(""), Action::Delete),
            CapabilityRequirement::Denied(DenyReason::UnresolvedKind(UnknownReason::EmptyBase))
        ));
    }
}
