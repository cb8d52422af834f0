//! Collection base classification.

use std::fmt;

use metaroute_types::KindFamily;
use serde::Serialize;
use tracing::{debug, warn};

use crate::directory::{ExposedKind, KindDirectory};
use crate::error::RegistryResult;
use crate::traits::KindFilter;

/// Why a collection base could not be resolved to a kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnknownReason {
    EmptyBase,
    NoMatch,
    /// The base names an exposed kind in both registries.
    Ambiguous {
        content: String,
        classification: String,
    },
    RegistryUnavailable {
        detail: String,
    },
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBase => f.write_str("empty collection base"),
            Self::NoMatch => f.write_str("no exposed kind matches"),
            Self::Ambiguous {
                content,
                classification,
            } => write!(
                f,
                "matches content kind `{content}` and classification kind `{classification}`"
            ),
            Self::RegistryUnavailable { detail } => write!(f, "registry unavailable: {detail}"),
        }
    }
}

/// The outcome of classifying a collection base.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "family", content = "detail", rename_all = "snake_case")]
pub enum KindResolution {
    Content(ExposedKind),
    Classification(ExposedKind),
    Unknown(UnknownReason),
}

impl KindResolution {
    pub fn family(&self) -> Option<KindFamily> {
        match self {
            Self::Content(_) => Some(KindFamily::Content),
            Self::Classification(_) => Some(KindFamily::Classification),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl KindDirectory {
    /// Resolve a collection base to the kind it names.
    ///
    /// Within each registry the declared route base is checked before the
    /// internal name, and the first match in registration order wins. Both
    /// registries are always consulted; a base found in both is
    /// [`UnknownReason::Ambiguous`].
    pub fn classify(&self, base: &str) -> KindResolution {
        if base.is_empty() {
            return KindResolution::Unknown(UnknownReason::EmptyBase);
        }

        let content = match self.find_in(KindFamily::Content, base) {
            Ok(found) => found,
            Err(e) => return unavailable(base, e),
        };
        let classification = match self.find_in(KindFamily::Classification, base) {
            Ok(found) => found,
            Err(e) => return unavailable(base, e),
        };

        let resolution = match (content, classification) {
            (Some(content), Some(classification)) => {
                warn!(
                    base,
                    content = %content.internal_name,
                    classification = %classification.internal_name,
                    "collection base is registered in both registries"
                );
                KindResolution::Unknown(UnknownReason::Ambiguous {
                    content: content.internal_name,
                    classification: classification.internal_name,
                })
            }
            (Some(kind), None) => KindResolution::Content(kind),
            (None, Some(kind)) => KindResolution::Classification(kind),
            (None, None) => KindResolution::Unknown(UnknownReason::NoMatch),
        };
        debug!(base, family = ?resolution.family(), "classified collection base");
        resolution
    }

    fn find_in(&self, family: KindFamily, base: &str) -> RegistryResult<Option<ExposedKind>> {
        let by_base = self.public_api_kinds(family, Some(KindFilter::RouteBase(base.to_string())))?;
        if let Some(kind) = by_base.into_iter().next() {
            return Ok(Some(kind));
        }
        let by_name = self.public_api_kinds(family, Some(KindFilter::Name(base.to_string())))?;
        Ok(by_name.into_iter().next())
    }
}

fn unavailable(base: &str, err: crate::error::RegistryError) -> KindResolution {
    warn!(base, error = %err, "kind registry could not be consulted");
    KindResolution::Unknown(UnknownReason::RegistryUnavailable {
        detail: err.to_string(),
    })
}
