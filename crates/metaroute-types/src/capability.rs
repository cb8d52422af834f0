//! Generic actions and the abstract capabilities they require.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::KindFamily;

/// A generic mutating action requested through the meta API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Write a meta value.
    Create,
    /// Remove one or more meta values.
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Delete => f.write_str("delete"),
        }
    }
}

/// Abstract capability names looked up in a kind's capability map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstractCapability {
    EditPost,
    DeletePost,
    EditTerms,
    DeleteTerms,
}

impl AbstractCapability {
    /// The abstract capability guarding `action` on objects of `family`.
    pub fn for_action(action: Action, family: KindFamily) -> Self {
        match (action, family) {
            (Action::Create, KindFamily::Content) => Self::EditPost,
            (Action::Delete, KindFamily::Content) => Self::DeletePost,
            (Action::Create, KindFamily::Classification) => Self::EditTerms,
            (Action::Delete, KindFamily::Classification) => Self::DeleteTerms,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EditPost => "edit_post",
            Self::DeletePost => "delete_post",
            Self::EditTerms => "edit_terms",
            Self::DeleteTerms => "delete_terms",
        }
    }
}

impl fmt::Display for AbstractCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
