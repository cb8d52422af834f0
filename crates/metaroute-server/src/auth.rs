use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use metaroute_types::ObjectId;

use crate::config::TokenConfig;
use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub capabilities: BTreeSet<String>,
    pub is_admin: bool,
    pub is_anonymous: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            name: "anonymous".into(),
            capabilities: BTreeSet::new(),
            is_admin: false,
            is_anonymous: true,
        }
    }

    pub fn user<I, S>(name: impl Into<String>, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            is_admin: false,
            is_anonymous: false,
        }
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: BTreeSet::new(),
            is_admin: true,
            is_anonymous: false,
        }
    }

    pub fn holds(&self, capability: &str) -> bool {
        self.is_admin || self.capabilities.contains(capability)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read `Authorization: Bearer <token>`; anything else is anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }
}

/// Authentication and capability checks.
///
/// `current_actor_can` receives the object id so implementations may make
/// object-scoped decisions (e.g. authors editing only their own posts).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
    async fn current_actor_can(&self, identity: &Identity, capability: &str, object_id: ObjectId) -> ServerResult<bool>;
}

/// Grants every capability. For development and tests only.
pub struct AllowAllAuth;

#[async_trait]
impl AuthProvider for AllowAllAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Bearer(token) => {
                let prefix: String = token.chars().take(8).collect();
                Ok(Identity::admin(format!("bearer:{prefix}")))
            }
            Credentials::Anonymous => Ok(Identity::admin("anonymous")),
        }
    }

    async fn current_actor_can(&self, _identity: &Identity, _capability: &str, _object_id: ObjectId) -> ServerResult<bool> {
        Ok(true)
    }
}

/// Static bearer-token table.
///
/// Unknown tokens authenticate as anonymous, and anonymous actors hold no
/// capabilities.
pub struct TokenAuth {
    tokens: HashMap<String, Identity>,
}

impl TokenAuth {
    pub fn new(tokens: &[TokenConfig]) -> Self {
        let tokens = tokens
            .iter()
            .map(|t| {
                let identity = if t.admin {
                    Identity::admin(t.actor.clone())
                } else {
                    Identity::user(t.actor.clone(), t.capabilities.iter().cloned())
                };
                (t.token.clone(), identity)
            })
            .collect();
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl AuthProvider for TokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Bearer(token) => match self.tokens.get(token) {
                Some(identity) => Ok(identity.clone()),
                None => {
                    tracing::debug!("unknown bearer token, treating request as anonymous");
                    Ok(Identity::anonymous())
                }
            },
            Credentials::Anonymous => Ok(Identity::anonymous()),
        }
    }

    async fn current_actor_can(&self, identity: &Identity, capability: &str, _object_id: ObjectId) -> ServerResult<bool> {
        if capability.is_empty() {
            return Err(ServerError::AuthFailed("empty capability".into()));
        }
        Ok(!identity.is_anonymous && identity.holds(capability))
    }
}
