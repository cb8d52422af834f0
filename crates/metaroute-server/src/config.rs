use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;

use metaroute_types::ObjectKind;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

/// Server configuration, usually loaded from a TOML file.
///
/// Missing fields take their [`Default`] values, so an empty file yields the
/// stock setup: the `wp/v2` namespace with posts, pages, categories and tags.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Path prefix every meta route is mounted under, without slashes at
    /// either end (e.g. `wp/v2`).
    pub namespace: String,
    /// Upper bound on the number of keys one bulk delete may name.
    pub max_bulk_keys: usize,
    pub content_kinds: Vec<ObjectKind>,
    pub classification_kinds: Vec<ObjectKind>,
    pub tokens: Vec<TokenConfig>,
}

/// A bearer token accepted by [`TokenAuth`](crate::auth::TokenAuth).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token: String,
    pub actor: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub admin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            namespace: "wp/v2".into(),
            max_bulk_keys: 100,
            content_kinds: default_content_kinds(),
            classification_kinds: default_classification_kinds(),
            tokens: Vec::new(),
        }
    }
}

fn default_content_kinds() -> Vec<ObjectKind> {
    vec![
        ObjectKind::new("post")
            .with_route_base("posts")
            .with_capability("edit_post", "edit_post")
            .with_capability("delete_post", "delete_post"),
        ObjectKind::new("page")
            .with_route_base("pages")
            .with_capability("edit_post", "edit_page")
            .with_capability("delete_post", "delete_page"),
    ]
}

fn default_classification_kinds() -> Vec<ObjectKind> {
    vec![
        ObjectKind::new("category")
            .with_route_base("categories")
            .with_capability("edit_terms", "edit_categories")
            .with_capability("delete_terms", "delete_categories"),
        ObjectKind::new("post_tag")
            .with_route_base("tags")
            .with_capability("edit_terms", "edit_post_tags")
            .with_capability("delete_terms", "delete_post_tags"),
    ]
}

impl ServerConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.namespace.is_empty() {
            return Err(ServerError::Config("namespace must not be empty".into()));
        }
        for segment in self.namespace.split('/') {
            let valid = !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
            if !valid {
                return Err(ServerError::Config(format!(
                    "invalid namespace {:?}: segments must be non-empty and contain only [A-Za-z0-9._-]",
                    self.namespace
                )));
            }
        }
        if self.max_bulk_keys == 0 {
            return Err(ServerError::Config("max_bulk_keys must be at least 1".into()));
        }
        let mut seen = HashSet::new();
        for token in &self.tokens {
            if token.token.is_empty() {
                return Err(ServerError::Config(format!("empty token for actor {:?}", token.actor)));
            }
            if !seen.insert(token.token.as_str()) {
                return Err(ServerError::Config(format!("duplicate token for actor {:?}", token.actor)));
            }
        }
        Ok(())
    }
}
