use std::sync::Arc;

use metaroute_registry::{InMemoryKindRegistry, KindDirectory};
use metaroute_store::InMemoryMetaStore;
use metaroute_types::KindFamily;
use tokio::net::TcpListener;

use crate::auth::{AuthProvider, TokenAuth};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{MetaHandlers, MetaStores};
use crate::router::{build_router, AppState};

/// Build a kind directory from the kinds listed in `config`, backed by
/// in-memory registries.
pub fn directory_from_config(config: &ServerConfig) -> ServerResult<KindDirectory> {
    let content = InMemoryKindRegistry::with_kinds(KindFamily::Content, config.content_kinds.iter().cloned())?;
    let classification =
        InMemoryKindRegistry::with_kinds(KindFamily::Classification, config.classification_kinds.iter().cloned())?;
    Ok(KindDirectory::new(Arc::new(content), Arc::new(classification)))
}

/// metaroute HTTP server.
pub struct MetaServer {
    config: ServerConfig,
    state: AppState,
}

impl MetaServer {
    /// A server with in-memory registries seeded from `config`, empty
    /// in-memory stores, and bearer-token authentication.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let directory = directory_from_config(&config)?;
        let stores = MetaStores::new(Arc::new(InMemoryMetaStore::new()), Arc::new(InMemoryMetaStore::new()));
        let auth = Arc::new(TokenAuth::new(&config.tokens));
        Self::with_collaborators(config, directory, stores, auth)
    }

    /// A server over caller-provided registry, storage and auth
    /// collaborators.
    pub fn with_collaborators(
        config: ServerConfig,
        directory: KindDirectory,
        stores: MetaStores,
        auth: Arc<dyn AuthProvider>,
    ) -> ServerResult<Self> {
        config.validate()?;
        let state = AppState {
            handlers: Arc::new(MetaHandlers::new(directory, stores)),
            auth,
            max_bulk_keys: config.max_bulk_keys,
        };
        Ok(Self { config, state })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        build_router(self.state.clone(), &self.config.namespace)
    }

    /// Start serving requests until ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router()?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            namespace = %self.config.namespace,
            "metaroute server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use metaroute_types::ObjectKind;

    use super::*;

    #[test]
    fn server_construction() {
        let server = MetaServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr, "127.0.0.1:8080".parse::<std::net::SocketAddr>().unwrap());
        assert_eq!(server.state().max_bulk_keys, 100);
    }

    #[test]
    fn router_builds() {
        let server = MetaServer::new(ServerConfig::default()).unwrap();
        let _router = server.router().unwrap();
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ServerConfig {
            namespace: String::new(),
            ..Default::default()
        };
        assert!(matches!(MetaServer::new(config), Err(ServerError::Config(_))));
    }

    #[test]
    fn directory_reflects_config_kinds() {
        let config = ServerConfig {
            content_kinds: vec![ObjectKind::new("book").with_route_base("books")],
            classification_kinds: vec![],
            ..Default::default()
        };
        let dir = directory_from_config(&config).unwrap();
        assert_eq!(dir.classify("books").family(), Some(KindFamily::Content));
        assert!(dir.classify("posts").is_unknown());
    }

    #[test]
    fn unnamed_config_kind_is_rejected() {
        let config = ServerConfig {
            content_kinds: vec![ObjectKind::new("")],
            ..Default::default()
        };
        assert!(matches!(directory_from_config(&config), Err(ServerError::Registry(_))));
    }
}
