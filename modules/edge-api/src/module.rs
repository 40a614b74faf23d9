//! Wiring for the edge API module.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::api::rest::handlers::SourceTag;
use crate::config::{EdgeApiConfig, StoreBackend};
use crate::domain::service::StateService;
use crate::domain::store::{StateStore, StoreError};
use crate::infra::store::{InMemoryStateStore, RemoteStateStore};

/// Edge API module: the arithmetic routes plus the current-value routes
/// backed by one [`StateStore`].
pub struct EdgeApiModule {
    service: Arc<StateService>,
    source: SourceTag,
}

impl EdgeApiModule {
    /// Builds the configured store and the services on top of it.
    ///
    /// # Errors
    /// Returns [`StoreError::Configuration`] when the remote backend is
    /// selected but its settings are unusable.
    pub fn from_config(cfg: EdgeApiConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn StateStore> = match cfg.store.backend {
            StoreBackend::Memory => Arc::new(InMemoryStateStore::new()),
            StoreBackend::Remote => Arc::new(RemoteStateStore::new(cfg.store.remote)?),
        };
        info!(backend = store.backend(), "edge_api state store ready");
        Ok(Self::with_store(store, cfg.source_tag.as_deref()))
    }

    /// Builds the module around an already constructed store.
    #[must_use]
    pub fn with_store(store: Arc<dyn StateStore>, source_tag: Option<&str>) -> Self {
        Self {
            service: Arc::new(StateService::new(store)),
            source: SourceTag::new(source_tag),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.service.backend()
    }

    /// Mounts the module routes on `router`.
    #[must_use]
    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering edge_api REST routes");
        crate::api::rest::routes::register_routes(
            router,
            Arc::clone(&self.service),
            self.source.clone(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::RemoteStoreConfig;

    #[test]
    fn default_config_uses_memory_store() {
        let module = EdgeApiModule::from_config(EdgeApiConfig::default()).unwrap();
        assert_eq!(module.backend(), "memory");
    }

    #[test]
    fn remote_backend_without_url_is_rejected() {
        let mut cfg = EdgeApiConfig::default();
        cfg.store.backend = StoreBackend::Remote;
        let res = EdgeApiModule::from_config(cfg);
        assert!(matches!(res, Err(StoreError::Configuration(_))));
    }

    #[test]
    fn remote_backend_with_url_is_built() {
        let mut cfg = EdgeApiConfig::default();
        cfg.store.backend = StoreBackend::Remote;
        cfg.store.remote = RemoteStoreConfig {
            base_url: Some("https://kv.example.com".to_owned()),
            ..RemoteStoreConfig::default()
        };
        let module = EdgeApiModule::from_config(cfg).unwrap();
        assert_eq!(module.backend(), "remote");
    }
}
