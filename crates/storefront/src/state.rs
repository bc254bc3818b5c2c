//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::middleware::{MokaStore, create_session_store};
use crate::models::CartRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The config and catalog are
/// read-only after startup; per-visitor carts live in the [`CartRegistry`],
/// keyed by the sessions in the [`MokaStore`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    sessions: MokaStore,
    carts: CartRegistry,
}

impl AppState {
    /// Create a new application state from an already-loaded catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let sessions = create_session_store(&config);
        let carts = CartRegistry::new(config.max_sessions, config.session_idle());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                sessions,
                carts,
            }),
        }
    }

    /// Load the configured catalog and build the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get the session store backing the session layer.
    #[must_use]
    pub fn session_store(&self) -> &MokaStore {
        &self.inner.sessions
    }

    /// Get the per-visitor cart registry.
    #[must_use]
    pub fn carts(&self) -> &CartRegistry {
        &self.inner.carts
    }
}
