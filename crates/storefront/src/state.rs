//! Application state shared across sessions.

use std::sync::Arc;

use cardapio_backend::{BackendConfig, BackendError, SupabaseClient};
use cardapio_core::providers::{CatalogProvider, SettingsProvider};

use crate::config::StorefrontConfig;
use crate::menu::MenuService;
use crate::session::ShoppingSession;

/// Application state shared by every shopping session.
///
/// Cheaply cloneable via `Arc`. Sessions themselves are not shared: each
/// visitor gets its own [`ShoppingSession`].
pub struct AppState<P> {
    inner: Arc<AppStateInner<P>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<P> {
    config: StorefrontConfig,
    menu: MenuService<P>,
}

impl<P> AppState<P>
where
    P: CatalogProvider + SettingsProvider + Sync,
{
    /// Create state over any catalog provider.
    #[must_use]
    pub fn new(config: StorefrontConfig, provider: P) -> Self {
        let menu = MenuService::new(provider, config.menu_cache_ttl);
        Self {
            inner: Arc::new(AppStateInner { config, menu }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn menu(&self) -> &MenuService<P> {
        &self.inner.menu
    }

    /// Start a new visit with an empty cart.
    #[must_use]
    pub fn new_session(&self) -> ShoppingSession {
        ShoppingSession::new()
    }
}

impl AppState<SupabaseClient> {
    /// Create state backed by the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn connect(
        config: StorefrontConfig,
        backend: &BackendConfig,
    ) -> Result<Self, BackendError> {
        let client = SupabaseClient::new(backend)?;
        Ok(Self::new(config, client))
    }
}
