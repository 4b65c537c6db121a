//! Menu browsing backed by the catalog provider.
//!
//! Categories, active products, active add-ons and the store settings are
//! cached with `moka` for the configured TTL. A failed load is not cached and
//! not retried: the caller surfaces it and the customer may [`refresh`].
//!
//! [`refresh`]: MenuService::refresh

use std::sync::Arc;
use std::time::Duration;

use cardapio_core::providers::{CatalogProvider, SettingsProvider};
use cardapio_core::{
    Addon, AddonId, Category, Product, ProductId, ProviderError, SelectedAddon, StoreSettings,
};
use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, instrument};

/// Cache key for menu data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Menu,
    Settings,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Menu(Arc<Menu>),
    Settings(Box<StoreSettings>),
}

/// A category with its products, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSection {
    pub category: Category,
    pub products: Vec<Product>,
}

/// The browsable menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Menu {
    sections: Vec<MenuSection>,
    addons: Vec<Addon>,
}

impl Menu {
    /// Group `products` under `categories`.
    ///
    /// Inactive products and add-ons are dropped. Categories without products
    /// are omitted, as are products whose category is unknown.
    #[must_use]
    pub fn new(
        mut categories: Vec<Category>,
        mut products: Vec<Product>,
        mut addons: Vec<Addon>,
    ) -> Self {
        categories.sort_by_key(|c| c.sort_order);
        products.retain(|p| p.active);
        products.sort_by_key(|p| p.sort_order);
        addons.retain(|a| a.active);

        let sections = categories
            .into_iter()
            .map(|category| {
                let products = products
                    .iter()
                    .filter(|p| p.category_id == category.id)
                    .cloned()
                    .collect();
                MenuSection { category, products }
            })
            .filter(|section: &MenuSection| !section.products.is_empty())
            .collect();

        Self { sections, addons }
    }

    #[must_use]
    pub fn sections(&self) -> &[MenuSection] {
        &self.sections
    }

    /// Add-ons offered with every product, ordered by name.
    #[must_use]
    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look up a listed product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.sections
            .iter()
            .flat_map(|s| s.products.iter())
            .find(|p| p.id == id)
    }

    /// Snapshot the chosen add-ons in menu order, ignoring unknown ids.
    #[must_use]
    pub fn resolve_addons(&self, ids: &[AddonId]) -> Vec<SelectedAddon> {
        self.addons
            .iter()
            .filter(|a| ids.contains(&a.id))
            .map(|a| SelectedAddon {
                id: a.id,
                name: a.name.clone(),
                price: a.price,
            })
            .collect()
    }
}

// =============================================================================
// MenuService
// =============================================================================

/// Cached access to the menu and store settings.
pub struct MenuService<P> {
    provider: P,
    cache: Cache<CacheKey, CacheValue>,
}

impl<P> MenuService<P>
where
    P: CatalogProvider + SettingsProvider + Sync,
{
    /// Create a service whose entries live for `ttl`.
    #[must_use]
    pub fn new(provider: P, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(16).time_to_live(ttl).build();
        Self { provider, cache }
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The current menu.
    ///
    /// # Errors
    ///
    /// Returns the provider error if any of the three lists fails to load.
    #[instrument(skip(self))]
    pub async fn menu(&self) -> Result<Arc<Menu>, ProviderError> {
        if let Some(CacheValue::Menu(menu)) = self.cache.get(&CacheKey::Menu).await {
            debug!("Menu cache hit");
            return Ok(menu);
        }

        let (categories, products, addons) = tokio::try_join!(
            self.provider.categories(),
            self.provider.active_products(),
            self.provider.active_addons(),
        )?;

        let menu = Arc::new(Menu::new(categories, products, addons));
        debug!(sections = menu.sections().len(), addons = menu.addons().len(), "Menu loaded");
        self.cache
            .insert(CacheKey::Menu, CacheValue::Menu(Arc::clone(&menu)))
            .await;
        Ok(menu)
    }

    /// The store settings row.
    ///
    /// # Errors
    ///
    /// Returns the provider error if the settings cannot be loaded.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<StoreSettings, ProviderError> {
        if let Some(CacheValue::Settings(settings)) = self.cache.get(&CacheKey::Settings).await {
            return Ok(*settings);
        }

        let settings = self.provider.store_settings().await?;
        debug!(is_open = settings.is_open, "Store settings loaded");
        self.cache
            .insert(CacheKey::Settings, CacheValue::Settings(Box::new(settings.clone())))
            .await;
        Ok(settings)
    }

    /// Drop cached data so the next call reloads it.
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cardapio_core::{CategoryId, Price, SettingsId};

    use super::*;

    pub(crate) fn category(name: &str, sort_order: i32) -> Category {
        Category {
            id: CategoryId::generate(),
            name: name.to_string(),
            sort_order,
        }
    }

    pub(crate) fn product(category: &Category, name: &str, cents: i64, sort_order: i32) -> Product {
        Product {
            id: ProductId::generate(),
            category_id: category.id,
            name: name.to_string(),
            description: String::new(),
            price: Price::from_cents(cents),
            image_ref: String::new(),
            active: true,
            sort_order,
        }
    }

    pub(crate) fn addon(name: &str, cents: i64) -> Addon {
        Addon {
            id: AddonId::generate(),
            name: name.to_string(),
            price: Price::from_cents(cents),
            active: true,
        }
    }

    pub(crate) fn open_settings() -> StoreSettings {
        StoreSettings {
            id: SettingsId::generate(),
            store_name: "Açaí da Praça".to_string(),
            store_address: "Rua A, 10".to_string(),
            is_open: true,
            delivery_time_label: "40-60 min".to_string(),
            delivery_fee: Price::from_cents(500),
            whatsapp_destination: "5521999990000".to_string(),
        }
    }

    /// In-memory provider counting catalog loads.
    pub(crate) struct StaticCatalog {
        pub(crate) categories: Vec<Category>,
        pub(crate) products: Vec<Product>,
        pub(crate) addons: Vec<Addon>,
        pub(crate) settings: StoreSettings,
        pub(crate) loads: AtomicUsize,
        pub(crate) fail: bool,
    }

    impl StaticCatalog {
        pub(crate) fn new() -> Self {
            let acai = category("Açaí", 1);
            let drinks = category("Bebidas", 2);
            Self {
                products: vec![
                    product(&acai, "Açaí 500ml", 1800, 2),
                    product(&acai, "Açaí 300ml", 1200, 1),
                ],
                categories: vec![drinks, acai, category("Vazia", 0)],
                addons: vec![addon("Granola", 250), addon("Leite condensado", 300)],
                settings: open_settings(),
                loads: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    impl CatalogProvider for StaticCatalog {
        async fn categories(&self) -> Result<Vec<Category>, ProviderError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::fetch("categories", "offline"));
            }
            Ok(self.categories.clone())
        }

        async fn active_products(&self) -> Result<Vec<Product>, ProviderError> {
            Ok(self.products.clone())
        }

        async fn active_addons(&self) -> Result<Vec<Addon>, ProviderError> {
            Ok(self.addons.clone())
        }
    }

    impl SettingsProvider for StaticCatalog {
        async fn store_settings(&self) -> Result<StoreSettings, ProviderError> {
            Ok(self.settings.clone())
        }
    }

    #[test]
    fn test_menu_groups_by_category_and_drops_empty() {
        let catalog = StaticCatalog::new();
        let menu = Menu::new(catalog.categories, catalog.products, catalog.addons);

        let names: Vec<_> = menu.sections().iter().map(|s| s.category.name.as_str()).collect();
        assert_eq!(names, ["Açaí"]);

        let products: Vec<_> = menu.sections()[0]
            .products
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(products, ["Açaí 300ml", "Açaí 500ml"]);
    }

    #[test]
    fn test_menu_hides_inactive_records() {
        let acai = category("Açaí", 0);
        let mut hidden = product(&acai, "Antigo", 1000, 0);
        hidden.active = false;
        let mut off = addon("Paçoca", 200);
        off.active = false;

        let menu = Menu::new(vec![acai], vec![hidden.clone()], vec![off]);
        assert!(menu.is_empty());
        assert!(menu.addons().is_empty());
        assert!(menu.product(hidden.id).is_none());
    }

    #[test]
    fn test_resolve_addons_in_menu_order() {
        let catalog = StaticCatalog::new();
        let granola = catalog.addons[0].id;
        let leite = catalog.addons[1].id;
        let menu = Menu::new(catalog.categories, catalog.products, catalog.addons);

        let chosen = menu.resolve_addons(&[leite, AddonId::generate(), granola]);
        let names: Vec<_> = chosen.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Granola", "Leite condensado"]);
        assert_eq!(chosen[0].price, Price::from_cents(250));
    }

    #[tokio::test]
    async fn test_menu_is_cached_until_refresh() {
        let service = MenuService::new(StaticCatalog::new(), Duration::from_secs(60));

        let first = service.menu().await.unwrap();
        let second = service.menu().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.provider().loads.load(Ordering::SeqCst), 1);

        service.refresh();
        service.menu().await.unwrap();
        assert_eq!(service.provider().loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let mut catalog = StaticCatalog::new();
        catalog.fail = true;
        let service = MenuService::new(catalog, Duration::from_secs(60));

        assert!(matches!(
            service.menu().await,
            Err(ProviderError::ExternalFetchFailure { .. })
        ));
        assert!(service.menu().await.is_err());
        assert_eq!(service.provider().loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_settings_are_cached() {
        let service = MenuService::new(StaticCatalog::new(), Duration::from_secs(60));
        let settings = service.settings().await.unwrap();
        assert!(settings.is_open);
        assert_eq!(service.settings().await.unwrap(), settings);
    }
}
