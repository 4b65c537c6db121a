//! Catalog and settings tables.
//!
//! The storefront reads through [`CatalogProvider`] and [`SettingsProvider`]
//! on a plain [`SupabaseClient`]. The back office writes through
//! [`SupabaseCatalogStore`], which should wrap a client carrying the admin's
//! access token so row-level security lets the writes through.

use cardapio_core::providers::{CatalogAdminStore, CatalogProvider, SettingsProvider};
use cardapio_core::{
    Addon, AddonDraft, AddonId, Category, CategoryDraft, CategoryId, Product, ProductDraft,
    ProductId, ProviderError, SettingsDraft, SettingsId, StoreSettings,
};
use tracing::{info, instrument};

use crate::client::SupabaseClient;

pub const CATEGORIES_TABLE: &str = "categories";
pub const PRODUCTS_TABLE: &str = "products";
pub const ADDONS_TABLE: &str = "addons";
pub const SETTINGS_TABLE: &str = "store_settings";

const BY_SORT_ORDER: (&str, &str) = ("order", "sort_order");
const BY_NAME: (&str, &str) = ("order", "name");
const ACTIVE_ONLY: (&str, &str) = ("active", "eq.true");

impl CatalogProvider for SupabaseClient {
    async fn categories(&self) -> Result<Vec<Category>, ProviderError> {
        self.select(CATEGORIES_TABLE, &[BY_SORT_ORDER])
            .await
            .map_err(|e| e.into_provider(CATEGORIES_TABLE))
    }

    async fn active_products(&self) -> Result<Vec<Product>, ProviderError> {
        self.select(PRODUCTS_TABLE, &[ACTIVE_ONLY, BY_SORT_ORDER])
            .await
            .map_err(|e| e.into_provider(PRODUCTS_TABLE))
    }

    async fn active_addons(&self) -> Result<Vec<Addon>, ProviderError> {
        self.select(ADDONS_TABLE, &[ACTIVE_ONLY, BY_NAME])
            .await
            .map_err(|e| e.into_provider(ADDONS_TABLE))
    }
}

impl SettingsProvider for SupabaseClient {
    async fn store_settings(&self) -> Result<StoreSettings, ProviderError> {
        self.select_first(SETTINGS_TABLE, &[("limit", "1")])
            .await
            .map_err(|e| e.into_provider(SETTINGS_TABLE))
    }
}

// =============================================================================
// SupabaseCatalogStore
// =============================================================================

/// Back-office access to the catalog tables and the image bucket.
#[derive(Debug, Clone)]
pub struct SupabaseCatalogStore {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseCatalogStore {
    /// Wrap `client`; product images go to `bucket`.
    #[must_use]
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[must_use]
    pub const fn client(&self) -> &SupabaseClient {
        &self.client
    }
}

impl CatalogAdminStore for SupabaseCatalogStore {
    async fn all_categories(&self) -> Result<Vec<Category>, ProviderError> {
        self.client.categories().await
    }

    async fn all_products(&self) -> Result<Vec<Product>, ProviderError> {
        self.client
            .select(PRODUCTS_TABLE, &[BY_SORT_ORDER])
            .await
            .map_err(|e| e.into_provider(PRODUCTS_TABLE))
    }

    async fn all_addons(&self) -> Result<Vec<Addon>, ProviderError> {
        self.client
            .select(ADDONS_TABLE, &[BY_NAME])
            .await
            .map_err(|e| e.into_provider(ADDONS_TABLE))
    }

    async fn settings(&self) -> Result<StoreSettings, ProviderError> {
        self.client.store_settings().await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category, ProviderError> {
        let category: Category = self
            .client
            .insert(CATEGORIES_TABLE, draft)
            .await
            .map_err(|e| e.into_provider(CATEGORIES_TABLE))?;
        info!(id = %category.id, "Category created");
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, ProviderError> {
        self.client
            .update(CATEGORIES_TABLE, &id.to_string(), draft)
            .await
            .map_err(|e| e.into_provider(CATEGORIES_TABLE))
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), ProviderError> {
        self.client
            .delete(CATEGORIES_TABLE, &id.to_string())
            .await
            .map_err(|e| e.into_provider(CATEGORIES_TABLE))
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, ProviderError> {
        let product: Product = self
            .client
            .insert(PRODUCTS_TABLE, draft)
            .await
            .map_err(|e| e.into_provider(PRODUCTS_TABLE))?;
        info!(id = %product.id, "Product created");
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ProviderError> {
        self.client
            .update(PRODUCTS_TABLE, &id.to_string(), draft)
            .await
            .map_err(|e| e.into_provider(PRODUCTS_TABLE))
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ProviderError> {
        self.client
            .delete(PRODUCTS_TABLE, &id.to_string())
            .await
            .map_err(|e| e.into_provider(PRODUCTS_TABLE))
    }

    async fn insert_addon(&self, draft: &AddonDraft) -> Result<Addon, ProviderError> {
        self.client
            .insert(ADDONS_TABLE, draft)
            .await
            .map_err(|e| e.into_provider(ADDONS_TABLE))
    }

    async fn update_addon(&self, id: AddonId, draft: &AddonDraft) -> Result<Addon, ProviderError> {
        self.client
            .update(ADDONS_TABLE, &id.to_string(), draft)
            .await
            .map_err(|e| e.into_provider(ADDONS_TABLE))
    }

    async fn delete_addon(&self, id: AddonId) -> Result<(), ProviderError> {
        self.client
            .delete(ADDONS_TABLE, &id.to_string())
            .await
            .map_err(|e| e.into_provider(ADDONS_TABLE))
    }

    #[instrument(skip(self, draft), fields(id = %id))]
    async fn update_settings(
        &self,
        id: SettingsId,
        draft: &SettingsDraft,
    ) -> Result<StoreSettings, ProviderError> {
        let settings: StoreSettings = self
            .client
            .update(SETTINGS_TABLE, &id.to_string(), draft)
            .await
            .map_err(|e| e.into_provider(SETTINGS_TABLE))?;
        info!(is_open = settings.is_open, "Store settings saved");
        Ok(settings)
    }

    async fn upload_image(
        &self,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError> {
        self.client
            .upload_object(&self.bucket, object_name, content_type, bytes)
            .await
            .map(|url| url.to_string())
            .map_err(crate::error::BackendError::into_upload_failure)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::client::tests::client;

    #[test]
    fn test_storefront_queries() {
        let client = client("https://abcd.supabase.co");
        let url = client
            .rest_url(PRODUCTS_TABLE, &[("select", "*"), ACTIVE_ONLY, BY_SORT_ORDER])
            .unwrap();
        assert_eq!(url.path(), "/rest/v1/products");
        assert_eq!(url.query(), Some("select=*&active=eq.true&order=sort_order"));

        let url = client.rest_url(ADDONS_TABLE, &[ACTIVE_ONLY, BY_NAME]).unwrap();
        assert_eq!(url.query(), Some("active=eq.true&order=name"));
    }

    #[test]
    fn test_store_keeps_bucket() {
        let store = SupabaseCatalogStore::new(
            client("https://abcd.supabase.co").with_access_token("t"),
            "product-images",
        );
        assert_eq!(store.bucket(), "product-images");
        assert!(store.client().is_authenticated());
    }
}
