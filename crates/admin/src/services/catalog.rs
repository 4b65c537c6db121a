//! Catalog and settings management.
//!
//! Every write takes an [`AdminSession`]; the store it runs against carries
//! that session's token, so row-level security on the backend sees the
//! administrator and not the anonymous key.

use cardapio_backend::{SupabaseCatalogStore, SupabaseClient};
use cardapio_core::providers::CatalogAdminStore;
use cardapio_core::{
    Addon, AddonId, Category, CategoryId, Product, ProductId, SettingsId, StoreSettings,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::models::{AddonForm, AdminSession, CategoryForm, ProductForm, SettingsForm};

/// Image extensions accepted for product pictures, with their content types.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// A picture chosen in the product editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Name of the file on the operator's machine; only the extension is kept.
    pub file_name: String,
    /// Overrides the content type derived from the extension.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Random object name with the original extension, plus its content type.
    fn object(&self) -> Result<(String, String)> {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let (ext, derived) = IMAGE_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .ok_or_else(|| {
                AdminError::validation(
                    "image",
                    format!("Formato de imagem não suportado: {}", self.file_name),
                )
            })?;
        if self.bytes.is_empty() {
            return Err(AdminError::validation("image", "O arquivo de imagem está vazio"));
        }

        let content_type = self
            .content_type
            .clone()
            .unwrap_or_else(|| (*derived).to_string());
        Ok((format!("{}.{ext}", Uuid::new_v4()), content_type))
    }
}

/// Counts shown on the back-office landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub categories: usize,
    pub products: usize,
    pub active_products: usize,
    pub addons: usize,
    pub settings: StoreSettings,
}

/// Catalog management service.
pub struct CatalogAdminService<S> {
    store: S,
}

impl CatalogAdminService<SupabaseCatalogStore> {
    /// Service bound to `session`'s token against the hosted backend.
    #[must_use]
    pub fn for_session(
        client: &SupabaseClient,
        session: &AdminSession,
        config: &AdminConfig,
    ) -> Self {
        let client = client.with_access_token(session.access_token());
        Self::new(SupabaseCatalogStore::new(client, config.image_bucket.clone()))
    }
}

impl<S> CatalogAdminService<S>
where
    S: CatalogAdminStore + Sync,
{
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the backend fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.store.all_categories().await?)
    }

    /// All products, inactive ones included.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the backend fails.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.store.all_products().await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the backend fails.
    pub async fn list_addons(&self) -> Result<Vec<Addon>> {
        Ok(self.store.all_addons().await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the backend fails.
    pub async fn settings(&self) -> Result<StoreSettings> {
        Ok(self.store.settings().await?)
    }

    /// Load counts and settings concurrently.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Provider` if any of the lookups fail.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let (categories, products, addons, settings) = tokio::try_join!(
            self.store.all_categories(),
            self.store.all_products(),
            self.store.all_addons(),
            self.store.settings(),
        )?;

        Ok(Dashboard {
            categories: categories.len(),
            active_products: products.iter().filter(|p| p.active).count(),
            products: products.len(),
            addons: addons.len(),
            settings,
        })
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Insert when `id` is `None`, update otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for an invalid form, or
    /// `AdminError::Provider` if the backend fails.
    #[instrument(skip_all, fields(user_id = %session.user_id(), id = ?id))]
    pub async fn save_category(
        &self,
        session: &AdminSession,
        id: Option<CategoryId>,
        form: &CategoryForm,
    ) -> Result<Category> {
        let draft = form.validate()?;
        let category = match id {
            Some(id) => self.store.update_category(id, &draft).await?,
            None => self.store.insert_category(&draft).await?,
        };
        info!(category_id = %category.id, name = %category.name, "Category saved");
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the backend fails.
    #[instrument(skip_all, fields(user_id = %session.user_id(), %id))]
    pub async fn delete_category(&self, session: &AdminSession, id: CategoryId) -> Result<()> {
        self.store.delete_category(id).await?;
        info!("Category deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Insert when `id` is `None`, update otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for an invalid form, or
    /// `AdminError::Provider` if the backend fails.
    #[instrument(skip_all, fields(user_id = %session.user_id(), id = ?id))]
    pub async fn save_product(
        &self,
        session: &AdminSession,
        id: Option<ProductId>,
        form: &ProductForm,
    ) -> Result<Product> {
        let draft = form.validate()?;
        let product = match id {
            Some(id) => self.store.update_product(id, &draft).await?,
            None => self.store.insert_product(&draft).await?,
        };
        info!(product_id = %product.id, name = %product.name, "Product saved");
        Ok(product)
    }

    /// Upload `image`, then save the product pointing at it.
    ///
    /// The form is validated before anything is uploaded. If the upload
    /// fails the product is left untouched.
    ///
    /// # Errors
    ///
    /// - `AdminError::Validation` for an invalid form or image
    /// - `AdminError::UploadFailure` if the image could not be stored
    /// - `AdminError::Provider` if saving the product fails
    #[instrument(skip_all, fields(user_id = %session.user_id(), id = ?id, file = %image.file_name))]
    pub async fn save_product_with_image(
        &self,
        session: &AdminSession,
        id: Option<ProductId>,
        form: &ProductForm,
        image: ImageUpload,
    ) -> Result<Product> {
        form.validate()?;
        let (object_name, content_type) = image.object()?;

        let image_ref = self
            .store
            .upload_image(&object_name, &content_type, image.bytes)
            .await
            .map_err(|e| {
                warn!(error = %e, "Product image upload failed");
                AdminError::UploadFailure(e.to_string())
            })?;
        info!(object = %object_name, "Product image uploaded");

        let form = ProductForm {
            image_ref,
            ..form.clone()
        };
        self.save_product(session, id, &form).await
    }

    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the backend fails.
    #[instrument(skip_all, fields(user_id = %session.user_id(), %id))]
    pub async fn delete_product(&self, session: &AdminSession, id: ProductId) -> Result<()> {
        self.store.delete_product(id).await?;
        info!("Product deleted");
        Ok(())
    }

    // =========================================================================
    // Add-ons
    // =========================================================================

    /// Insert when `id` is `None`, update otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for an invalid form, or
    /// `AdminError::Provider` if the backend fails.
    #[instrument(skip_all, fields(user_id = %session.user_id(), id = ?id))]
    pub async fn save_addon(
        &self,
        session: &AdminSession,
        id: Option<AddonId>,
        form: &AddonForm,
    ) -> Result<Addon> {
        let draft = form.validate()?;
        let addon = match id {
            Some(id) => self.store.update_addon(id, &draft).await?,
            None => self.store.insert_addon(&draft).await?,
        };
        info!(addon_id = %addon.id, name = %addon.name, "Add-on saved");
        Ok(addon)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Provider` if the backend fails.
    #[instrument(skip_all, fields(user_id = %session.user_id(), %id))]
    pub async fn delete_addon(&self, session: &AdminSession, id: AddonId) -> Result<()> {
        self.store.delete_addon(id).await?;
        info!("Add-on deleted");
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// # Errors
    ///
    /// Returns `AdminError::Validation` for an invalid form, or
    /// `AdminError::Provider` if the backend fails.
    #[instrument(skip_all, fields(user_id = %session.user_id(), %id))]
    pub async fn save_settings(
        &self,
        session: &AdminSession,
        id: SettingsId,
        form: &SettingsForm,
    ) -> Result<StoreSettings> {
        let draft = form.validate()?;
        let settings = self.store.update_settings(id, &draft).await?;
        info!(is_open = settings.is_open, "Store settings saved");
        Ok(settings)
    }
}
