//! Contracts for the external collaborators.
//!
//! The storefront and back office never talk to the hosted backend directly;
//! they are generic over these traits so tests can swap in in-memory fakes.
//! Implementations live in `cardapio-backend`.

use core::future::Future;

use thiserror::Error;

use crate::types::{
    Addon, AddonDraft, AddonId, AppRole, Category, CategoryDraft, CategoryId, Product,
    ProductDraft, ProductId, SettingsDraft, SettingsId, StoreSettings, UserId,
};

/// Errors reported by external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached or answered with something unusable.
    #[error("external fetch failed ({resource}): {message}")]
    ExternalFetchFailure {
        /// What was being fetched (table, endpoint, bucket).
        resource: String,
        message: String,
    },

    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The credentials were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Storing a file failed.
    #[error("upload failed: {0}")]
    UploadFailure(String),
}

impl ProviderError {
    /// Shorthand for [`ProviderError::ExternalFetchFailure`].
    pub fn fetch(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalFetchFailure {
            resource: resource.into(),
            message: message.into(),
        }
    }
}

/// Read-only access to the menu.
pub trait CatalogProvider {
    /// All categories ordered by `sort_order`.
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>, ProviderError>> + Send;

    /// Active products ordered by `sort_order`.
    fn active_products(&self)
    -> impl Future<Output = Result<Vec<Product>, ProviderError>> + Send;

    /// Active add-ons ordered by name.
    fn active_addons(&self) -> impl Future<Output = Result<Vec<Addon>, ProviderError>> + Send;
}

/// Read-only access to the store settings row.
pub trait SettingsProvider {
    fn store_settings(&self)
    -> impl Future<Output = Result<StoreSettings, ProviderError>> + Send;
}

/// A signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: UserId,
    pub email: String,
    /// Bearer token for authenticated requests.
    pub access_token: String,
}

/// Sign-in and role lookup.
pub trait AuthProvider {
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthIdentity, ProviderError>> + Send;

    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn sign_out(
        &self,
        identity: &AuthIdentity,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Whether `identity` holds `role`.
    fn has_role(
        &self,
        identity: &AuthIdentity,
        role: AppRole,
    ) -> impl Future<Output = Result<bool, ProviderError>> + Send;
}

/// Write access to the catalog and settings, used by the back office.
///
/// Listings include inactive records.
pub trait CatalogAdminStore {
    fn all_categories(&self)
    -> impl Future<Output = Result<Vec<Category>, ProviderError>> + Send;
    fn all_products(&self) -> impl Future<Output = Result<Vec<Product>, ProviderError>> + Send;
    fn all_addons(&self) -> impl Future<Output = Result<Vec<Addon>, ProviderError>> + Send;
    fn settings(&self) -> impl Future<Output = Result<StoreSettings, ProviderError>> + Send;

    fn insert_category(
        &self,
        draft: &CategoryDraft,
    ) -> impl Future<Output = Result<Category, ProviderError>> + Send;
    fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> impl Future<Output = Result<Category, ProviderError>> + Send;
    fn delete_category(
        &self,
        id: CategoryId,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn insert_product(
        &self,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, ProviderError>> + Send;
    fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, ProviderError>> + Send;
    fn delete_product(&self, id: ProductId)
    -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn insert_addon(
        &self,
        draft: &AddonDraft,
    ) -> impl Future<Output = Result<Addon, ProviderError>> + Send;
    fn update_addon(
        &self,
        id: AddonId,
        draft: &AddonDraft,
    ) -> impl Future<Output = Result<Addon, ProviderError>> + Send;
    fn delete_addon(&self, id: AddonId) -> impl Future<Output = Result<(), ProviderError>> + Send;

    fn update_settings(
        &self,
        id: SettingsId,
        draft: &SettingsDraft,
    ) -> impl Future<Output = Result<StoreSettings, ProviderError>> + Send;

    /// Store an image and return its public URL.
    fn upload_image(
        &self,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}
