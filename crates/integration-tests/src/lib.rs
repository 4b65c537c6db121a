//! Integration tests for Cardápio.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests
//! cargo test -p cardapio-integration-tests
//!
//! # Also run the tests against a live backend (needs SUPABASE_URL and SUPABASE_ANON_KEY)
//! cargo test -p cardapio-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Menu, cart and WhatsApp handoff
//! - `admin_catalog` - Role gate, catalog management, image upload
//! - `live_backend` - Read-only checks against a hosted backend
//!
//! This library holds the shared fixtures: an in-memory backend that
//! implements every provider trait, and handoff transports that record or
//! refuse links.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cardapio_core::providers::{
    AuthIdentity, AuthProvider, CatalogAdminStore, CatalogProvider, SettingsProvider,
};
use cardapio_core::{
    Addon, AddonDraft, AddonId, AppRole, Category, CategoryDraft, CategoryId, HandoffLink, Price,
    Product, ProductDraft, ProductId, ProviderError, SettingsDraft, SettingsId, StoreSettings,
    UserId,
};
use cardapio_storefront::{HandoffError, HandoffTransport};

/// Public URL prefix for uploaded images.
pub const IMAGE_BASE_URL: &str = "https://storage.test/product-images";

/// Password accepted for every seeded account.
pub const PASSWORD: &str = "segredo123";

/// Email of the seeded administrator.
pub const ADMIN_EMAIL: &str = "dona@acai.com";

/// Email of the seeded account without the admin role.
pub const CUSTOMER_EMAIL: &str = "cliente@acai.com";

/// Stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub object_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    password: String,
    roles: Vec<AppRole>,
}

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    products: Vec<Product>,
    addons: Vec<Addon>,
    settings: Option<StoreSettings>,
    accounts: HashMap<String, Account>,
    signed_out: Vec<UserId>,
    images: Vec<StoredImage>,
    fail_fetches: bool,
    fail_uploads: bool,
}

/// In-memory stand-in for the hosted backend.
///
/// Clones share state, so a test can hand one clone to the storefront and
/// another to the back office and observe writes from both sides.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
    fetches: Arc<AtomicUsize>,
}

/// IDs of the seeded records.
#[derive(Debug, Clone, Copy)]
pub struct Seed {
    pub acai: CategoryId,
    pub bebidas: CategoryId,
    /// Açaí 500ml, R$ 18,00
    pub acai_500: ProductId,
    /// Açaí 300ml, R$ 12,00
    pub acai_300: ProductId,
    /// Inactive product, hidden from the menu
    pub retired: ProductId,
    /// Granola, R$ 2,50
    pub granola: AddonId,
    /// Leite condensado, R$ 3,00
    pub leite: AddonId,
    pub settings: SettingsId,
}

impl InMemoryBackend {
    /// Backend with a small açaí menu, an open store charging R$ 5,00 for
    /// delivery, one administrator and one regular account.
    #[must_use]
    pub fn seeded() -> (Self, Seed) {
        let seed = Seed {
            acai: CategoryId::generate(),
            bebidas: CategoryId::generate(),
            acai_500: ProductId::generate(),
            acai_300: ProductId::generate(),
            retired: ProductId::generate(),
            granola: AddonId::generate(),
            leite: AddonId::generate(),
            settings: SettingsId::generate(),
        };

        let product = |id, name: &str, cents, active, sort_order| Product {
            id,
            category_id: seed.acai,
            name: name.to_string(),
            description: String::new(),
            price: Price::from_cents(cents),
            image_ref: String::new(),
            active,
            sort_order,
        };

        let backend = Self::default();
        {
            let mut state = backend.lock();
            state.categories = vec![
                Category {
                    id: seed.acai,
                    name: "Açaí".to_string(),
                    sort_order: 1,
                },
                Category {
                    id: seed.bebidas,
                    name: "Bebidas".to_string(),
                    sort_order: 2,
                },
            ];
            state.products = vec![
                product(seed.acai_500, "Açaí 500ml", 1800, true, 2),
                product(seed.acai_300, "Açaí 300ml", 1200, true, 1),
                product(seed.retired, "Açaí 1L", 3000, false, 3),
            ];
            state.addons = vec![
                Addon {
                    id: seed.granola,
                    name: "Granola".to_string(),
                    price: Price::from_cents(250),
                    active: true,
                },
                Addon {
                    id: seed.leite,
                    name: "Leite condensado".to_string(),
                    price: Price::from_cents(300),
                    active: true,
                },
            ];
            state.settings = Some(StoreSettings {
                id: seed.settings,
                store_name: "Açaí da Praça".to_string(),
                store_address: "Rua A, 10".to_string(),
                is_open: true,
                delivery_time_label: "40-60 min".to_string(),
                delivery_fee: Price::from_cents(500),
                whatsapp_destination: "5521999990000".to_string(),
            });
            for (email, roles) in [
                (ADMIN_EMAIL, vec![AppRole::Admin, AppRole::User]),
                (CUSTOMER_EMAIL, vec![AppRole::User]),
            ] {
                state.accounts.insert(
                    email.to_string(),
                    Account {
                        user_id: UserId::generate(),
                        password: PASSWORD.to_string(),
                        roles,
                    },
                );
            }
        }
        (backend, seed)
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every storefront read fail.
    pub fn fail_fetches(&self, fail: bool) {
        self.lock().fail_fetches = fail;
    }

    /// Make every image upload fail.
    pub fn fail_uploads(&self, fail: bool) {
        self.lock().fail_uploads = fail;
    }

    /// Change the store settings directly.
    pub fn edit_settings(&self, edit: impl FnOnce(&mut StoreSettings)) {
        if let Some(settings) = self.lock().settings.as_mut() {
            edit(settings);
        }
    }

    /// Number of storefront reads served.
    #[must_use]
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    #[must_use]
    pub fn images(&self) -> Vec<StoredImage> {
        self.lock().images.clone()
    }

    #[must_use]
    pub fn signed_out(&self) -> Vec<UserId> {
        self.lock().signed_out.clone()
    }

    /// Whether an account exists for `email`.
    #[must_use]
    pub fn has_account(&self, email: &str) -> bool {
        self.lock().accounts.contains_key(email)
    }

    fn read(&self, resource: &str) -> Result<MutexGuard<'_, State>, ProviderError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.fail_fetches {
            return Err(ProviderError::fetch(resource, "connection refused"));
        }
        Ok(state)
    }
}

fn sorted<T: Clone>(items: &[T], key: impl Fn(&T) -> i32) -> Vec<T> {
    let mut items = items.to_vec();
    items.sort_by_key(key);
    items
}

fn missing(resource: &str, id: impl std::fmt::Display) -> ProviderError {
    ProviderError::NotFound(format!("{resource} {id}"))
}

impl CatalogProvider for InMemoryBackend {
    async fn categories(&self) -> Result<Vec<Category>, ProviderError> {
        let state = self.read("categories")?;
        Ok(sorted(&state.categories, |c| c.sort_order))
    }

    async fn active_products(&self) -> Result<Vec<Product>, ProviderError> {
        let state = self.read("products")?;
        let mut products = sorted(&state.products, |p| p.sort_order);
        products.retain(|p| p.active);
        Ok(products)
    }

    async fn active_addons(&self) -> Result<Vec<Addon>, ProviderError> {
        let state = self.read("addons")?;
        let mut addons: Vec<Addon> = state.addons.iter().filter(|a| a.active).cloned().collect();
        addons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(addons)
    }
}

impl SettingsProvider for InMemoryBackend {
    async fn store_settings(&self) -> Result<StoreSettings, ProviderError> {
        self.read("store_settings")?
            .settings
            .clone()
            .ok_or_else(|| ProviderError::NotFound("store_settings".to_string()))
    }
}

impl AuthProvider for InMemoryBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthIdentity, ProviderError> {
        let state = self.lock();
        let account = state
            .accounts
            .get(email)
            .filter(|account| account.password == password)
            .ok_or_else(|| ProviderError::Unauthorized("Invalid login credentials".to_string()))?;
        Ok(AuthIdentity {
            user_id: account.user_id,
            email: email.to_string(),
            access_token: format!("token-{}", account.user_id),
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let mut state = self.lock();
        if state.accounts.contains_key(email) {
            return Err(ProviderError::fetch("auth/v1/signup", "User already registered"));
        }
        state.accounts.insert(
            email.to_string(),
            Account {
                user_id: UserId::generate(),
                password: password.to_string(),
                roles: vec![AppRole::User],
            },
        );
        Ok(())
    }

    async fn sign_out(&self, identity: &AuthIdentity) -> Result<(), ProviderError> {
        self.lock().signed_out.push(identity.user_id);
        Ok(())
    }

    async fn has_role(
        &self,
        identity: &AuthIdentity,
        role: AppRole,
    ) -> Result<bool, ProviderError> {
        Ok(self
            .lock()
            .accounts
            .values()
            .any(|account| account.user_id == identity.user_id && account.roles.contains(&role)))
    }
}

impl CatalogAdminStore for InMemoryBackend {
    async fn all_categories(&self) -> Result<Vec<Category>, ProviderError> {
        Ok(sorted(&self.lock().categories, |c| c.sort_order))
    }

    async fn all_products(&self) -> Result<Vec<Product>, ProviderError> {
        Ok(sorted(&self.lock().products, |p| p.sort_order))
    }

    async fn all_addons(&self) -> Result<Vec<Addon>, ProviderError> {
        let mut addons = self.lock().addons.clone();
        addons.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(addons)
    }

    async fn settings(&self) -> Result<StoreSettings, ProviderError> {
        self.lock()
            .settings
            .clone()
            .ok_or_else(|| ProviderError::NotFound("store_settings".to_string()))
    }

    async fn insert_category(&self, draft: &CategoryDraft) -> Result<Category, ProviderError> {
        let category = Category {
            id: CategoryId::generate(),
            name: draft.name.clone(),
            sort_order: draft.sort_order,
        };
        self.lock().categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        draft: &CategoryDraft,
    ) -> Result<Category, ProviderError> {
        let mut state = self.lock();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| missing("categories", id))?;
        category.name.clone_from(&draft.name);
        category.sort_order = draft.sort_order;
        Ok(category.clone())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), ProviderError> {
        let mut state = self.lock();
        if state.products.iter().any(|p| p.category_id == id) {
            return Err(ProviderError::fetch(
                "categories",
                "violates foreign key constraint on products",
            ));
        }
        state.categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, ProviderError> {
        let product = Product {
            id: ProductId::generate(),
            category_id: draft.category_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image_ref: draft.image_ref.clone(),
            active: draft.active,
            sort_order: draft.sort_order,
        };
        self.lock().products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, ProviderError> {
        let mut state = self.lock();
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| missing("products", id))?;
        *product = Product {
            id,
            category_id: draft.category_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image_ref: draft.image_ref.clone(),
            active: draft.active,
            sort_order: draft.sort_order,
        };
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), ProviderError> {
        self.lock().products.retain(|p| p.id != id);
        Ok(())
    }

    async fn insert_addon(&self, draft: &AddonDraft) -> Result<Addon, ProviderError> {
        let addon = Addon {
            id: AddonId::generate(),
            name: draft.name.clone(),
            price: draft.price,
            active: draft.active,
        };
        self.lock().addons.push(addon.clone());
        Ok(addon)
    }

    async fn update_addon(&self, id: AddonId, draft: &AddonDraft) -> Result<Addon, ProviderError> {
        let mut state = self.lock();
        let addon = state
            .addons
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| missing("addons", id))?;
        addon.name.clone_from(&draft.name);
        addon.price = draft.price;
        addon.active = draft.active;
        Ok(addon.clone())
    }

    async fn delete_addon(&self, id: AddonId) -> Result<(), ProviderError> {
        self.lock().addons.retain(|a| a.id != id);
        Ok(())
    }

    async fn update_settings(
        &self,
        id: SettingsId,
        draft: &SettingsDraft,
    ) -> Result<StoreSettings, ProviderError> {
        let mut state = self.lock();
        let settings = state
            .settings
            .as_mut()
            .filter(|s| s.id == id)
            .ok_or_else(|| missing("store_settings", id))?;
        *settings = StoreSettings {
            id,
            store_name: draft.store_name.clone(),
            store_address: draft.store_address.clone(),
            is_open: draft.is_open,
            delivery_time_label: draft.delivery_time_label.clone(),
            delivery_fee: draft.delivery_fee,
            whatsapp_destination: draft.whatsapp_destination.clone(),
        };
        Ok(settings.clone())
    }

    async fn upload_image(
        &self,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError> {
        let mut state = self.lock();
        if state.fail_uploads {
            return Err(ProviderError::UploadFailure("bucket unavailable".to_string()));
        }
        state.images.push(StoredImage {
            object_name: object_name.to_string(),
            content_type: content_type.to_string(),
            size: bytes.len(),
        });
        Ok(format!("{IMAGE_BASE_URL}/{object_name}"))
    }
}

// =============================================================================
// Transports
// =============================================================================

/// Transport that keeps every link it was asked to open.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    opened: Mutex<Vec<HandoffLink>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn opened(&self) -> Vec<HandoffLink> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HandoffTransport for RecordingTransport {
    async fn open(&self, link: &HandoffLink) -> Result<(), HandoffError> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(link.clone());
        Ok(())
    }
}

/// Transport that can never open a link, like a browser blocking popups.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockedTransport;

impl HandoffTransport for BlockedTransport {
    async fn open(&self, _link: &HandoffLink) -> Result<(), HandoffError> {
        Err(HandoffError::Unavailable("popup blocked".to_string()))
    }
}
