//! One customer's visit: cart, checkout form and checkout phase.
//!
//! ```text
//! Editing --submit--> Validating --ok--> Submitted (cart cleared)
//!    ^                    |
//!    |                    +--error--> Invalid (form stays editable)
//!    +---- any edit ----------------------+
//! ```

use cardapio_core::checkout::OrderSummary;
use cardapio_core::{
    AddonId, CartLineItem, CheckoutError, CheckoutForm, ExternalHandoff, LineItemId, ProductId,
    ServiceType, StoreSettings,
};
use tokio::sync::watch;
use tracing::debug;

use crate::cart_store::{CartStore, CartSummary};
use crate::checkout::submit_order;
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::handoff::HandoffTransport;
use crate::menu::Menu;

/// Where the session is in the checkout flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// Cart and form may be edited.
    #[default]
    Editing,
    /// An order is being prepared and handed off.
    Validating,
    /// The last attempt failed; the form is kept for correction.
    Invalid(StorefrontError),
    /// The order was handed to the merchant.
    Submitted(Box<ExternalHandoff>),
}

/// Per-visit shopping state.
#[derive(Debug, Default)]
pub struct ShoppingSession {
    cart: CartStore,
    form: CheckoutForm,
    phase: CheckoutPhase,
}

impl ShoppingSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with an existing cart.
    #[must_use]
    pub fn with_cart(cart: CartStore) -> Self {
        Self {
            cart,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.cart.subscribe()
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    #[must_use]
    pub const fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// Edit the checkout form.
    pub fn form_mut(&mut self) -> &mut CheckoutForm {
        self.touch();
        &mut self.form
    }

    /// Replace the checkout form.
    pub fn set_form(&mut self, form: CheckoutForm) {
        self.touch();
        self.form = form;
    }

    /// Add one unit of a listed product with the chosen add-ons.
    ///
    /// The product's name, price and image and the add-on prices are copied
    /// into the cart line; later menu changes do not affect it.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::StoreClosed` if the store is not accepting orders
    /// - `StorefrontError::ProductNotFound` if the product is not on `menu`
    pub fn add_product(
        &mut self,
        menu: &Menu,
        settings: &StoreSettings,
        product_id: ProductId,
        addon_ids: &[AddonId],
    ) -> Result<CartLineItem> {
        if !settings.is_open {
            return Err(CheckoutError::StoreClosed.into());
        }
        let product = menu
            .product(product_id)
            .ok_or(StorefrontError::ProductNotFound(product_id))?;

        self.touch();
        let item = self.cart.add_item(
            product.id,
            product.name.clone(),
            product.price,
            menu.resolve_addons(addon_ids),
            product.image().map(str::to_string),
        );
        debug!(product = %product.name, addons = item.selected_addons.len(), "Product added");
        Ok(item)
    }

    pub fn remove_item(&mut self, id: LineItemId) -> bool {
        self.touch();
        self.cart.remove_item(id)
    }

    pub fn update_quantity(&mut self, id: LineItemId, quantity: i64) -> bool {
        self.touch();
        self.cart.update_quantity(id, quantity)
    }

    /// Totals for the form as currently filled in.
    ///
    /// Until pickup is chosen the delivery fee is included.
    #[must_use]
    pub fn preview(&self, settings: &StoreSettings) -> OrderSummary {
        let service = self
            .form
            .service_type
            .parse()
            .unwrap_or(ServiceType::Delivery);
        OrderSummary::compute(self.cart.cart(), settings, service)
    }

    /// Submit the order through `transport`.
    ///
    /// On success the cart and form are cleared and the phase becomes
    /// [`CheckoutPhase::Submitted`]. On failure the phase becomes
    /// [`CheckoutPhase::Invalid`] and nothing else changes.
    ///
    /// # Errors
    ///
    /// Any error from [`submit_order`].
    pub async fn submit<T>(
        &mut self,
        settings: &StoreSettings,
        transport: &T,
        config: &StorefrontConfig,
    ) -> Result<ExternalHandoff>
    where
        T: HandoffTransport + Sync,
    {
        self.phase = CheckoutPhase::Validating;
        match submit_order(&mut self.cart, &self.form, settings, transport, config).await {
            Ok(handoff) => {
                self.form = CheckoutForm::default();
                self.phase = CheckoutPhase::Submitted(Box::new(handoff.clone()));
                Ok(handoff)
            }
            Err(e) => {
                self.phase = CheckoutPhase::Invalid(e.clone());
                Err(e)
            }
        }
    }

    /// Any edit returns the session to `Editing`.
    fn touch(&mut self) {
        if self.phase != CheckoutPhase::Editing {
            self.phase = CheckoutPhase::Editing;
        }
    }
}
