//! Observable cart for one shopping session.
//!
//! Wraps a [`Cart`] and publishes a [`CartSummary`] on a `tokio::sync::watch`
//! channel after every mutation, so a header badge or a checkout page can
//! follow the cart without polling. Each session owns its own store.

use cardapio_core::{Cart, CartLineItem, LineItemId, Price, ProductId, SelectedAddon};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

/// Derived cart totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: Price,
}

impl CartSummary {
    fn of(cart: &Cart) -> Self {
        Self {
            item_count: cart.total_item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// A cart plus its change feed.
#[derive(Debug)]
pub struct CartStore {
    cart: Cart,
    summary: watch::Sender<CartSummary>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::from_cart(Cart::new())
    }

    /// Resume from a previously saved cart.
    #[must_use]
    pub fn from_cart(cart: Cart) -> Self {
        let (summary, _) = watch::channel(CartSummary::of(&cart));
        Self { cart, summary }
    }

    /// Follow the cart totals.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary.subscribe()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn summary(&self) -> CartSummary {
        *self.summary.borrow()
    }

    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
        addons: Vec<SelectedAddon>,
        image_ref: Option<String>,
    ) -> CartLineItem {
        let item = self
            .cart
            .add_item(product_id, name, unit_price, addons, image_ref);
        debug!(line_id = %item.id, product_id = %product_id, "Cart line added");
        self.publish();
        item
    }

    pub fn remove_item(&mut self, id: LineItemId) -> bool {
        let removed = self.cart.remove_item(id);
        if removed {
            self.publish();
        }
        removed
    }

    /// Set a line's quantity; zero or less removes the line.
    pub fn update_quantity(&mut self, id: LineItemId, quantity: i64) -> bool {
        let changed = self.cart.update_quantity(id, quantity);
        if changed {
            self.publish();
        }
        changed
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.publish();
    }

    fn publish(&self) {
        self.summary.send_replace(CartSummary::of(&self.cart));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn add_acai(store: &mut CartStore) -> CartLineItem {
        store.add_item(
            ProductId::generate(),
            "Açaí 500ml",
            Price::from_cents(1800),
            vec![],
            None,
        )
    }

    #[test]
    fn test_subscribers_see_every_mutation() {
        let mut store = CartStore::new();
        let mut rx = store.subscribe();
        assert_eq!(*rx.borrow_and_update(), CartSummary::default());

        let line = add_acai(&mut store);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().item_count, 1);

        store.update_quantity(line.id, 3);
        assert_eq!(
            *rx.borrow_and_update(),
            CartSummary {
                item_count: 3,
                subtotal: Price::from_cents(5400),
            }
        );

        store.clear();
        assert_eq!(*rx.borrow_and_update(), CartSummary::default());
    }

    #[test]
    fn test_noop_mutations_do_not_notify() {
        let mut store = CartStore::new();
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        assert!(!store.remove_item(LineItemId::generate()));
        assert!(!store.update_quantity(LineItemId::generate(), 2));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_from_cart_publishes_initial_totals() {
        let mut cart = Cart::new();
        cart.add_item(ProductId::generate(), "Água", Price::from_cents(350), vec![], None);
        let store = CartStore::from_cart(cart);
        assert_eq!(store.summary().subtotal, Price::from_cents(350));
        assert_eq!(store.subscribe().borrow().item_count, 1);
    }

    #[test]
    fn test_publishing_without_subscribers() {
        let mut store = CartStore::new();
        add_acai(&mut store);
        assert_eq!(store.summary().item_count, 1);
    }
}
