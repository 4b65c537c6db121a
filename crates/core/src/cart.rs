//! Session cart and derived totals.
//!
//! A [`Cart`] is an insertion-ordered list of line items. Each line carries a
//! snapshot of the product name, unit price and chosen add-ons taken when it
//! was added, so later catalog edits never change what is already in the cart.
//!
//! Identical products are never merged: adding the same product twice yields
//! two lines that can be adjusted or removed independently.

use serde::{Deserialize, Serialize};

use crate::types::{AddonId, LineItemId, Price, ProductId};

/// An add-on chosen for a line, frozen at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAddon {
    pub id: AddonId,
    pub name: String,
    pub price: Price,
}

/// One product selection in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
    pub selected_addons: Vec<SelectedAddon>,
    pub image_ref: Option<String>,
}

impl CartLineItem {
    /// Unit price plus every add-on price.
    #[must_use]
    pub fn unit_price_with_addons(&self) -> Price {
        self.unit_price + self.selected_addons.iter().map(|a| a.price).sum()
    }

    /// `(unit price + add-ons) × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price_with_addons().times(self.quantity)
    }

    /// Add-on names joined with `", "`, in selection order.
    #[must_use]
    pub fn addon_names(&self) -> String {
        self.selected_addons
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The shopping cart for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a new line with quantity 1 and return a copy of it.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price: Price,
        addons: Vec<SelectedAddon>,
        image_ref: Option<String>,
    ) -> CartLineItem {
        let item = CartLineItem {
            id: LineItemId::generate(),
            product_id,
            name: name.into(),
            unit_price,
            quantity: 1,
            selected_addons: addons,
            image_ref,
        };
        self.items.push(item.clone());
        item
    }

    /// Remove the line with `id`. Returns whether a line was removed.
    pub fn remove_item(&mut self, id: LineItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() < before
    }

    /// Set the quantity of the line with `id`.
    ///
    /// A quantity of zero or less removes the line. Quantities above
    /// `u32::MAX` saturate. Returns whether a line was changed or removed.
    pub fn update_quantity(&mut self, id: LineItemId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: LineItemId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn addon(name: &str, cents: i64) -> SelectedAddon {
        SelectedAddon {
            id: AddonId::generate(),
            name: name.to_string(),
            price: Price::from_cents(cents),
        }
    }

    fn add(cart: &mut Cart, cents: i64, addons: Vec<SelectedAddon>) -> LineItemId {
        cart.add_item(
            ProductId::generate(),
            "Açaí 500ml",
            Price::from_cents(cents),
            addons,
            None,
        )
        .id
    }

    #[test]
    fn test_add_item_appends_with_quantity_one() {
        let mut cart = Cart::new();
        let product_id = ProductId::generate();
        let first = cart
            .add_item(product_id, "Açaí", Price::from_cents(1800), vec![], None)
            .id;
        let second = cart
            .add_item(product_id, "Açaí", Price::from_cents(1800), vec![], None)
            .id;

        assert_ne!(first, second);
        assert_eq!(cart.len(), 2);
        assert!(cart.items().iter().all(|item| item.quantity == 1));
    }

    #[test]
    fn test_scenario_one_item_with_addon_quantity_two() {
        let mut cart = Cart::new();
        let id = add(&mut cart, 1800, vec![addon("Granola", 250)]);
        assert!(cart.update_quantity(id, 2));

        assert_eq!(cart.subtotal(), Price::from_cents(4100));
        assert_eq!(cart.total_item_count(), 2);
        assert_eq!(cart.get(id).unwrap().line_total(), Price::from_cents(4100));
    }

    #[test]
    fn test_update_quantity_zero_and_negative_remove() {
        for quantity in [0, -5] {
            let mut cart = Cart::new();
            let keep = add(&mut cart, 1000, vec![]);
            let gone = add(&mut cart, 500, vec![]);

            let mut expected = cart.clone();
            expected.remove_item(gone);

            assert!(cart.update_quantity(gone, quantity));
            assert_eq!(cart, expected);
            assert!(cart.get(keep).is_some());
        }
    }

    #[test]
    fn test_update_quantity_preserves_position_and_addons() {
        let mut cart = Cart::new();
        let first = add(&mut cart, 1000, vec![addon("Leite Ninho", 300)]);
        let _second = add(&mut cart, 500, vec![]);

        cart.update_quantity(first, 4);

        assert_eq!(cart.items()[0].id, first);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.items()[0].addon_names(), "Leite Ninho");
    }

    #[test]
    fn test_update_quantity_saturates() {
        let mut cart = Cart::new();
        let id = add(&mut cart, 1, vec![]);
        cart.update_quantity(id, i64::MAX);
        assert_eq!(cart.get(id).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_subtotal_saturates_instead_of_overflowing() {
        let mut cart = Cart::new();
        let huge = Price::new(rust_decimal::Decimal::MAX);
        let id = cart
            .add_item(ProductId::generate(), "Açaí 500ml", huge, vec![addon("Granola", 250)], None)
            .id;
        cart.update_quantity(id, i64::MAX);
        add(&mut cart, 1800, vec![]);

        assert_eq!(cart.subtotal(), huge);
    }

    #[test]
    fn test_missing_ids_are_no_ops() {
        let mut cart = Cart::new();
        add(&mut cart, 1000, vec![]);
        let before = cart.clone();

        assert!(!cart.remove_item(LineItemId::generate()));
        assert!(!cart.update_quantity(LineItemId::generate(), 3));
        assert!(!cart.update_quantity(LineItemId::generate(), 0));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        add(&mut cart, 1000, vec![]);
        add(&mut cart, 2000, vec![addon("Banana", 100)]);
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
        assert_eq!(cart.total_item_count(), 0);
    }

    #[test]
    fn test_addon_names_keep_selection_order() {
        let mut cart = Cart::new();
        let id = add(
            &mut cart,
            1000,
            vec![addon("Granola", 200), addon("Morango", 300), addon("Mel", 150)],
        );
        assert_eq!(cart.get(id).unwrap().addon_names(), "Granola, Morango, Mel");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { cents: i64, addons: Vec<i64> },
        Remove(usize),
        Update(usize, i64),
        RemoveMissing,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0i64..10_000, prop::collection::vec(0i64..1_000, 0..4))
                .prop_map(|(cents, addons)| Op::Add { cents, addons }),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8, -5i64..20).prop_map(|(i, q)| Op::Update(i, q)),
            Just(Op::RemoveMissing),
        ]
    }

    proptest! {
        #[test]
        fn prop_totals_match_model(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut cart = Cart::new();
            // Model: (id, unit cents, addon cents, quantity)
            let mut model: Vec<(LineItemId, i64, Vec<i64>, i64)> = Vec::new();

            for op in ops {
                match op {
                    Op::Add { cents, addons } => {
                        let selected = addons.iter().map(|c| addon("x", *c)).collect();
                        let id = add(&mut cart, cents, selected);
                        model.push((id, cents, addons, 1));
                    }
                    Op::Remove(i) => {
                        if let Some(entry) = model.get(i).cloned() {
                            cart.remove_item(entry.0);
                            model.remove(i);
                        }
                    }
                    Op::Update(i, q) => {
                        if let Some(entry) = model.get(i).cloned() {
                            cart.update_quantity(entry.0, q);
                            if q <= 0 {
                                model.remove(i);
                            } else {
                                model[i].3 = q;
                            }
                        }
                    }
                    Op::RemoveMissing => {
                        let before = cart.clone();
                        cart.remove_item(LineItemId::generate());
                        prop_assert_eq!(&cart, &before);
                    }
                }

                let expected_count: i64 = model.iter().map(|m| m.3).sum();
                let expected_cents: i64 = model
                    .iter()
                    .map(|(_, unit, addons, q)| (unit + addons.iter().sum::<i64>()) * q)
                    .sum();

                prop_assert_eq!(cart.total_item_count(), u64::try_from(expected_count).unwrap());
                prop_assert_eq!(cart.subtotal(), Price::from_cents(expected_cents));
                prop_assert!(cart.items().iter().all(|item| item.quantity >= 1));
                prop_assert_eq!(
                    cart.items().iter().map(|item| item.id).collect::<Vec<_>>(),
                    model.iter().map(|m| m.0).collect::<Vec<_>>()
                );
            }
        }
    }
}
