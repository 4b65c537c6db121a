//! Checkout validation, totals and order preparation.
//!
//! The flow for one attempt is:
//!
//! 1. [`validate`] turns the raw [`CheckoutForm`] into a [`ValidatedCheckout`]
//! 2. [`compute_total`] applies the delivery fee only for delivery orders
//! 3. [`build_order_message`] renders the text sent to the merchant
//! 4. [`HandoffLink`] addresses that text to the store's WhatsApp number
//!
//! [`prepare_order`] runs all four steps against a cart snapshot. Everything
//! here is pure: nothing mutates the cart or the form.

mod handoff;
mod message;

pub use handoff::{HandoffLink, WHATSAPP_BASE_URL, normalize_destination};
pub use message::{ORDER_HEADER, build_order_message};

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::types::{CURRENCY_PREFIX, PaymentMethod, Price, ServiceType, StoreSettings};

/// A required checkout field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    CustomerName,
    CustomerPhone,
    ServiceType,
    PaymentMethod,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CustomerName => write!(f, "customer name"),
            Self::CustomerPhone => write!(f, "customer phone"),
            Self::ServiceType => write!(f, "service type"),
            Self::PaymentMethod => write!(f, "payment method"),
        }
    }
}

/// Reasons a checkout attempt cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// A mandatory field was left blank.
    #[error("missing required field: {0}")]
    MissingRequiredField(RequiredField),

    /// Delivery was chosen without an address.
    #[error("delivery address is required for delivery orders")]
    MissingDeliveryAddress,

    /// The service type is not one of the known options.
    #[error("unknown service type: {0:?}")]
    UnknownServiceType(String),

    /// The payment method is not one of the known options.
    #[error("unknown payment method: {0:?}")]
    UnknownPaymentMethod(String),

    /// There is nothing to order.
    #[error("the cart is empty")]
    EmptyCart,

    /// The store is not accepting orders right now.
    #[error("the store is closed")]
    StoreClosed,
}

/// Checkout form exactly as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub service_type: String,
    pub delivery_address: String,
    pub delivery_reference: String,
    pub payment_method: String,
    pub change_for: String,
}

/// Where a delivery goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    pub address: String,
    pub reference: Option<String>,
}

/// Delivery with its address, or pickup at the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fulfilment {
    Delivery(DeliveryDetails),
    Pickup,
}

impl Fulfilment {
    #[must_use]
    pub const fn service_type(&self) -> ServiceType {
        match self {
            Self::Delivery(_) => ServiceType::Delivery,
            Self::Pickup => ServiceType::Pickup,
        }
    }

    #[must_use]
    pub const fn delivery(&self) -> Option<&DeliveryDetails> {
        match self {
            Self::Delivery(details) => Some(details),
            Self::Pickup => None,
        }
    }
}

/// A checkout form that passed [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCheckout {
    pub customer_name: String,
    pub customer_phone: String,
    pub fulfilment: Fulfilment,
    pub payment_method: PaymentMethod,
    /// Change requested, only ever set for cash payments.
    pub change_for: Option<String>,
}

impl ValidatedCheckout {
    #[must_use]
    pub const fn service_type(&self) -> ServiceType {
        self.fulfilment.service_type()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn required(value: &str, field: RequiredField) -> Result<String, CheckoutError> {
    non_blank(value).ok_or(CheckoutError::MissingRequiredField(field))
}

/// Validate a checkout form.
///
/// Required fields are checked first, in form order, then the enum values are
/// parsed, then the delivery address is checked.
///
/// # Errors
///
/// - [`CheckoutError::MissingRequiredField`] if name, phone, service type or
///   payment method is blank
/// - [`CheckoutError::UnknownServiceType`] / [`CheckoutError::UnknownPaymentMethod`]
///   for values outside the known options
/// - [`CheckoutError::MissingDeliveryAddress`] for delivery without an address
pub fn validate(form: &CheckoutForm) -> Result<ValidatedCheckout, CheckoutError> {
    let customer_name = required(&form.customer_name, RequiredField::CustomerName)?;
    let customer_phone = required(&form.customer_phone, RequiredField::CustomerPhone)?;
    let service_type = required(&form.service_type, RequiredField::ServiceType)?;
    let payment_method = required(&form.payment_method, RequiredField::PaymentMethod)?;

    let service_type: ServiceType = service_type
        .parse()
        .map_err(|_| CheckoutError::UnknownServiceType(service_type))?;
    let payment_method: PaymentMethod = payment_method
        .parse()
        .map_err(|_| CheckoutError::UnknownPaymentMethod(payment_method))?;

    let fulfilment = match service_type {
        ServiceType::Delivery => Fulfilment::Delivery(DeliveryDetails {
            address: non_blank(&form.delivery_address)
                .ok_or(CheckoutError::MissingDeliveryAddress)?,
            reference: non_blank(&form.delivery_reference),
        }),
        ServiceType::Pickup => Fulfilment::Pickup,
    };

    let change_for = if payment_method.accepts_change() {
        non_blank(&form.change_for).and_then(|change| {
            let amount = change
                .strip_prefix(CURRENCY_PREFIX.trim_end())
                .unwrap_or(&change);
            non_blank(amount)
        })
    } else {
        None
    };

    Ok(ValidatedCheckout {
        customer_name,
        customer_phone,
        fulfilment,
        payment_method,
        change_for,
    })
}

/// Final payable amount.
///
/// Pickup orders never pay the delivery fee; delivery orders pay it once.
#[must_use]
pub fn compute_total(subtotal: Price, delivery_fee: Price, service_type: ServiceType) -> Price {
    match service_type {
        ServiceType::Pickup => subtotal,
        ServiceType::Delivery => subtotal + delivery_fee,
    }
}

/// Monetary breakdown of one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub item_count: u64,
    pub subtotal: Price,
    /// The fee actually charged; `None` for pickup.
    pub delivery_fee: Option<Price>,
    pub total: Price,
}

impl OrderSummary {
    /// Compute the breakdown for `cart` under `settings`.
    #[must_use]
    pub fn compute(cart: &Cart, settings: &StoreSettings, service_type: ServiceType) -> Self {
        let subtotal = cart.subtotal();
        Self {
            item_count: cart.total_item_count(),
            subtotal,
            delivery_fee: service_type
                .requires_address()
                .then_some(settings.delivery_fee),
            total: compute_total(subtotal, settings.delivery_fee, service_type),
        }
    }
}

/// A fully prepared order, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalHandoff {
    pub checkout: ValidatedCheckout,
    pub summary: OrderSummary,
    pub link: HandoffLink,
}

/// Run every checkout step against a cart snapshot.
///
/// `default_destination` is used when the store has no WhatsApp number
/// configured; `base_url` is normally [`WHATSAPP_BASE_URL`].
///
/// # Errors
///
/// [`CheckoutError::StoreClosed`] and [`CheckoutError::EmptyCart`] are checked
/// before the form; otherwise any error from [`validate`].
pub fn prepare_order(
    cart: &Cart,
    form: &CheckoutForm,
    settings: &StoreSettings,
    default_destination: &str,
    base_url: &str,
) -> Result<ExternalHandoff, CheckoutError> {
    if !settings.is_open {
        return Err(CheckoutError::StoreClosed);
    }
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let checkout = validate(form)?;
    let summary = OrderSummary::compute(cart, settings, checkout.service_type());
    let message = build_order_message(cart, &checkout, settings, summary.total);

    let destination = Some(normalize_destination(&settings.whatsapp_destination))
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| normalize_destination(default_destination));
    let link = HandoffLink::new(base_url, destination, message);

    Ok(ExternalHandoff {
        checkout,
        summary,
        link,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::SelectedAddon;
    use crate::types::{AddonId, ProductId, SettingsId};

    pub(crate) fn settings(fee_cents: i64, destination: &str) -> StoreSettings {
        StoreSettings {
            id: SettingsId::generate(),
            store_name: "Açaí da Praça".to_string(),
            store_address: "Rua A, 10".to_string(),
            is_open: true,
            delivery_time_label: "40-60 min".to_string(),
            delivery_fee: Price::from_cents(fee_cents),
            whatsapp_destination: destination.to_string(),
        }
    }

    /// One açaí at 18.00 with granola at 2.50, quantity 2.
    pub(crate) fn scenario_cart() -> Cart {
        let mut cart = Cart::new();
        let id = cart
            .add_item(
                ProductId::generate(),
                "Açaí 500ml",
                Price::from_cents(1800),
                vec![SelectedAddon {
                    id: AddonId::generate(),
                    name: "Granola".to_string(),
                    price: Price::from_cents(250),
                }],
                None,
            )
            .id;
        cart.update_quantity(id, 2);
        cart
    }

    pub(crate) fn form(service: &str, payment: &str) -> CheckoutForm {
        CheckoutForm {
            customer_name: "Maria Silva".to_string(),
            customer_phone: "(21) 98888-7777".to_string(),
            service_type: service.to_string(),
            delivery_address: "Rua das Flores, 42".to_string(),
            delivery_reference: "Perto da padaria".to_string(),
            payment_method: payment.to_string(),
            change_for: String::new(),
        }
    }

    #[test]
    fn test_compute_total_pickup_waives_fee() {
        let total = compute_total(Price::from_cents(4100), Price::from_cents(500), ServiceType::Pickup);
        assert_eq!(total, Price::from_cents(4100));
    }

    #[test]
    fn test_compute_total_delivery_adds_fee_once() {
        let total =
            compute_total(Price::from_cents(4100), Price::from_cents(500), ServiceType::Delivery);
        assert_eq!(total, Price::from_cents(4600));
    }

    #[test]
    fn test_validate_empty_name() {
        let mut form = form("delivery", "pix");
        form.customer_name = "   ".to_string();
        assert_eq!(
            validate(&form).unwrap_err(),
            CheckoutError::MissingRequiredField(RequiredField::CustomerName)
        );
    }

    #[test]
    fn test_validate_required_fields_in_order() {
        let empty = CheckoutForm::default();
        assert_eq!(
            validate(&empty).unwrap_err(),
            CheckoutError::MissingRequiredField(RequiredField::CustomerName)
        );

        let mut form = form("", "");
        assert_eq!(
            validate(&form).unwrap_err(),
            CheckoutError::MissingRequiredField(RequiredField::ServiceType)
        );
        form.service_type = "pickup".to_string();
        assert_eq!(
            validate(&form).unwrap_err(),
            CheckoutError::MissingRequiredField(RequiredField::PaymentMethod)
        );
    }

    #[test]
    fn test_validate_delivery_without_address() {
        let mut form = form("delivery", "card");
        form.delivery_address = String::new();
        assert_eq!(validate(&form).unwrap_err(), CheckoutError::MissingDeliveryAddress);
    }

    #[test]
    fn test_validate_pickup_ignores_address() {
        let mut form = form("pickup", "pix");
        form.delivery_address = String::new();
        let checkout = validate(&form).unwrap();
        assert_eq!(checkout.fulfilment, Fulfilment::Pickup);
    }

    #[test]
    fn test_validate_rejects_unknown_values() {
        assert_eq!(
            validate(&form("teleport", "pix")).unwrap_err(),
            CheckoutError::UnknownServiceType("teleport".to_string())
        );
        assert_eq!(
            validate(&form("pickup", "crypto")).unwrap_err(),
            CheckoutError::UnknownPaymentMethod("crypto".to_string())
        );
    }

    #[test]
    fn test_validate_change_only_for_cash() {
        let mut cash = form("pickup", "dinheiro");
        cash.change_for = "R$ 50,00".to_string();
        assert_eq!(validate(&cash).unwrap().change_for.as_deref(), Some("50,00"));

        let mut pix = form("pickup", "pix");
        pix.change_for = "50".to_string();
        assert_eq!(validate(&pix).unwrap().change_for, None);
    }

    #[test]
    fn test_validate_does_not_mutate_form() {
        let form = form("delivery", "pix");
        let before = form.clone();
        let _ = validate(&form);
        assert_eq!(form, before);
    }

    #[test]
    fn test_summary_for_delivery_and_pickup() {
        let cart = scenario_cart();
        let settings = settings(500, "5521999990000");

        let delivery = OrderSummary::compute(&cart, &settings, ServiceType::Delivery);
        assert_eq!(delivery.subtotal, Price::new(Decimal::new(4100, 2)));
        assert_eq!(delivery.delivery_fee, Some(Price::from_cents(500)));
        assert_eq!(delivery.total, Price::from_cents(4600));

        let pickup = OrderSummary::compute(&cart, &settings, ServiceType::Pickup);
        assert_eq!(pickup.delivery_fee, None);
        assert_eq!(pickup.total, Price::from_cents(4100));
        assert_eq!(pickup.item_count, 2);
    }

    #[test]
    fn test_prepare_order_rejects_closed_store_and_empty_cart() {
        let mut closed = settings(500, "");
        closed.is_open = false;
        let err = prepare_order(&scenario_cart(), &form("pickup", "pix"), &closed, "55", WHATSAPP_BASE_URL)
            .unwrap_err();
        assert_eq!(err, CheckoutError::StoreClosed);

        let err = prepare_order(
            &Cart::new(),
            &form("pickup", "pix"),
            &settings(500, ""),
            "55",
            WHATSAPP_BASE_URL,
        )
        .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[test]
    fn test_prepare_order_destination_fallback() {
        let cart = scenario_cart();
        let form = form("pickup", "pix");

        let handoff =
            prepare_order(&cart, &form, &settings(0, "  "), "5521979917408", WHATSAPP_BASE_URL)
                .unwrap();
        assert_eq!(handoff.link.destination(), "5521979917408");

        let handoff = prepare_order(
            &cart,
            &form,
            &settings(0, "+55 (21) 99999-0000"),
            "5521979917408",
            WHATSAPP_BASE_URL,
        )
        .unwrap();
        assert_eq!(handoff.link.destination(), "5521999990000");
    }
}
