//! Order message sent to the merchant.
//!
//! The text is WhatsApp-flavoured markdown (`*bold*`, `_italic_`) with `\n`
//! line breaks. The layout is part of the contract with the merchant and is
//! pinned by tests: change it only together with them.

use crate::cart::Cart;
use crate::types::{Price, StoreSettings};

use super::{Fulfilment, ValidatedCheckout};

/// First line of every order.
pub const ORDER_HEADER: &str = "🍇 *NOVO PEDIDO*";

/// Render the order text.
///
/// Sections, in order: header, items (with an add-on sub-line where present),
/// subtotal, delivery fee or pickup notice, total, customer, address block
/// (delivery only), service and payment, change (cash only).
#[must_use]
pub fn build_order_message(
    cart: &Cart,
    checkout: &ValidatedCheckout,
    settings: &StoreSettings,
    total: Price,
) -> String {
    let mut lines: Vec<String> = vec![
        ORDER_HEADER.to_owned(),
        String::new(),
        "*Itens:*".to_owned(),
    ];

    for item in cart.items() {
        lines.push(format!(
            "• {}x {} - {}",
            item.quantity,
            item.name,
            item.line_total()
        ));
        if !item.selected_addons.is_empty() {
            lines.push(format!("  _Adicionais: {}_", item.addon_names()));
        }
    }

    lines.push(String::new());
    lines.push(format!("Subtotal: {}", cart.subtotal()));
    lines.push(match checkout.fulfilment {
        Fulfilment::Delivery(_) => format!("Taxa de entrega: {}", settings.delivery_fee),
        Fulfilment::Pickup => "Retirada no local".to_owned(),
    });
    lines.push(format!("*Total: {total}*"));
    lines.push(String::new());

    lines.push(format!("*Cliente:* {}", checkout.customer_name));
    lines.push(format!("*Telefone:* {}", checkout.customer_phone));
    if let Some(delivery) = checkout.fulfilment.delivery() {
        lines.push(format!("*Endereço:* {}", delivery.address));
        if let Some(reference) = &delivery.reference {
            lines.push(format!("*Referência:* {reference}"));
        }
    }
    lines.push(format!("*Serviço:* {}", checkout.service_type().label()));
    lines.push(format!("*Pagamento:* {}", checkout.payment_method.label()));

    if checkout.payment_method.accepts_change()
        && let Some(change) = &checkout.change_for
    {
        lines.push(format!("Troco para: R$ {change}"));
    }

    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::tests::{form, scenario_cart, settings};
    use super::super::{OrderSummary, validate};
    use super::*;
    use crate::cart::SelectedAddon;
    use crate::types::{AddonId, ProductId};

    fn render(service: &str, payment: &str, change: &str) -> String {
        let cart = scenario_cart();
        let settings = settings(500, "5521999990000");
        let mut form = form(service, payment);
        form.change_for = change.to_string();
        let checkout = validate(&form).unwrap();
        let summary = OrderSummary::compute(&cart, &settings, checkout.service_type());
        build_order_message(&cart, &checkout, &settings, summary.total)
    }

    #[test]
    fn test_delivery_message_layout() {
        let message = render("delivery", "pix", "");
        let expected = "🍇 *NOVO PEDIDO*\n\
            \n\
            *Itens:*\n\
            • 2x Açaí 500ml - R$ 41,00\n\
            \x20 _Adicionais: Granola_\n\
            \n\
            Subtotal: R$ 41,00\n\
            Taxa de entrega: R$ 5,00\n\
            *Total: R$ 46,00*\n\
            \n\
            *Cliente:* Maria Silva\n\
            *Telefone:* (21) 98888-7777\n\
            *Endereço:* Rua das Flores, 42\n\
            *Referência:* Perto da padaria\n\
            *Serviço:* Entrega\n\
            *Pagamento:* Pix";
        assert_eq!(message, expected);
    }

    #[test]
    fn test_pickup_message_omits_address_block() {
        let message = render("pickup", "cartao", "");
        assert!(message.contains("Retirada no local"));
        assert!(message.contains("*Total: R$ 41,00*"));
        assert!(!message.contains("Taxa de entrega"));
        assert!(!message.contains("*Endereço:*"));
        assert!(!message.contains("*Referência:*"));
        assert!(message.ends_with("*Serviço:* Retirada\n*Pagamento:* Cartão"));
    }

    #[test]
    fn test_cash_with_change_adds_change_line() {
        let message = render("pickup", "dinheiro", "50,00");
        assert!(message.ends_with("*Pagamento:* Dinheiro\nTroco para: R$ 50,00"));

        let without_change = render("pickup", "dinheiro", "");
        assert!(!without_change.contains("Troco"));
    }

    #[test]
    fn test_item_without_addons_has_no_sub_line() {
        let mut cart = scenario_cart();
        cart.add_item(ProductId::generate(), "Água", Price::from_cents(350), vec![], None);
        let settings = settings(0, "");
        let checkout = validate(&form("pickup", "pix")).unwrap();
        let message = build_order_message(&cart, &checkout, &settings, cart.subtotal());

        assert!(message.contains("• 1x Água - R$ 3,50\n\nSubtotal: R$ 44,50"));
        assert_eq!(message.matches("_Adicionais:").count(), 1);
    }

    #[test]
    fn test_multiple_addons_are_comma_joined() {
        let mut cart = Cart::new();
        let addons = ["Granola", "Leite condensado"]
            .iter()
            .map(|name| SelectedAddon {
                id: AddonId::generate(),
                name: (*name).to_string(),
                price: Price::from_cents(200),
            })
            .collect();
        cart.add_item(ProductId::generate(), "Açaí 300ml", Price::from_cents(1200), addons, None);
        let checkout = validate(&form("pickup", "pix")).unwrap();
        let message = build_order_message(&cart, &checkout, &settings(0, ""), cart.subtotal());

        assert!(message.contains("• 1x Açaí 300ml - R$ 16,00\n  _Adicionais: Granola, Leite condensado_"));
    }

    #[test]
    fn test_message_is_deterministic() {
        assert_eq!(render("delivery", "pix", ""), render("delivery", "pix", ""));
    }
}
