//! Place an order from a JSON file.
//!
//! # Usage
//!
//! ```bash
//! # Show totals and the message without opening the link
//! cardapio order pedido.json --preview
//!
//! # Submit: the click-to-chat link is written to the log
//! cardapio order pedido.json
//! ```
//!
//! # File format
//!
//! ```json
//! {
//!   "items": [
//!     { "product_id": "6f1c2f3e-...", "addon_ids": ["0b6a8f0e-..."], "quantity": 2 }
//!   ],
//!   "customer": {
//!     "customer_name": "Ana",
//!     "customer_phone": "21 99999-0000",
//!     "service_type": "entrega",
//!     "delivery_address": "Rua B, 20",
//!     "payment_method": "pix"
//!   }
//! }
//! ```

use std::path::Path;

use cardapio_core::providers::{CatalogProvider, SettingsProvider};
use cardapio_core::{AddonId, CheckoutForm, ProductId, StoreSettings, checkout};
use cardapio_storefront::{AppState, Menu, ShoppingSession, TracingTransport};
use serde::Deserialize;
use tracing::info;

use super::{CliError, Result};

/// One product line in an order file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    #[serde(default)]
    pub addon_ids: Vec<AddonId>,
    #[serde(default = "one")]
    pub quantity: i64,
}

const fn one() -> i64 {
    1
}

/// Contents of an order file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderFile {
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub customer: CheckoutForm,
}

impl OrderFile {
    /// Read and parse an order file.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Io` or `CliError::Json`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Put every line of `order` into `session` and copy the customer form.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a quantity below one, or the
/// storefront error for an unknown product or a closed store.
pub fn fill_session(
    session: &mut ShoppingSession,
    menu: &Menu,
    settings: &StoreSettings,
    order: &OrderFile,
) -> Result<()> {
    for line in &order.items {
        if line.quantity < 1 {
            return Err(CliError::InvalidArgument(format!(
                "quantity for {} must be at least 1",
                line.product_id
            )));
        }
        let item = session.add_product(menu, settings, line.product_id, &line.addon_ids)?;
        if line.quantity > 1 {
            session.update_quantity(item.id, line.quantity);
        }
    }
    session.set_form(order.customer.clone());
    Ok(())
}

/// Load `path`, fill a fresh session and either preview or submit it.
///
/// # Errors
///
/// Returns any error from loading the file, the menu, or checkout.
pub async fn place<P>(state: &AppState<P>, path: &Path, preview: bool) -> Result<()>
where
    P: CatalogProvider + SettingsProvider + Sync,
{
    let order = OrderFile::load(path)?;
    let (menu, settings) = tokio::try_join!(state.menu().menu(), state.menu().settings())?;

    let mut session = state.new_session();
    fill_session(&mut session, &menu, &settings, &order)?;

    if preview {
        let config = state.config();
        let prepared = checkout::prepare_order(
            session.cart().cart(),
            session.form(),
            &settings,
            &config.default_destination,
            config.whatsapp_base(),
        )
        .map_err(cardapio_storefront::StorefrontError::from)?;
        log_summary(&prepared.summary);
        for line in prepared.link.message().lines() {
            info!("{line}");
        }
        return Ok(());
    }

    let handoff = session
        .submit(&settings, &TracingTransport, state.config())
        .await?;
    log_summary(&handoff.summary);
    info!(url = %handoff.link.url(), "Abra o link para enviar o pedido pelo WhatsApp");
    Ok(())
}

fn log_summary(summary: &cardapio_core::OrderSummary) {
    info!(
        items = summary.item_count,
        subtotal = %summary.subtotal,
        delivery_fee = %summary
            .delivery_fee
            .map_or_else(|| "-".to_string(), |fee| fee.to_string()),
        total = %summary.total,
        "Resumo do pedido"
    );
}
