//! Order submission.

use cardapio_core::checkout::prepare_order;
use cardapio_core::{CheckoutForm, ExternalHandoff, StoreSettings};
use tracing::{info, instrument, warn};

use crate::cart_store::CartStore;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::handoff::HandoffTransport;

/// Validate the form, build the order and hand it to `transport`.
///
/// The order is checked in this sequence: store open, cart non-empty, form
/// valid. The message goes to the store's WhatsApp number, or to
/// `config.default_destination` when the store has none. The cart is cleared
/// only once the transport reports the handoff as initiated; on any error it
/// is left untouched.
///
/// # Errors
///
/// - `StorefrontError::Checkout` for a closed store, an empty cart or an
///   invalid form
/// - `StorefrontError::Handoff` if the transport fails
#[instrument(skip_all, fields(items = cart.cart().len()))]
pub async fn submit_order<T>(
    cart: &mut CartStore,
    form: &CheckoutForm,
    settings: &StoreSettings,
    transport: &T,
    config: &StorefrontConfig,
) -> Result<ExternalHandoff>
where
    T: HandoffTransport + Sync,
{
    let handoff = prepare_order(
        cart.cart(),
        form,
        settings,
        &config.default_destination,
        config.whatsapp_base(),
    )
    .inspect_err(|e| warn!(error = %e, "Order rejected"))?;

    transport.open(&handoff.link).await?;
    cart.clear();

    info!(
        service = %handoff.checkout.service_type(),
        total = %handoff.summary.total,
        destination = %handoff.link.destination(),
        "Order handed off"
    );
    Ok(handoff)
}
