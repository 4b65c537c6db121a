//! Delivery of a prepared order to the merchant.
//!
//! A [`HandoffTransport`] opens the click-to-chat link. The storefront only
//! learns whether the handoff was *initiated*; whether the customer actually
//! sends the message is outside its control.

use core::future::Future;

use cardapio_core::HandoffLink;
use thiserror::Error;
use tracing::info;

/// The handoff could not be initiated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandoffError {
    /// The transport refused or failed to open the link.
    #[error("could not open handoff link: {0}")]
    Unavailable(String),
}

/// Opens a handoff link (browser tab, deep link, log line...).
pub trait HandoffTransport {
    fn open(&self, link: &HandoffLink) -> impl Future<Output = Result<(), HandoffError>> + Send;
}

/// Transport that records the link in the log.
///
/// Used by the command-line front end, where a human copies the link.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTransport;

impl HandoffTransport for TracingTransport {
    async fn open(&self, link: &HandoffLink) -> Result<(), HandoffError> {
        info!(
            destination = %link.destination(),
            url = %link.url(),
            "Order handoff link ready"
        );
        Ok(())
    }
}
