//! Pre-filled chat link used to hand the order to the merchant.

use serde::{Deserialize, Serialize};

/// Public click-to-chat endpoint.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Keep only the digits of a phone number (`+55 (21) 9...` → `55219...`).
#[must_use]
pub fn normalize_destination(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// A click-to-chat URL carrying the order text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffLink {
    destination: String,
    message: String,
    url: String,
}

impl HandoffLink {
    /// Build `{base_url}/{destination}?text={percent-encoded message}`.
    #[must_use]
    pub fn new(base_url: &str, destination: impl Into<String>, message: impl Into<String>) -> Self {
        let destination = destination.into();
        let message = message.into();
        let url = format!(
            "{}/{}?text={}",
            base_url.trim_end_matches('/'),
            destination,
            urlencoding::encode(&message)
        );
        Self {
            destination,
            message,
            url,
        }
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The unencoded order text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}
