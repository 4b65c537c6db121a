//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_DEFAULT_WHATSAPP` - Number that receives orders when the store
//!   settings leave it blank (default: 5521979917408)
//! - `STOREFRONT_WHATSAPP_BASE_URL` - Click-to-chat endpoint (default: <https://wa.me>)
//! - `STOREFRONT_MENU_CACHE_TTL_SECS` - Menu cache lifetime (default: 300)
//!
//! Backend connection variables are documented in `cardapio_backend::config`.

use std::time::Duration;

use cardapio_backend::config::{get_env_or_default, parse_url};
use cardapio_core::checkout::{WHATSAPP_BASE_URL, normalize_destination};

pub use cardapio_backend::ConfigError;

/// Order destination used when nothing else is configured.
pub const DEFAULT_WHATSAPP_DESTINATION: &str = "5521979917408";

const DEFAULT_MENU_CACHE_TTL_SECS: u64 = 300;

/// Storefront application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Digits-only fallback WhatsApp number
    pub default_destination: String,
    /// Click-to-chat base URL
    pub whatsapp_base_url: String,
    /// How long menu data stays cached
    pub menu_cache_ttl: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            default_destination: DEFAULT_WHATSAPP_DESTINATION.to_string(),
            whatsapp_base_url: WHATSAPP_BASE_URL.to_string(),
            menu_cache_ttl: Duration::from_secs(DEFAULT_MENU_CACHE_TTL_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let default_destination = parse_destination(
            "STOREFRONT_DEFAULT_WHATSAPP",
            &get_env_or_default("STOREFRONT_DEFAULT_WHATSAPP", DEFAULT_WHATSAPP_DESTINATION),
        )?;
        let whatsapp_base_url = parse_url(
            "STOREFRONT_WHATSAPP_BASE_URL",
            &get_env_or_default("STOREFRONT_WHATSAPP_BASE_URL", WHATSAPP_BASE_URL),
        )?
        .to_string();
        let menu_cache_ttl = get_env_or_default(
            "STOREFRONT_MENU_CACHE_TTL_SECS",
            &DEFAULT_MENU_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_MENU_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            default_destination,
            whatsapp_base_url,
            menu_cache_ttl,
        })
    }

    /// Base URL as passed to the handoff link builder.
    #[must_use]
    pub fn whatsapp_base(&self) -> &str {
        &self.whatsapp_base_url
    }
}

/// Normalize a phone number, rejecting values without digits.
fn parse_destination(key: &str, value: &str) -> Result<String, ConfigError> {
    let digits = normalize_destination(value);
    if digits.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must contain a phone number".to_string(),
        ));
    }
    Ok(digits)
}
