//! Read-only checks against a hosted backend.
//!
//! These tests require:
//! - `SUPABASE_URL` and `SUPABASE_ANON_KEY` in the environment (or `.env`)
//! - The `categories`, `products`, `addons` and `store_settings` tables
//!
//! Run with: cargo test -p cardapio-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used)]

use cardapio_backend::{BackendConfig, SupabaseClient};
use cardapio_core::providers::{CatalogProvider, SettingsProvider};
use cardapio_storefront::{AppState, StorefrontConfig};

fn client() -> SupabaseClient {
    let config = BackendConfig::from_env().expect("SUPABASE_URL and SUPABASE_ANON_KEY must be set");
    SupabaseClient::new(&config).expect("Failed to create backend client")
}

#[tokio::test]
#[ignore = "Requires a hosted backend"]
async fn test_live_active_products_only() {
    let products = client().active_products().await.unwrap();
    assert!(products.iter().all(|p| p.active));
    assert!(
        products
            .windows(2)
            .all(|pair| matches!(pair, [a, b] if a.sort_order <= b.sort_order))
    );
}

#[tokio::test]
#[ignore = "Requires a hosted backend"]
async fn test_live_settings_row() {
    let settings = client().store_settings().await.unwrap();
    assert!(!settings.store_name.is_empty());
    assert!(!settings.delivery_fee.is_negative());
}

#[tokio::test]
#[ignore = "Requires a hosted backend"]
async fn test_live_menu_loads() {
    let backend = BackendConfig::from_env().unwrap();
    let state = AppState::connect(StorefrontConfig::default(), &backend).unwrap();
    let menu = state.menu().menu().await.unwrap();
    assert!(menu.sections().iter().all(|s| !s.products.is_empty()));
}
