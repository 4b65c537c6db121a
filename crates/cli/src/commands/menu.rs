//! Menu listing.
//!
//! # Usage
//!
//! ```bash
//! cardapio menu
//! ```

use cardapio_core::providers::{CatalogProvider, SettingsProvider};
use cardapio_storefront::AppState;
use tracing::{info, warn};

use super::Result;

/// Log the store status and every section of the menu.
///
/// # Errors
///
/// Returns `CliError::Provider` if the menu cannot be loaded.
pub async fn show<P>(state: &AppState<P>) -> Result<()>
where
    P: CatalogProvider + SettingsProvider + Sync,
{
    let (menu, settings) = tokio::try_join!(state.menu().menu(), state.menu().settings())?;

    info!(
        store = %settings.store_name,
        address = %settings.store_address,
        delivery_time = %settings.delivery_time_label,
        delivery_fee = %settings.delivery_fee,
        "{}",
        if settings.is_open { "Aberto" } else { "Fechado" }
    );
    if !settings.is_open {
        warn!("A loja está fechada e não aceita pedidos");
    }

    if menu.is_empty() {
        info!("Nenhum produto disponível");
        return Ok(());
    }

    for section in menu.sections() {
        info!("== {} ==", section.category.name);
        for product in &section.products {
            info!(id = %product.id, "{} - {}", product.name, product.price);
            if !product.description.is_empty() {
                info!("   {}", product.description);
            }
        }
    }

    if !menu.addons().is_empty() {
        info!("== Adicionais ==");
        for addon in menu.addons() {
            info!(id = %addon.id, "{} + {}", addon.name, addon.price);
        }
    }

    Ok(())
}
