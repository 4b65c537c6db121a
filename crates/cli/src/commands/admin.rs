//! Back-office commands.
//!
//! # Usage
//!
//! ```bash
//! # Credentials may also come from CARDAPIO_ADMIN_EMAIL / CARDAPIO_ADMIN_PASSWORD
//! cardapio admin -e dona@acai.com -p segredo dashboard
//!
//! cardapio admin categories add --name "Açaí" --sort-order 1
//! cardapio admin products add --name "Açaí 500ml" --price 18,00 --category <id> --image foto.png
//! cardapio admin products update <id> --inactive
//! cardapio admin addons delete <id>
//! cardapio admin settings update --closed
//!
//! # Request an account (the admin role is granted separately)
//! cardapio admin -e nova@acai.com -p segredo sign-up
//! ```
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY` - Backend connection
//! - `ADMIN_IMAGE_BUCKET` - Bucket for product images

use std::path::{Path, PathBuf};

use cardapio_admin::{
    AddonForm, AdminAuthService, AdminConfig, AdminSession, CatalogAdminService, CategoryForm,
    ImageUpload, ProductForm, SettingsForm,
};
use cardapio_backend::{BackendConfig, SupabaseCatalogStore, SupabaseClient};
use cardapio_core::{AddonId, CategoryId, ProductId};
use clap::{Args, Subcommand};
use secrecy::SecretString;
use tracing::{info, warn};

use super::{CliError, Result};

type Catalog = CatalogAdminService<SupabaseCatalogStore>;

/// Administrator credentials.
#[derive(Args)]
pub struct Credentials {
    /// Administrator email
    #[arg(short, long, env = "CARDAPIO_ADMIN_EMAIL")]
    pub email: String,

    /// Administrator password
    #[arg(short, long, env = "CARDAPIO_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Show catalog counts and the store status
    Dashboard,
    /// Request a new account
    SignUp,
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage add-ons
    Addons {
        #[command(subcommand)]
        action: AddonAction,
    },
    /// Show or change the store settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    List,
    Add(CategoryArgs),
    Update {
        id: CategoryId,
        #[command(flatten)]
        fields: CategoryArgs,
    },
    Delete {
        id: CategoryId,
    },
}

#[derive(Args)]
pub struct CategoryArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub sort_order: Option<i32>,
}

#[derive(Subcommand)]
pub enum ProductAction {
    List,
    Add(ProductArgs),
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductArgs,
    },
    Delete {
        id: ProductId,
    },
}

#[derive(Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Price such as 18,50
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub category: Option<CategoryId>,
    /// Public URL of an existing image
    #[arg(long, conflicts_with = "image")]
    pub image_url: Option<String>,
    /// Local image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
    #[arg(long)]
    pub sort_order: Option<i32>,
    /// Hide the product from the menu
    #[arg(long, conflicts_with = "active")]
    pub inactive: bool,
    /// Show the product on the menu
    #[arg(long)]
    pub active: bool,
}

#[derive(Subcommand)]
pub enum AddonAction {
    List,
    Add(AddonArgs),
    Update {
        id: AddonId,
        #[command(flatten)]
        fields: AddonArgs,
    },
    Delete {
        id: AddonId,
    },
}

#[derive(Args)]
pub struct AddonArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long, conflicts_with = "active")]
    pub inactive: bool,
    #[arg(long)]
    pub active: bool,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    Show,
    Update(SettingsArgs),
}

#[derive(Args)]
pub struct SettingsArgs {
    #[arg(long)]
    pub store_name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Start accepting orders
    #[arg(long, conflicts_with = "closed")]
    pub open: bool,
    /// Stop accepting orders
    #[arg(long)]
    pub closed: bool,
    /// Estimate such as "40-60 min"
    #[arg(long)]
    pub delivery_time: Option<String>,
    #[arg(long)]
    pub delivery_fee: Option<String>,
    /// Number that receives orders
    #[arg(long)]
    pub whatsapp: Option<String>,
}

/// Returns `Some(true)` / `Some(false)` when one of a pair of switches is set.
const fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl CategoryArgs {
    fn apply(self, form: &mut CategoryForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(sort_order) = self.sort_order {
            form.sort_order = sort_order;
        }
    }
}

impl ProductArgs {
    /// Copy the given fields onto `form`; returns the image file, if any.
    fn apply(self, form: &mut ProductForm) -> Option<PathBuf> {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if self.category.is_some() {
            form.category_id = self.category;
        }
        if let Some(image_url) = self.image_url {
            form.image_ref = image_url;
        }
        if let Some(sort_order) = self.sort_order {
            form.sort_order = sort_order;
        }
        if let Some(active) = switch(self.active, self.inactive) {
            form.active = active;
        }
        self.image
    }
}

impl AddonArgs {
    fn apply(self, form: &mut AddonForm) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(active) = switch(self.active, self.inactive) {
            form.active = active;
        }
    }
}

impl SettingsArgs {
    fn apply(self, form: &mut SettingsForm) {
        if let Some(store_name) = self.store_name {
            form.store_name = store_name;
        }
        if let Some(address) = self.address {
            form.store_address = address;
        }
        if let Some(is_open) = switch(self.open, self.closed) {
            form.is_open = is_open;
        }
        if let Some(delivery_time) = self.delivery_time {
            form.delivery_time_label = delivery_time;
        }
        if let Some(delivery_fee) = self.delivery_fee {
            form.delivery_fee = delivery_fee;
        }
        if let Some(whatsapp) = self.whatsapp {
            form.whatsapp_destination = whatsapp;
        }
    }
}

/// Sign in, run `command`, and sign out again.
///
/// # Errors
///
/// Returns any authentication, validation or backend error.
pub async fn run(
    backend: &BackendConfig,
    config: &AdminConfig,
    credentials: Credentials,
    command: AdminCommand,
) -> Result<()> {
    let client = SupabaseClient::new(backend)?;
    let auth = AdminAuthService::new(client.clone(), config);
    let password = SecretString::from(credentials.password);

    if matches!(command, AdminCommand::SignUp) {
        auth.sign_up(&credentials.email, &password).await?;
        info!(
            email = %credentials.email,
            "Conta criada; aguarde a liberação de acesso de administrador"
        );
        return Ok(());
    }

    let session = auth.sign_in(&credentials.email, &password).await?;
    let catalog = CatalogAdminService::for_session(&client, &session, config);
    let result = execute(&catalog, &session, command).await;

    if let Err(e) = auth.sign_out(session).await {
        warn!(error = %e, "Failed to sign out");
    }
    result
}

async fn execute(catalog: &Catalog, session: &AdminSession, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::SignUp => Ok(()),
        AdminCommand::Dashboard => {
            let dashboard = catalog.dashboard().await?;
            info!(
                categories = dashboard.categories,
                products = dashboard.products,
                active_products = dashboard.active_products,
                addons = dashboard.addons,
                "{} ({})",
                dashboard.settings.store_name,
                if dashboard.settings.is_open { "aberta" } else { "fechada" }
            );
            Ok(())
        }
        AdminCommand::Categories { action } => categories(catalog, session, action).await,
        AdminCommand::Products { action } => products(catalog, session, action).await,
        AdminCommand::Addons { action } => addons(catalog, session, action).await,
        AdminCommand::Settings { action } => settings(catalog, session, action).await,
    }
}

async fn categories(
    catalog: &Catalog,
    session: &AdminSession,
    action: CategoryAction,
) -> Result<()> {
    match action {
        CategoryAction::List => {
            for category in catalog.list_categories().await? {
                info!(id = %category.id, sort_order = category.sort_order, "{}", category.name);
            }
        }
        CategoryAction::Add(fields) => {
            let mut form = CategoryForm::default();
            fields.apply(&mut form);
            let category = catalog.save_category(session, None, &form).await?;
            info!(id = %category.id, "Categoria salva");
        }
        CategoryAction::Update { id, fields } => {
            let existing = catalog
                .list_categories()
                .await?
                .into_iter()
                .find(|c| c.id == id)
                .ok_or_else(|| not_found("categoria", id))?;
            let mut form = CategoryForm::from(&existing);
            fields.apply(&mut form);
            catalog.save_category(session, Some(id), &form).await?;
            info!(%id, "Categoria salva");
        }
        CategoryAction::Delete { id } => {
            catalog.delete_category(session, id).await?;
            info!(%id, "Categoria removida");
        }
    }
    Ok(())
}

async fn products(
    catalog: &Catalog,
    session: &AdminSession,
    action: ProductAction,
) -> Result<()> {
    match action {
        ProductAction::List => {
            for product in catalog.list_products().await? {
                info!(
                    id = %product.id,
                    active = product.active,
                    "{} - {}",
                    product.name,
                    product.price
                );
            }
        }
        ProductAction::Add(fields) => {
            let mut form = ProductForm::default();
            let image = fields.apply(&mut form);
            save_product(catalog, session, None, &form, image.as_deref()).await?;
        }
        ProductAction::Update { id, fields } => {
            let existing = catalog
                .list_products()
                .await?
                .into_iter()
                .find(|p| p.id == id)
                .ok_or_else(|| not_found("produto", id))?;
            let mut form = ProductForm::from(&existing);
            let image = fields.apply(&mut form);
            save_product(catalog, session, Some(id), &form, image.as_deref()).await?;
        }
        ProductAction::Delete { id } => {
            catalog.delete_product(session, id).await?;
            info!(%id, "Produto removido");
        }
    }
    Ok(())
}

async fn save_product(
    catalog: &Catalog,
    session: &AdminSession,
    id: Option<ProductId>,
    form: &ProductForm,
    image: Option<&Path>,
) -> Result<()> {
    let product = match image {
        Some(path) => {
            let upload = read_image(path)?;
            catalog
                .save_product_with_image(session, id, form, upload)
                .await?
        }
        None => catalog.save_product(session, id, form).await?,
    };
    info!(id = %product.id, image = %product.image_ref, "Produto salvo");
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = std::fs::read(path).map_err(|e| CliError::io(path, e))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageUpload {
        file_name,
        content_type: None,
        bytes,
    })
}

async fn addons(catalog: &Catalog, session: &AdminSession, action: AddonAction) -> Result<()> {
    match action {
        AddonAction::List => {
            for addon in catalog.list_addons().await? {
                info!(id = %addon.id, active = addon.active, "{} + {}", addon.name, addon.price);
            }
        }
        AddonAction::Add(fields) => {
            let mut form = AddonForm::default();
            fields.apply(&mut form);
            let addon = catalog.save_addon(session, None, &form).await?;
            info!(id = %addon.id, "Adicional salvo");
        }
        AddonAction::Update { id, fields } => {
            let existing = catalog
                .list_addons()
                .await?
                .into_iter()
                .find(|a| a.id == id)
                .ok_or_else(|| not_found("adicional", id))?;
            let mut form = AddonForm::from(&existing);
            fields.apply(&mut form);
            catalog.save_addon(session, Some(id), &form).await?;
            info!(%id, "Adicional salvo");
        }
        AddonAction::Delete { id } => {
            catalog.delete_addon(session, id).await?;
            info!(%id, "Adicional removido");
        }
    }
    Ok(())
}

async fn settings(
    catalog: &Catalog,
    session: &AdminSession,
    action: SettingsAction,
) -> Result<()> {
    let current = catalog.settings().await?;
    let current = match action {
        SettingsAction::Show => current,
        SettingsAction::Update(fields) => {
            let mut form = SettingsForm::from(&current);
            fields.apply(&mut form);
            catalog.save_settings(session, current.id, &form).await?
        }
    };

    info!(
        address = %current.store_address,
        delivery_time = %current.delivery_time_label,
        delivery_fee = %current.delivery_fee,
        whatsapp = %current.whatsapp_destination,
        "{} ({})",
        current.store_name,
        if current.is_open { "aberta" } else { "fechada" }
    );
    Ok(())
}

fn not_found(kind: &str, id: impl std::fmt::Display) -> CliError {
    CliError::InvalidArgument(format!("{kind} não encontrado(a): {id}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(false, false, None)]
    #[case(true, false, Some(true))]
    #[case(false, true, Some(false))]
    fn test_switch(#[case] on: bool, #[case] off: bool, #[case] expected: Option<bool>) {
        assert_eq!(switch(on, off), expected);
    }

    #[test]
    fn test_product_args_only_touch_given_fields() {
        let mut form = ProductForm {
            name: "Açaí 300ml".to_string(),
            price: "12".to_string(),
            image_ref: "https://cdn.test/a.png".to_string(),
            ..ProductForm::default()
        };
        let args = ProductArgs {
            name: None,
            description: None,
            price: Some("13,50".to_string()),
            category: None,
            image_url: None,
            image: Some(PathBuf::from("nova.png")),
            sort_order: None,
            inactive: true,
            active: false,
        };

        let image = args.apply(&mut form);
        assert_eq!(image, Some(PathBuf::from("nova.png")));
        assert_eq!(form.name, "Açaí 300ml");
        assert_eq!(form.price, "13,50");
        assert_eq!(form.image_ref, "https://cdn.test/a.png");
        assert!(!form.active);
    }

    #[test]
    fn test_settings_args_toggle_open() {
        let mut form = SettingsForm {
            is_open: true,
            ..SettingsForm::default()
        };
        SettingsArgs {
            store_name: None,
            address: None,
            open: false,
            closed: true,
            delivery_time: None,
            delivery_fee: Some("7".to_string()),
            whatsapp: None,
        }
        .apply(&mut form);
        assert!(!form.is_open);
        assert_eq!(form.delivery_fee, "7");
    }
}
