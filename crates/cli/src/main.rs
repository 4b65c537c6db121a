//! Cardápio CLI - browse the menu, place orders, manage the catalog.
//!
//! # Usage
//!
//! ```bash
//! # List the menu and the store status
//! cardapio menu
//!
//! # Place an order described in a JSON file
//! cardapio order pedido.json
//!
//! # Back office
//! cardapio admin -e dona@acai.com products list
//! ```
//!
//! # Commands
//!
//! - `menu` - Show the menu
//! - `order` - Build a cart from a file and hand it off to WhatsApp
//! - `admin` - Manage categories, products, add-ons and settings
//!
//! Output goes through `tracing`; set `RUST_LOG` to change verbosity and
//! `--json` for machine-readable logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use cardapio_admin::AdminConfig;
use cardapio_backend::BackendConfig;
use cardapio_storefront::{AppState, StorefrontConfig};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::admin::{AdminCommand, Credentials};

#[derive(Parser)]
#[command(name = "cardapio")]
#[command(author, version, about = "Cardápio storefront and back office")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu and the store status
    Menu,
    /// Place an order described in a JSON file
    Order {
        /// Path to the order file
        file: PathBuf,

        /// Show totals and the message without handing off
        #[arg(long)]
        preview: bool,
    },
    /// Back-office management
    Admin {
        #[command(flatten)]
        credentials: Credentials,

        #[command(subcommand)]
        command: AdminCommand,
    },
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "cardapio=info,cardapio_storefront=info,cardapio_admin=info,cardapio_backend=warn".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json);

    if let Err(e) = run(cli).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> commands::Result<()> {
    let backend = BackendConfig::from_env()?;

    match cli.command {
        Commands::Menu => {
            let state = AppState::connect(StorefrontConfig::from_env()?, &backend)?;
            commands::menu::show(&state).await
        }
        Commands::Order { file, preview } => {
            let state = AppState::connect(StorefrontConfig::from_env()?, &backend)?;
            commands::order::place(&state, &file, preview).await
        }
        Commands::Admin {
            credentials,
            command,
        } => {
            let config = AdminConfig::from_env()?;
            commands::admin::run(&backend, &config, credentials, command).await
        }
    }
}
