//! Cardápio Backend - hosted database, auth and storage client.
//!
//! Implements the provider traits from `cardapio-core` on top of a Supabase
//! project:
//!
//! - PostgREST tables (`categories`, `products`, `addons`, `store_settings`,
//!   `user_roles`) for the catalog and role checks
//! - the auth API for password sign-in
//! - object storage for product images
//!
//! # Example
//!
//! ```rust,ignore
//! use cardapio_backend::{BackendConfig, SupabaseClient};
//! use cardapio_core::providers::CatalogProvider;
//!
//! let client = SupabaseClient::new(&BackendConfig::from_env()?)?;
//! let products = client.active_products().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
mod storage;

pub use auth::AuthSession;
pub use catalog::SupabaseCatalogStore;
pub use client::SupabaseClient;
pub use config::{BackendConfig, ConfigError};
pub use error::BackendError;
