//! Cardápio back office.
//!
//! Administrators sign in with email and password; only accounts holding the
//! `admin` role get an [`AdminSession`]. With a session they manage the
//! catalog (categories, products, add-ons), product images, and the store
//! settings the storefront reads.
//!
//! The services are generic over the provider traits in `cardapio-core`, so
//! they run against the hosted backend in production and in-memory fakes in
//! tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AdminConfig;
pub use error::{AdminError, Result};
pub use models::{AddonForm, AdminSession, CategoryForm, ProductForm, SettingsForm};
pub use services::{AdminAuthService, CatalogAdminService, Dashboard, ImageUpload};
