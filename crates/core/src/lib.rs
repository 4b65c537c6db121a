//! Cardápio Core - cart, checkout and catalog types.
//!
//! This crate provides the types shared by every Cardápio component:
//! - `storefront` - Menu browsing, cart and WhatsApp checkout
//! - `admin` - Back office for the catalog and store settings
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no I/O, no
//! HTTP clients. External collaborators are described by the traits in
//! [`providers`] and implemented elsewhere.
//!
//! # Modules
//!
//! - [`types`] - IDs, money, checkout enums, catalog records
//! - [`cart`] - The session cart and its totals
//! - [`checkout`] - Validation, totals, order message and handoff link
//! - [`providers`] - Catalog, settings, auth and admin-store contracts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod providers;
pub mod types;

pub use cart::{Cart, CartLineItem, SelectedAddon};
pub use checkout::{
    CheckoutError, CheckoutForm, ExternalHandoff, HandoffLink, OrderSummary, ValidatedCheckout,
};
pub use providers::ProviderError;
pub use types::*;
