//! Cardápio Storefront library.
//!
//! Menu browsing, the session cart and WhatsApp checkout. The crate is a
//! library so that any front end (the `cardapio` CLI, a web server, tests)
//! can drive it.
//!
//! # Modules
//!
//! - [`menu`] - Cached menu and store settings
//! - [`cart_store`] - Observable cart
//! - [`session`] - Per-visit cart, form and checkout phase
//! - [`checkout`] - Order submission
//! - [`handoff`] - Transports that open the order link

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart_store;
pub mod checkout;
pub mod config;
pub mod error;
pub mod handoff;
pub mod menu;
pub mod session;
pub mod state;

pub use cart_store::{CartStore, CartSummary};
pub use checkout::submit_order;
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use handoff::{HandoffError, HandoffTransport, TracingTransport};
pub use menu::{Menu, MenuSection, MenuService};
pub use session::{CheckoutPhase, ShoppingSession};
pub use state::AppState;
