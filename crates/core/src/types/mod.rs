//! Core types for the Cardápio storefront.
//!
//! This module provides type-safe wrappers for ids, money, checkout choices,
//! back-office emails and catalog records.

pub mod catalog;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use catalog::*;
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CURRENCY_PREFIX, Price, format_amount};
pub use status::*;
