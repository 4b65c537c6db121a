//! Back-office services.
//!
//! - `auth` - Email and password sign-in gated on the admin role
//! - `catalog` - Category, product, add-on and settings management

pub mod auth;
pub mod catalog;

pub use auth::AdminAuthService;
pub use catalog::{CatalogAdminService, Dashboard, ImageUpload};
