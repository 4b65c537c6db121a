//! Back-office models.
//!
//! - [`forms`] - Edit forms for categories, products, add-ons and settings
//! - [`session`] - The signed-in administrator

pub mod forms;
pub mod session;

pub use forms::{AddonForm, CategoryForm, ProductForm, SettingsForm, parse_price};
pub use session::AdminSession;
