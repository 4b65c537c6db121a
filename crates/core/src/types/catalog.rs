//! Catalog and store-settings records.
//!
//! Field names follow the hosted database columns through serde renames so
//! rows deserialize directly from the REST API.

use serde::{Deserialize, Serialize};

use super::id::{AddonId, CategoryId, ProductId, SettingsId};
use super::money::Price;

/// A menu section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub sort_order: i32,
}

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Public image URL, empty when the product has no picture.
    #[serde(rename = "image_url", default)]
    pub image_ref: String,
    pub active: bool,
    pub sort_order: i32,
}

impl Product {
    /// The image URL, if one is set.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        let image = self.image_ref.trim();
        (!image.is_empty()).then_some(image)
    }
}

/// An optional priced extra (e.g. granola, condensed milk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub id: AddonId,
    pub name: String,
    pub price: Price,
    pub active: bool,
}

/// Store-wide configuration edited in the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub id: SettingsId,
    pub store_name: String,
    #[serde(default)]
    pub store_address: String,
    /// Whether new orders may be placed.
    pub is_open: bool,
    /// Free-text estimate such as "40-60 min".
    #[serde(rename = "delivery_time", default)]
    pub delivery_time_label: String,
    pub delivery_fee: Price,
    /// WhatsApp number that receives orders; may be blank.
    #[serde(rename = "whatsapp_number", default)]
    pub whatsapp_destination: String,
}

/// Insert/update payload for a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    pub sort_order: i32,
}

/// Insert/update payload for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(rename = "image_url")]
    pub image_ref: String,
    pub active: bool,
    pub sort_order: i32,
}

/// Insert/update payload for an add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddonDraft {
    pub name: String,
    pub price: Price,
    pub active: bool,
}

/// Update payload for the settings row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsDraft {
    pub store_name: String,
    pub store_address: String,
    pub is_open: bool,
    #[serde(rename = "delivery_time")]
    pub delivery_time_label: String,
    pub delivery_fee: Price,
    #[serde(rename = "whatsapp_number")]
    pub whatsapp_destination: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_deserializes_database_columns() {
        let json = r#"{
            "id": "6f1c2f3e-8a51-4b9e-9d57-0d4c6cbb2a10",
            "category_id": "0b6a8f0e-2b83-4d0a-8f38-3a4a3c1d9e11",
            "name": "Açaí 500ml",
            "description": "Copo grande",
            "price": 18.0,
            "image_url": "https://cdn.example.test/acai.png",
            "active": true,
            "sort_order": 2,
            "created_at": "2024-05-01T12:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Açaí 500ml");
        assert_eq!(product.price, Price::from_cents(1800));
        assert_eq!(product.image(), Some("https://cdn.example.test/acai.png"));
    }

    #[test]
    fn test_product_without_image() {
        let json = r#"{
            "id": "6f1c2f3e-8a51-4b9e-9d57-0d4c6cbb2a10",
            "category_id": "0b6a8f0e-2b83-4d0a-8f38-3a4a3c1d9e11",
            "name": "Água",
            "price": "3.50",
            "image_url": "  ",
            "active": true,
            "sort_order": 0
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.image(), None);
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_settings_row_maps_renamed_columns() {
        let json = r#"{
            "id": "a3f7b1b2-4c34-4a53-9f1d-5b2f0e9c7d21",
            "store_name": "Açaí da Praça",
            "store_address": "Rua A, 10",
            "is_open": true,
            "delivery_time": "40-60 min",
            "delivery_fee": 5,
            "whatsapp_number": "5521999990000"
        }"#;

        let settings: StoreSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.delivery_time_label, "40-60 min");
        assert_eq!(settings.delivery_fee, Price::from_cents(500));
        assert_eq!(settings.whatsapp_destination, "5521999990000");
    }

    #[test]
    fn test_settings_draft_serializes_database_columns() {
        let draft = SettingsDraft {
            store_name: "Loja".to_string(),
            store_address: String::new(),
            is_open: false,
            delivery_time_label: "30 min".to_string(),
            delivery_fee: Price::from_cents(700),
            whatsapp_destination: "5521".to_string(),
        };

        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["delivery_time"], "30 min");
        assert_eq!(value["whatsapp_number"], "5521");
        assert!(value.get("delivery_time_label").is_none());
    }
}
