//! Back-office edit forms and their validation.
//!
//! Forms hold what the operator typed. `validate` turns a form into the
//! insert/update payload or reports the first invalid field with a message
//! meant for the operator.

use std::str::FromStr;

use cardapio_core::checkout::normalize_destination;
use cardapio_core::{
    Addon, AddonDraft, Category, CategoryDraft, CategoryId, CURRENCY_PREFIX, Price, Product,
    ProductDraft, SettingsDraft, StoreSettings,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

/// Largest amount the back office accepts for a price or fee.
pub const MAX_PRICE_REAIS: i64 = 100_000;

/// Parse an operator-typed amount such as `18,50`, `18.5` or `R$ 7`.
///
/// # Errors
///
/// Returns `AdminError::Validation` for blank, malformed, negative or
/// oversized amounts and for more than two significant decimal places.
pub fn parse_price(field: &'static str, raw: &str) -> Result<Price> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix(CURRENCY_PREFIX.trim_end())
        .unwrap_or(trimmed)
        .trim();
    if trimmed.is_empty() {
        return Err(AdminError::validation(field, "Informe o valor"));
    }

    let amount = Decimal::from_str(&trimmed.replace(',', "."))
        .map_err(|_| AdminError::validation(field, format!("Valor inválido: {trimmed}")))?;
    if amount < Decimal::ZERO {
        return Err(AdminError::validation(field, "O valor não pode ser negativo"));
    }
    if amount > Decimal::from(MAX_PRICE_REAIS) {
        return Err(AdminError::validation(
            field,
            format!("O valor máximo é {}", Price::from(Decimal::from(MAX_PRICE_REAIS))),
        ));
    }
    let amount = amount.normalize();
    if amount.scale() > 2 {
        return Err(AdminError::validation(field, "Use no máximo duas casas decimais"));
    }
    Ok(Price::new(amount))
}

fn required_name(field: &'static str, value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminError::validation(field, message));
    }
    Ok(trimmed.to_string())
}

/// Accepts digits with phone punctuation; returns digits only.
fn parse_whatsapp(raw: &str) -> Result<String> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
    if !raw.chars().all(allowed) {
        return Err(AdminError::validation(
            "whatsapp_destination",
            "O WhatsApp deve conter apenas números",
        ));
    }
    Ok(normalize_destination(raw))
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub sort_order: i32,
}

impl CategoryForm {
    /// # Errors
    ///
    /// Returns `AdminError::Validation` if the name is blank.
    pub fn validate(&self) -> Result<CategoryDraft> {
        Ok(CategoryDraft {
            name: required_name("name", &self.name, "Informe o nome da categoria")?,
            sort_order: self.sort_order,
        })
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            sort_order: category.sort_order,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category_id: Option<CategoryId>,
    /// Existing image URL; replaced when an image is uploaded with the save.
    pub image_ref: String,
    pub active: bool,
    pub sort_order: i32,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category_id: None,
            image_ref: String::new(),
            active: true,
            sort_order: 0,
        }
    }
}

impl ProductForm {
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a blank name, a missing category
    /// or an invalid price.
    pub fn validate(&self) -> Result<ProductDraft> {
        let name = required_name("name", &self.name, "Informe o nome do produto")?;
        let category_id = self
            .category_id
            .ok_or_else(|| AdminError::validation("category_id", "Selecione uma categoria"))?;
        let price = parse_price("price", &self.price)?;

        Ok(ProductDraft {
            category_id,
            name,
            description: self.description.trim().to_string(),
            price,
            image_ref: self.image_ref.trim().to_string(),
            active: self.active,
            sort_order: self.sort_order,
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.amount().to_string(),
            category_id: Some(product.category_id),
            image_ref: product.image_ref.clone(),
            active: product.active,
            sort_order: product.sort_order,
        }
    }
}

// =============================================================================
// Add-on
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddonForm {
    pub name: String,
    pub price: String,
    pub active: bool,
}

impl Default for AddonForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            active: true,
        }
    }
}

impl AddonForm {
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a blank name or an invalid price.
    pub fn validate(&self) -> Result<AddonDraft> {
        Ok(AddonDraft {
            name: required_name("name", &self.name, "Informe o nome do adicional")?,
            price: parse_price("price", &self.price)?,
            active: self.active,
        })
    }
}

impl From<&Addon> for AddonForm {
    fn from(addon: &Addon) -> Self {
        Self {
            name: addon.name.clone(),
            price: addon.price.amount().to_string(),
            active: addon.active,
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    pub store_name: String,
    pub store_address: String,
    pub is_open: bool,
    pub delivery_time_label: String,
    pub delivery_fee: String,
    pub whatsapp_destination: String,
}

impl SettingsForm {
    /// # Errors
    ///
    /// Returns `AdminError::Validation` for a blank store name, an invalid
    /// fee, or a WhatsApp number with anything other than digits and phone
    /// punctuation.
    pub fn validate(&self) -> Result<SettingsDraft> {
        Ok(SettingsDraft {
            store_name: required_name("store_name", &self.store_name, "Informe o nome da loja")?,
            store_address: self.store_address.trim().to_string(),
            is_open: self.is_open,
            delivery_time_label: self.delivery_time_label.trim().to_string(),
            delivery_fee: parse_price("delivery_fee", &self.delivery_fee)?,
            whatsapp_destination: parse_whatsapp(&self.whatsapp_destination)?,
        })
    }
}

impl From<&StoreSettings> for SettingsForm {
    fn from(settings: &StoreSettings) -> Self {
        Self {
            store_name: settings.store_name.clone(),
            store_address: settings.store_address.clone(),
            is_open: settings.is_open,
            delivery_time_label: settings.delivery_time_label.clone(),
            delivery_fee: settings.delivery_fee.amount().to_string(),
            whatsapp_destination: settings.whatsapp_destination.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn field_of(err: AdminError) -> &'static str {
        match err {
            AdminError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("18,50", 1850)]
    #[case("18.5", 1850)]
    #[case(" R$ 7 ", 700)]
    #[case("0", 0)]
    #[case("18.500", 1850)]
    #[case("100000", 10_000_000)]
    fn test_parse_price_accepts(#[case] raw: &str, #[case] cents: i64) {
        assert_eq!(parse_price("price", raw).unwrap(), Price::from_cents(cents));
    }

    #[rstest]
    #[case("")]
    #[case("R$")]
    #[case("abc")]
    #[case("-1")]
    #[case("1,005")]
    #[case("100000,01")]
    #[case("100000000000000000000")]
    fn test_parse_price_rejects(#[case] raw: &str) {
        assert_eq!(field_of(parse_price("price", raw).unwrap_err()), "price");
    }

    #[test]
    fn test_category_requires_name() {
        let form = CategoryForm {
            name: "  ".to_string(),
            sort_order: 1,
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "name");

        let draft = CategoryForm {
            name: " Açaí ".to_string(),
            sort_order: 1,
        }
        .validate()
        .unwrap();
        assert_eq!(draft.name, "Açaí");
    }

    #[test]
    fn test_product_validation_order() {
        let mut form = ProductForm::default();
        assert_eq!(field_of(form.validate().unwrap_err()), "name");

        form.name = "Açaí 500ml".to_string();
        assert_eq!(field_of(form.validate().unwrap_err()), "category_id");

        form.category_id = Some(CategoryId::generate());
        assert_eq!(field_of(form.validate().unwrap_err()), "price");

        form.price = "18,00".to_string();
        let draft = form.validate().unwrap();
        assert_eq!(draft.price, Price::from_cents(1800));
        assert!(draft.active);
    }

    #[test]
    fn test_product_form_round_trips_existing_product() {
        let product = Product {
            id: cardapio_core::ProductId::generate(),
            category_id: CategoryId::generate(),
            name: "Açaí 300ml".to_string(),
            description: "Copo médio".to_string(),
            price: Price::from_cents(1200),
            image_ref: "https://cdn.test/a.png".to_string(),
            active: false,
            sort_order: 3,
        };
        let draft = ProductForm::from(&product).validate().unwrap();
        assert_eq!(draft.price, product.price);
        assert_eq!(draft.category_id, product.category_id);
        assert!(!draft.active);
    }

    #[test]
    fn test_addon_rejects_negative_price() {
        let form = AddonForm {
            name: "Granola".to_string(),
            price: "-2".to_string(),
            active: true,
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "price");
    }

    #[test]
    fn test_settings_whatsapp_is_normalized() {
        let form = SettingsForm {
            store_name: "Açaí da Praça".to_string(),
            delivery_fee: "5".to_string(),
            whatsapp_destination: "+55 (21) 97991-7408".to_string(),
            ..SettingsForm::default()
        };
        let draft = form.validate().unwrap();
        assert_eq!(draft.whatsapp_destination, "5521979917408");
        assert_eq!(draft.delivery_fee, Price::from_cents(500));
    }

    #[test]
    fn test_settings_whatsapp_may_be_empty_but_not_text() {
        let mut form = SettingsForm {
            store_name: "Loja".to_string(),
            delivery_fee: "0".to_string(),
            ..SettingsForm::default()
        };
        assert_eq!(form.validate().unwrap().whatsapp_destination, "");

        form.whatsapp_destination = "ligue pra gente".to_string();
        assert_eq!(field_of(form.validate().unwrap_err()), "whatsapp_destination");
    }

    #[test]
    fn test_form_deserializes_with_defaults() {
        let form: ProductForm = serde_json::from_str(r#"{"name": "Água", "price": "3,50"}"#).unwrap();
        assert!(form.active);
        assert_eq!(form.category_id, None);
    }
}
