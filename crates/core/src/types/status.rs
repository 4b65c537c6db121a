//! Enumerations chosen at checkout and the back-office role.
//!
//! Checkout forms arrive as free text. These enums are the typed boundary:
//! every accepted spelling is listed in the `FromStr` impls and anything else
//! is rejected instead of being treated as "not selected".

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A value that does not name any variant of the target enum.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    /// Courier delivery; the store's delivery fee applies.
    Delivery,
    /// Customer picks the order up at the store; no delivery fee.
    Pickup,
}

impl ServiceType {
    /// Label shown in the order message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivery => "Entrega",
            Self::Pickup => "Retirada",
        }
    }

    /// Whether a delivery address is required.
    #[must_use]
    pub const fn requires_address(self) -> bool {
        matches!(self, Self::Delivery)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivery => write!(f, "delivery"),
            Self::Pickup => write!(f, "pickup"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delivery" | "entrega" => Ok(Self::Delivery),
            "pickup" | "retirada" => Ok(Self::Pickup),
            _ => Err(UnknownVariant {
                kind: "service type",
                value: s.to_owned(),
            }),
        }
    }
}

/// How the customer pays on receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Instant bank transfer.
    Pix,
    /// Cash; the customer may ask for change.
    Cash,
    /// Card machine on delivery or at the counter.
    Card,
}

impl PaymentMethod {
    /// Capitalised label shown in the order message.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pix => "Pix",
            Self::Cash => "Dinheiro",
            Self::Card => "Cartão",
        }
    }

    /// Whether a change amount is meaningful for this method.
    #[must_use]
    pub const fn accepts_change(self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pix => write!(f, "pix"),
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pix" => Ok(Self::Pix),
            "cash" | "dinheiro" => Ok(Self::Cash),
            "card" | "cartao" | "cartão" => Ok(Self::Card),
            _ => Err(UnknownVariant {
                kind: "payment method",
                value: s.to_owned(),
            }),
        }
    }
}

/// Role stored in the `user_roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    /// Full access to the back office.
    Admin,
    /// Signed-in user without back-office access.
    User,
}

impl fmt::Display for AppRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl FromStr for AppRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(UnknownVariant {
                kind: "role",
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("delivery", ServiceType::Delivery)]
    #[case("entrega", ServiceType::Delivery)]
    #[case(" Retirada ", ServiceType::Pickup)]
    #[case("PICKUP", ServiceType::Pickup)]
    fn test_service_type_spellings(#[case] input: &str, #[case] expected: ServiceType) {
        assert_eq!(input.parse::<ServiceType>().unwrap(), expected);
    }

    #[rstest]
    #[case("pix", PaymentMethod::Pix)]
    #[case("Dinheiro", PaymentMethod::Cash)]
    #[case("cash", PaymentMethod::Cash)]
    #[case("cartao", PaymentMethod::Card)]
    #[case("Cartão", PaymentMethod::Card)]
    fn test_payment_method_spellings(#[case] input: &str, #[case] expected: PaymentMethod) {
        assert_eq!(input.parse::<PaymentMethod>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        let err = "drone".parse::<ServiceType>().unwrap_err();
        assert_eq!(err.kind, "service type");
        assert_eq!(err.value, "drone");

        let err = "boleto".parse::<PaymentMethod>().unwrap_err();
        assert_eq!(err.to_string(), "unrecognised payment method: \"boleto\"");
    }

    #[test]
    fn test_labels() {
        assert_eq!(ServiceType::Delivery.label(), "Entrega");
        assert_eq!(ServiceType::Pickup.label(), "Retirada");
        assert_eq!(PaymentMethod::Pix.label(), "Pix");
        assert_eq!(PaymentMethod::Cash.label(), "Dinheiro");
        assert_eq!(PaymentMethod::Card.label(), "Cartão");
    }

    #[test]
    fn test_app_role_roundtrip() {
        assert_eq!("admin".parse::<AppRole>().unwrap(), AppRole::Admin);
        assert_eq!(AppRole::Admin.to_string(), "admin");
        assert!("owner".parse::<AppRole>().is_err());
    }
}
