//! Storefront error type.
//!
//! Every storefront operation returns [`Result<T>`]. Validation failures are
//! recoverable: the customer fixes the form and tries again. Provider failures
//! are retried only when the customer asks (see `MenuService::refresh`).

use cardapio_core::checkout::RequiredField;
use cardapio_core::{CheckoutError, ProductId, ProviderError};
use thiserror::Error;

use crate::handoff::HandoffError;

/// Application-level error type for the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorefrontError {
    /// The order cannot be placed as entered.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Menu or settings could not be loaded.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The order link could not be opened.
    #[error("Handoff error: {0}")]
    Handoff(#[from] HandoffError),

    /// The product is not on the current menu.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
}

impl StorefrontError {
    /// Whether the customer can fix this by editing the form or cart.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Checkout(_) | Self::ProductNotFound(_))
    }

    /// Short message suitable for the customer.
    ///
    /// Provider details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Checkout(CheckoutError::MissingRequiredField(_)) => {
                "Preencha todos os campos obrigatórios".to_string()
            }
            Self::Checkout(CheckoutError::MissingDeliveryAddress) => {
                "Informe o endereço de entrega".to_string()
            }
            Self::Checkout(CheckoutError::UnknownServiceType(_)) => {
                "Selecione o tipo de serviço".to_string()
            }
            Self::Checkout(CheckoutError::UnknownPaymentMethod(_)) => {
                "Selecione a forma de pagamento".to_string()
            }
            Self::Checkout(CheckoutError::EmptyCart) => "Seu carrinho está vazio".to_string(),
            Self::Checkout(CheckoutError::StoreClosed) => {
                "A loja está fechada no momento".to_string()
            }
            Self::ProductNotFound(_) => "Produto indisponível".to_string(),
            Self::Provider(_) => "Não foi possível carregar o cardápio".to_string(),
            Self::Handoff(_) => "Não foi possível abrir o WhatsApp".to_string(),
        }
    }

    /// The blank field, for highlighting in a form.
    #[must_use]
    pub const fn missing_field(&self) -> Option<RequiredField> {
        match self {
            Self::Checkout(CheckoutError::MissingRequiredField(field)) => Some(*field),
            _ => None,
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(CheckoutError::MissingDeliveryAddress, "Informe o endereço de entrega")]
    #[case(CheckoutError::UnknownServiceType("voando".to_string()), "Selecione o tipo de serviço")]
    #[case(CheckoutError::UnknownPaymentMethod("cheque".to_string()), "Selecione a forma de pagamento")]
    #[case(CheckoutError::EmptyCart, "Seu carrinho está vazio")]
    #[case(CheckoutError::StoreClosed, "A loja está fechada no momento")]
    fn test_checkout_errors_are_recoverable(#[case] error: CheckoutError, #[case] message: &str) {
        let err = StorefrontError::from(error);
        assert!(err.is_recoverable());
        assert_eq!(err.user_message(), message);
        assert_eq!(err.missing_field(), None);
    }

    #[test]
    fn test_handoff_errors_are_not_recoverable() {
        let err = StorefrontError::from(HandoffError::Unavailable("popup blocked".to_string()));
        assert!(!err.is_recoverable());
        assert_eq!(err.user_message(), "Não foi possível abrir o WhatsApp");
    }

    #[test]
    fn test_provider_errors_hide_details() {
        let err = StorefrontError::from(ProviderError::fetch("products", "connection reset"));
        assert!(!err.is_recoverable());
        assert!(!err.user_message().contains("connection reset"));
    }

    #[test]
    fn test_missing_field() {
        let err = StorefrontError::from(CheckoutError::MissingRequiredField(
            RequiredField::CustomerPhone,
        ));
        assert_eq!(err.missing_field(), Some(RequiredField::CustomerPhone));
        assert_eq!(err.user_message(), "Preencha todos os campos obrigatórios");
    }
}
