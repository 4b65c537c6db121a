//! Back-office error type.

use cardapio_core::{EmailError, ProviderError};
use thiserror::Error;

/// Application-level error type for the back office.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    /// The backend rejected or failed the request.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Signed in, but without the admin role.
    #[error("Forbidden: {0} is not an administrator")]
    Forbidden(String),

    /// A form field failed validation.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The login email is malformed.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The product image could not be stored; the product was not saved.
    #[error("Image upload failed: {0}")]
    UploadFailure(String),
}

impl AdminError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Short message suitable for a toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(ProviderError::Unauthorized(_)) => {
                "E-mail ou senha inválidos".to_string()
            }
            Self::Provider(_) => "Erro ao comunicar com o servidor".to_string(),
            Self::Forbidden(_) => "Acesso restrito a administradores".to_string(),
            Self::Validation { message, .. } => message.clone(),
            Self::InvalidEmail(_) => "Informe um e-mail válido".to_string(),
            Self::UploadFailure(_) => "Erro no upload".to_string(),
        }
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            AdminError::from(ProviderError::Unauthorized("bad".to_string())).user_message(),
            "E-mail ou senha inválidos"
        );
        assert_eq!(
            AdminError::validation("name", "Informe o nome").user_message(),
            "Informe o nome"
        );
        assert_eq!(
            AdminError::Forbidden("x@y.z".to_string()).to_string(),
            "Forbidden: x@y.z is not an administrator"
        );
    }
}
