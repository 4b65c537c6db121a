//! Backend client errors.

use cardapio_core::ProviderError;
use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A single-row query returned nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A credential could not be placed in a header.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl BackendError {
    /// Whether the API rejected the credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// Convert into the provider-level error for `resource`.
    #[must_use]
    pub fn into_provider(self, resource: &str) -> ProviderError {
        if self.is_unauthorized() {
            return ProviderError::Unauthorized(self.to_string());
        }
        match self {
            Self::NotFound(what) => ProviderError::NotFound(what),
            Self::Api { status: 404, .. } => ProviderError::NotFound(resource.to_string()),
            other => ProviderError::fetch(resource, other.to_string()),
        }
    }

    /// Convert a storage failure into [`ProviderError::UploadFailure`].
    #[must_use]
    pub fn into_upload_failure(self) -> ProviderError {
        if self.is_unauthorized() {
            return ProviderError::Unauthorized(self.to_string());
        }
        ProviderError::UploadFailure(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> BackendError {
        BackendError::Api {
            status,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_unauthorized_statuses_map_to_unauthorized() {
        assert!(matches!(
            api(401).into_provider("products"),
            ProviderError::Unauthorized(_)
        ));
        assert!(matches!(
            api(403).into_upload_failure(),
            ProviderError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        assert_eq!(
            BackendError::NotFound("store_settings".to_string()).into_provider("store_settings"),
            ProviderError::NotFound("store_settings".to_string())
        );
        assert_eq!(
            api(404).into_provider("products"),
            ProviderError::NotFound("products".to_string())
        );
    }

    #[test]
    fn test_other_errors_map_to_fetch_failure() {
        let err = api(500).into_provider("categories");
        assert_eq!(
            err,
            ProviderError::ExternalFetchFailure {
                resource: "categories".to_string(),
                message: "API error: 500 - boom".to_string(),
            }
        );
    }

    #[test]
    fn test_storage_errors_map_to_upload_failure() {
        assert!(matches!(
            api(413).into_upload_failure(),
            ProviderError::UploadFailure(message) if message.contains("413")
        ));
    }
}
