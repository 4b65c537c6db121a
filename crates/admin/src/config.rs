//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ADMIN_IMAGE_BUCKET` - Storage bucket for product images (default: product-images)
//! - `ADMIN_MIN_PASSWORD_LENGTH` - Minimum length accepted at sign-up (default: 6)
//!
//! Backend connection variables are documented in `cardapio_backend::config`.

use cardapio_backend::config::get_env_or_default;

pub use cardapio_backend::ConfigError;

pub const DEFAULT_IMAGE_BUCKET: &str = "product-images";
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// Back-office configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// Public bucket that stores product images
    pub image_bucket: String,
    /// Minimum password length for new accounts
    pub min_password_length: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let image_bucket = get_env_or_default("ADMIN_IMAGE_BUCKET", DEFAULT_IMAGE_BUCKET);
        validate_bucket(&image_bucket)?;

        let min_password_length = get_env_or_default(
            "ADMIN_MIN_PASSWORD_LENGTH",
            &DEFAULT_MIN_PASSWORD_LENGTH.to_string(),
        )
        .parse::<usize>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ADMIN_MIN_PASSWORD_LENGTH".to_string(), e.to_string())
        })?;

        Ok(Self {
            image_bucket,
            min_password_length,
        })
    }
}

/// Bucket names are a single URL path segment.
fn validate_bucket(bucket: &str) -> Result<(), ConfigError> {
    let valid = !bucket.is_empty()
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            "ADMIN_IMAGE_BUCKET".to_string(),
            format!("invalid bucket name '{bucket}'"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdminConfig::default();
        assert_eq!(config.image_bucket, "product-images");
        assert_eq!(config.min_password_length, 6);
    }

    #[test]
    fn test_validate_bucket() {
        assert!(validate_bucket("product-images").is_ok());
        assert!(validate_bucket("").is_err());
        assert!(validate_bucket("../secrets").is_err());
        assert!(validate_bucket("Product Images").is_err());
    }
}
