//! Subcommand implementations.

pub mod admin;
pub mod menu;
pub mod order;

use std::path::PathBuf;

use cardapio_admin::AdminError;
use cardapio_backend::{BackendError, ConfigError};
use cardapio_core::ProviderError;
use cardapio_storefront::StorefrontError;
use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("{0}")]
    Provider(#[from] ProviderError),

    #[error("{}", .0.user_message())]
    Storefront(#[from] StorefrontError),

    #[error("{}", .0.user_message())]
    Admin(#[from] AdminError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
