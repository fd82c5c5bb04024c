//! CLI error types.

use vpub_config::ConfigError;
use vpub_site::{PublishError, RegistryError};
use vpub_vercel::VercelError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Vercel(#[from] VercelError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Validation(String),
}
