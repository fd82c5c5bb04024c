//! CLI command implementations.

pub(crate) mod list;
pub(crate) mod publish;
pub(crate) mod status;
pub(crate) mod unpublish;
pub(crate) mod validate;

pub(crate) use list::ListArgs;
pub(crate) use publish::PublishArgs;
pub(crate) use status::StatusArgs;
pub(crate) use unpublish::UnpublishArgs;
pub(crate) use validate::ValidateArgs;

use std::path::PathBuf;

use clap::Args;
use vpub_config::{CliSettings, Config, VercelConfig};
use vpub_vercel::VercelClient;

use crate::error::CliError;
use crate::output::Output;

/// Configuration and credential flags shared by every command.
#[derive(Args)]
pub(crate) struct ConnectionArgs {
    /// Path to configuration file (default: auto-discover vpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vault root directory (overrides config).
    #[arg(long, value_name = "DIR")]
    vault_dir: Option<PathBuf>,

    /// Vercel API token (overrides config).
    #[arg(long, env = "VERCEL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Vercel project name (overrides config).
    #[arg(long)]
    project: Option<String>,
}

impl ConnectionArgs {
    /// Load configuration with command line overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            vault_dir: self.vault_dir.clone(),
            token: self.token.clone(),
            project: self.project.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

pub(crate) fn require_vercel_config<'a>(
    config: &'a Config,
    output: &Output,
) -> Result<&'a VercelConfig, CliError> {
    config.require_vercel().map_err(|err| {
        output.error("Error: vercel configuration required in vpub.toml");
        output.info("\nAdd the following to your vpub.toml:");
        output.info("\n[vercel]");
        output.info(r#"token = "${VERCEL_TOKEN}""#);
        output.info(r#"project = "my-site""#);
        CliError::Validation(err.to_string())
    })
}

pub(crate) fn create_client(vercel: &VercelConfig) -> VercelClient {
    VercelClient::new(vercel.token.as_str(), vercel.project.as_str())
}
