//! `vpub unpublish` command implementation.

use clap::Args;
use vpub_site::Publisher;
use vpub_vault::FsVault;

use crate::commands::{ConnectionArgs, create_client, require_vercel_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the unpublish command.
#[derive(Args)]
pub(crate) struct UnpublishArgs {
    /// Vault-relative path of the published document.
    document: String,

    #[command(flatten)]
    connection: ConnectionArgs,
}

impl UnpublishArgs {
    /// Execute the unpublish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not published or the
    /// redeploy fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.connection.load_config()?;
        let vercel = require_vercel_config(&config, &output)?;

        let vault = FsVault::new(&config.vault_resolved.dir);
        let client = create_client(vercel);
        let mut publisher =
            Publisher::new(&vault, &client, config.vault_resolved.registry_path())?;

        let outcome = publisher.unpublish(&self.document)?;

        output.success("\nPage unpublished.");
        output.info(&format!("Slug removed: {}", outcome.slug));
        output.info(&format!(
            "Redeployed: {} ({} pages remain)",
            outcome.deployment.id, outcome.page_count
        ));

        Ok(())
    }
}
