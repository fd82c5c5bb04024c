//! `vpub publish` command implementation.

use clap::Args;
use vpub_site::{Publisher, page_url};
use vpub_vault::FsVault;

use crate::commands::{ConnectionArgs, create_client, require_vercel_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Vault-relative path of the document (e.g. "notes/Plan.md").
    document: String,

    /// Custom slug for the page.
    #[arg(short, long)]
    slug: Option<String>,

    /// Preview the deployment file set without deploying.
    #[arg(long)]
    dry_run: bool,

    /// Wait until the deployment is live before returning.
    #[arg(long)]
    wait: bool,

    #[command(flatten)]
    connection: ConnectionArgs,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the publish fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.connection.load_config()?;
        let vercel = require_vercel_config(&config, &output)?;

        let vault = FsVault::new(&config.vault_resolved.dir);
        let client = create_client(vercel);
        let publisher = Publisher::new(&vault, &client, config.vault_resolved.registry_path())?;

        if self.dry_run {
            let (slug, manifest) = publisher.preview(&self.document, self.slug.as_deref())?;
            output.highlight("[DRY RUN] No deployment created.");
            output.info(&format!("Slug: {slug}"));
            output.info(&format!("\nFiles ({}):", manifest.len()));
            for file in &manifest {
                output.info(&format!("  {}", file.file));
            }
            return Ok(());
        }

        let mut publisher = publisher;
        let outcome = publisher.publish(&self.document, self.slug.as_deref())?;

        if self.wait {
            output.info("Waiting for deployment...");
            publisher.wait_for_deployment(&outcome.deployment.id)?;
        }

        output.success("\nPage published!");
        output.info(&format!("Slug: {}", outcome.slug));
        output.info(&format!(
            "Deployment: {} ({} pages, {} files)",
            outcome.deployment.id, outcome.page_count, outcome.file_count
        ));

        match client.domains() {
            Ok(domains) => {
                output.info("\nAvailable at:");
                for domain in &domains {
                    output.info(&format!("  {}", page_url(domain, &outcome.slug)));
                }
            }
            Err(err) => output.warning(&format!("Could not list project domains: {err}")),
        }

        Ok(())
    }
}
