//! `vpub status` command implementation.

use clap::Args;
use vpub_site::{Publisher, Registry};
use vpub_vault::FsVault;

use crate::commands::{ConnectionArgs, create_client, require_vercel_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the status command.
#[derive(Args)]
pub(crate) struct StatusArgs {
    /// Deployment id (default: the deployment recorded in the registry).
    deployment: Option<String>,

    /// Poll until the deployment reaches a terminal state.
    #[arg(long)]
    wait: bool,

    #[command(flatten)]
    connection: ConnectionArgs,
}

impl StatusArgs {
    /// Execute the status command.
    ///
    /// # Errors
    ///
    /// Returns an error if no deployment id can be determined or the
    /// status fetch fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.connection.load_config()?;
        let vercel = require_vercel_config(&config, &output)?;
        let client = create_client(vercel);

        let id = match self.deployment {
            Some(id) => id,
            None => {
                let registry = Registry::load(&config.vault_resolved.registry_path())?;
                registry
                    .all()
                    .iter()
                    .find_map(|page| page.deployment_id.clone())
                    .ok_or_else(|| {
                        CliError::Validation(
                            "no deployment recorded; pass a deployment id".to_owned(),
                        )
                    })?
            }
        };

        if self.wait {
            let vault = FsVault::new(&config.vault_resolved.dir);
            let publisher =
                Publisher::new(&vault, &client, config.vault_resolved.registry_path())?;
            output.info(&format!("Waiting for deployment {id}..."));
            publisher.wait_for_deployment(&id)?;
            output.success("Deployment is live.");
            return Ok(());
        }

        let state = client.deployment_status(&id)?;
        if state.is_ready() {
            output.success(&format!("{id}: {state}"));
        } else if state.is_failed() {
            output.warning(&format!("{id}: {state}"));
        } else {
            output.info(&format!("{id}: {state}"));
        }

        Ok(())
    }
}
