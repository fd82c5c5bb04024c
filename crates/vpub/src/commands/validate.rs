//! `vpub validate` command implementation.

use clap::Args;

use crate::commands::{ConnectionArgs, create_client, require_vercel_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
}

impl ValidateArgs {
    /// Execute the validate command.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the check
    /// itself fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.connection.load_config()?;
        let vercel = require_vercel_config(&config, &output)?;
        let client = create_client(vercel);

        if client.validate_credentials()? {
            output.success(&format!(
                "Credentials valid for project \"{}\".",
                client.project()
            ));
            if let Ok(domains) = client.domains() {
                output.info("\nDomains:");
                for domain in &domains {
                    output.info(&format!("  {domain}"));
                }
            }
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "credentials rejected or project \"{}\" not found",
                client.project()
            )))
        }
    }
}
