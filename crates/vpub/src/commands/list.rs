//! `vpub list` command implementation.

use chrono::DateTime;
use clap::Args;
use vpub_site::{Registry, page_url};

use crate::commands::ConnectionArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
}

impl ListArgs {
    /// Execute the list command.
    ///
    /// Works offline: page URLs use the project's default domain
    /// without contacting the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.connection.load_config()?;
        let registry = Registry::load(&config.vault_resolved.registry_path())?;

        if registry.is_empty() {
            output.info("No published pages.");
            return Ok(());
        }

        let domain = config
            .vercel
            .as_ref()
            .map(|v| format!("{}.vercel.app", v.project));

        output.highlight(&format!("Published pages ({}):", registry.len()));
        for page in registry.all() {
            output.info(&format!(
                "\n{}  (published {})",
                page.path,
                format_timestamp(page.published_at)
            ));
            if let Some(domain) = &domain {
                output.info(&format!("  {}", page_url(domain, &page.slug)));
            } else {
                output.info(&format!("  slug: {}", page.slug));
            }
            if let Some(id) = &page.deployment_id {
                output.info(&format!("  deployment: {id}"));
            }
        }

        Ok(())
    }
}

fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map_or_else(|| "unknown".to_owned(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13 UTC");
    }

    #[test]
    fn test_format_timestamp_out_of_range() {
        assert_eq!(format_timestamp(u64::MAX), "unknown");
    }
}
