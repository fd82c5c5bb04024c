//! vpub CLI - Vault publishing.
//!
//! Provides commands for:
//! - `publish`: Publish a vault document as a static site page
//! - `unpublish`: Remove a published page and redeploy
//! - `list`: Show published pages
//! - `status`: Check or await a deployment's state
//! - `validate`: Verify Vercel credentials

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ListArgs, PublishArgs, StatusArgs, UnpublishArgs, ValidateArgs};
use output::Output;

/// vpub - Vault publishing.
#[derive(Parser)]
#[command(name = "vpub", version, about)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a vault document.
    Publish(PublishArgs),
    /// Unpublish a document and redeploy the site without it.
    Unpublish(UnpublishArgs),
    /// List published pages.
    List(ListArgs),
    /// Show the state of a deployment.
    Status(StatusArgs),
    /// Validate Vercel credentials.
    Validate(ValidateArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Publish(args) => args.execute(),
        Commands::Unpublish(args) => args.execute(),
        Commands::List(args) => args.execute(),
        Commands::Status(args) => args.execute(),
        Commands::Validate(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
