use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use bookstore_console::interaction::TerminalInteraction;
use bookstore_console::settings::ConsoleSettings;
use bookstore_console::shell::Shell;
use bookstore_console::telemetry::init_telemetry;
use bookstore_console::ConsoleContext;
use bookstore_repository::client::BookstoreApiClient;

/// Bookstore administration console
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Base url of the bookstore server, overrides the configuration
    #[arg(long)]
    api_url: Option<String>,
    /// Configuration file, defaults to an optional bookstore_console.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut settings = ConsoleSettings::load(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    init_telemetry(&settings.log_filter)?;
    tracing::info!(api_url = %settings.api_url, "Starting bookstore console");

    let client = BookstoreApiClient::new(&settings.api_url)?;
    let ctx = ConsoleContext::new(Arc::new(client), Arc::new(TerminalInteraction));
    Shell::new(ctx).run().await;
    Ok(())
}
