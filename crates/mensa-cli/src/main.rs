//! Mensa CLI: manual trigger for the sync pipeline plus a few storage
//! inspection commands. The production scheduler invokes the same
//! operations on a timer; this binary is the hand-driven boundary.

use anyhow::Context;
use clap::Parser;

use mensa_config::MensaConfig;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("mensa error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = MensaConfig::load_with_dotenv().context("failed to load configuration")?;

    match cli.command {
        cli::Commands::Sync(args) => commands::sync::handle(&args, &config).await,
        cli::Commands::Cleanup => commands::cleanup::handle(&config).await,
        cli::Commands::Seed => commands::seed::handle(&config).await,
        cli::Commands::Halls => commands::halls::handle(&config).await,
        cli::Commands::Menu(args) => commands::menu::handle(&args, &config).await,
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MENSA_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
