//! `replypane` -- email reply assistant.
//!
//! Provides the following subcommands:
//!
//! - `replypane run` -- Analyze the open email, generate a reply, optionally deliver it.
//! - `replypane panel` -- Interactive panel driven by slash commands.
//! - `replypane config` -- Show resolved configuration.

use clap::{Parser, Subcommand};

mod commands;
mod panel;

/// Email reply assistant.
#[derive(Parser)]
#[command(name = "replypane", about = "Email reply assistant", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate a reply for the open email in one shot.
    Run(commands::run::RunArgs),

    /// Open the interactive reply panel.
    Panel(commands::panel::PanelArgs),

    /// Show resolved configuration.
    Config(commands::config_cmd::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::run(args).await?,
        Commands::Panel(args) => commands::panel::run(args).await?,
        Commands::Config(args) => commands::config_cmd::run(args)?,
    }

    Ok(())
}
