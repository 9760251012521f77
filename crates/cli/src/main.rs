//! AlterEgo CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: create config, sample summary and resume
//! - `chat`: interactive chat or single-message mode
//! - `doctor`: check config, credentials and persona documents
//! - `prompt`: print the assembled persona context

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod startup;

#[derive(Parser)]
#[command(
    name = "alterego",
    about = "AlterEgo: chat with visitors as yourself",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.alterego/config.toml
    #[arg(short, long, global = true, env = "ALTEREGO_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and persona documents
    Onboard,

    /// Chat as the persona
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Diagnose configuration and persona documents
    Doctor,

    /// Print the system prompt built from the persona documents
    Prompt,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = startup::config_path(cli.config);

    match cli.command {
        Commands::Onboard => commands::onboard::run(&config_path).await?,
        Commands::Chat { message } => commands::chat::run(&config_path, message).await?,
        Commands::Doctor => commands::doctor::run(&config_path).await?,
        Commands::Prompt => commands::prompt::run(&config_path).await?,
    }

    Ok(())
}
