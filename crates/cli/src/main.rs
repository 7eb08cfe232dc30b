//! Voxbot CLI — the main entry point.
//!
//! Commands:
//! - `chat`     — Voice/text conversation loop
//! - `ask`      — Answer a single message and exit
//! - `sources`  — Show the configured knowledge chain
//! - `config`   — Show, locate or validate the config file
//! - `onboard`  — Write a default config
//! - `doctor`   — Diagnose config and speech engines

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "voxbot",
    about = "Voxbot — a voice-first conversational assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a conversation
    Chat {
        /// Type instead of speaking
        #[arg(long)]
        text_only: bool,

        /// Print replies without speaking them
        #[arg(long)]
        mute: bool,

        /// Seed for the default reply pool
        #[arg(long)]
        seed: Option<u64>,

        /// Use only the pattern table and default replies
        #[arg(long)]
        offline: bool,
    },

    /// Answer one message and exit
    Ask {
        /// The message to answer
        message: String,

        /// Use only the pattern table and default replies
        #[arg(long)]
        offline: bool,
    },

    /// Show the configured knowledge sources
    Sources,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Initialize configuration
    Onboard,

    /// Diagnose configuration and speech engines
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so the conversation on stdout stays clean.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat {
            text_only,
            mute,
            seed,
            offline,
        } => {
            commands::chat::run(commands::chat::ChatArgs {
                text_only,
                mute,
                seed,
                offline,
            })
            .await?
        }
        Commands::Ask { message, offline } => commands::ask::run(&message, offline).await?,
        Commands::Sources => commands::sources::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
