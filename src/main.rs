//! gavel - Meeting transcription and summarization
//!
//! Entry point for the gavel CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gavel::cli::{Cli, Commands};
use gavel::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            gavel::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Process {
                    file,
                    title,
                    output_dir,
                } => {
                    gavel::cli::commands::process_audio(&settings, &file, title, output_dir)
                        .await?;
                }
                Commands::Clean { cache } => {
                    gavel::cli::commands::clean(&settings, cache)?;
                }
                Commands::Config(config_cmd) => {
                    gavel::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
