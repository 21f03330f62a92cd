//! audio-digest - Cloud transcription and LLM summaries for recorded conversations
//!
//! Entry point for the audio-digest CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audio_digest::cli::{commands, completions, Cli, Commands};
use audio_digest::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => {
            completions::print(shell);
        }
        Commands::Reshape { input, output } => {
            commands::reshape_file(&input, output)?;
        }
        Commands::Run { audio, job } => {
            commands::run(&Settings::load()?, &audio, job).await?;
        }
        Commands::Transcribe { audio, job } => {
            commands::transcribe(&Settings::load()?, &audio, job).await?;
        }
        Commands::Prompt { transcript } => {
            commands::print_prompt(&Settings::load()?, &transcript)?;
        }
        Commands::Summarize { transcript } => {
            commands::summarize_file(&Settings::load()?, &transcript).await?;
        }
        Commands::Config(config_cmd) => {
            commands::config_command(&Settings::load()?, config_cmd)?;
        }
    }

    Ok(())
}
