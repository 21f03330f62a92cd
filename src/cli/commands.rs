//! CLI command implementations

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::args::{ConfigCommand, JobArgs};
use crate::config::Settings;
use crate::llm::{render_transcript_prompt, PromptTemplate};
use crate::pipeline::Pipeline;
use crate::transcription::{parse_transcript, reshape};

/// Upload, transcribe and summarize an audio file
pub async fn run(settings: &Settings, audio: &Path, job: JobArgs) -> Result<()> {
    ensure_audio_file(audio)?;

    let pipeline = Pipeline::from_settings(settings.clone()).await?;
    let report = pipeline.run(audio, &job.into()).await?;

    tracing::info!(
        job_name = %report.job_name,
        transcript = %report.transcript_path.display(),
        "run finished"
    );
    println!("{}", report.summary);

    Ok(())
}

/// Upload and transcribe an audio file
pub async fn transcribe(settings: &Settings, audio: &Path, job: JobArgs) -> Result<()> {
    ensure_audio_file(audio)?;

    let pipeline = Pipeline::from_settings(settings.clone()).await?;
    let transcript = pipeline.transcribe(audio, &job.into()).await?;

    println!("{}", transcript.path.display());

    Ok(())
}

/// Reshape a Transcribe output document that is already on disk
pub fn reshape_file(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let document = std::fs::read(input)
        .with_context(|| format!("Failed to read transcript document: {}", input.display()))?;
    let items = parse_transcript(&document)?;
    let text = reshape(&items);

    if let Some(path) = output {
        std::fs::write(&path, &text)
            .with_context(|| format!("Failed to write transcript: {}", path.display()))?;
        println!("Transcript written to: {}", path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

/// Print the prompt that would be sent for a transcript
pub fn print_prompt(settings: &Settings, transcript: &Path) -> Result<()> {
    let text = read_transcript(transcript)?;
    let template = PromptTemplate::load(settings.llm.prompt_template.as_deref())?;
    let prompt = render_transcript_prompt(&template, &text)?;

    print!("{}", prompt);

    Ok(())
}

/// Summarize a transcript file
pub async fn summarize_file(settings: &Settings, transcript: &Path) -> Result<()> {
    let text = read_transcript(transcript)?;
    if text.trim().is_empty() {
        anyhow::bail!("Transcript is empty: {}", transcript.display());
    }

    let pipeline = Pipeline::from_settings(settings.clone()).await?;
    let summary = pipeline.summarize_text(&text).await?;

    println!("{}", summary);

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

// Helper functions

fn ensure_audio_file(audio: &Path) -> Result<()> {
    if !audio.is_file() {
        anyhow::bail!("Audio file not found: {}", audio.display());
    }
    Ok(())
}

fn read_transcript(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))
}
