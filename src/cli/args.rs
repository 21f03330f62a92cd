//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::pipeline::RunOptions;

/// audio-digest - Transcribe a conversation with Amazon Transcribe and summarize it with Bedrock
#[derive(Parser, Debug)]
#[command(name = "audio-digest")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload, transcribe and summarize an audio file
    Run {
        /// Local audio file
        audio: PathBuf,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Upload and transcribe an audio file, writing the speaker-labeled transcript
    Transcribe {
        /// Local audio file
        audio: PathBuf,

        #[command(flatten)]
        job: JobArgs,
    },

    /// Reshape a downloaded Transcribe output document into speaker-labeled text
    Reshape {
        /// Transcribe JSON output file
        input: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the summary prompt for a transcript file
    Prompt {
        /// Speaker-labeled transcript file
        transcript: PathBuf,
    },

    /// Summarize an existing transcript file
    Summarize {
        /// Speaker-labeled transcript file
        transcript: PathBuf,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Overrides for the transcription job
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// Bucket for the audio and transcript (defaults to storage.bucket)
    #[arg(short, long)]
    pub bucket: Option<String>,

    /// Language code of the recording, e.g. en-US
    #[arg(short, long)]
    pub language: Option<String>,

    /// Maximum number of distinct speakers
    #[arg(short = 's', long, value_parser = clap::value_parser!(u32).range(2..=30))]
    pub max_speakers: Option<u32>,
}

impl From<JobArgs> for RunOptions {
    fn from(args: JobArgs) -> Self {
        Self {
            bucket: args.bucket,
            language: args.language,
            max_speakers: args.max_speakers,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_job_overrides() {
        let cli = Cli::try_parse_from([
            "audio-digest",
            "run",
            "dialog.mp3",
            "--bucket",
            "calls",
            "--max-speakers",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Run { audio, job } => {
                assert_eq!(audio, PathBuf::from("dialog.mp3"));
                let options = RunOptions::from(job);
                assert_eq!(options.bucket.as_deref(), Some("calls"));
                assert_eq!(options.max_speakers, Some(3));
                assert!(options.language.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn max_speakers_below_two_is_rejected() {
        let result = Cli::try_parse_from(["audio-digest", "run", "dialog.mp3", "-s", "1"]);
        assert!(result.is_err());
    }
}
