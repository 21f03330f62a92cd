//! audio-digest - Transcribe a conversation in the cloud and summarize it with an LLM
//!
//! The pipeline uploads an audio file to S3, runs an Amazon Transcribe job with
//! speaker diarization, reshapes the result into a speaker-labeled transcript and
//! asks a Bedrock text model for a structured summary.

pub mod cli;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod storage;
pub mod transcription;

use thiserror::Error;

/// Main error type for audio-digest
#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Transcription job {job_name} failed: {reason}")]
    JobFailed { job_name: String, reason: String },

    #[error("Transcription job {job_name} did not finish after {attempts} status checks ({elapsed_secs}s)")]
    Timeout {
        job_name: String,
        attempts: u32,
        elapsed_secs: u64,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Unexpected model response: {0}")]
    ResponseFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "audio-digest";
