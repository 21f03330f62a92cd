//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transcription::PollPolicy;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Shared AWS session settings
    #[serde(default)]
    pub aws: AwsSettings,

    /// S3 bucket settings
    #[serde(default)]
    pub storage: StorageSettings,

    /// Amazon Transcribe settings
    #[serde(default)]
    pub transcription: TranscriptionSettings,

    /// Text generation settings
    #[serde(default)]
    pub llm: LlmSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for transcripts
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsSettings {
    /// Named profile from the shared AWS config (empty = default chain)
    #[serde(default)]
    pub profile: String,

    /// Default region for every client
    #[serde(default = "default_region")]
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Bucket holding both the audio and the transcription output
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Region override for S3 (empty = aws.region)
    #[serde(default)]
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Region override for Transcribe (empty = aws.region)
    #[serde(default)]
    pub region: String,

    /// Language code of the recording
    #[serde(default = "default_language")]
    pub language: String,

    /// Upper bound on distinct speakers for diarization
    #[serde(default = "default_max_speakers")]
    pub max_speakers: u32,

    /// Media format used when the file extension is not recognized
    #[serde(default = "default_media_format")]
    pub media_format: String,

    /// Delay before the second status check
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Growth factor applied to the delay after every check
    #[serde(default = "default_poll_multiplier")]
    pub poll_multiplier: f64,

    /// Upper bound for a single delay
    #[serde(default = "default_max_poll_interval_ms")]
    pub max_poll_interval_ms: u64,

    /// Maximum number of status checks
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Maximum total time spent waiting
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (bedrock)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Region override for Bedrock (empty = aws.region)
    #[serde(default)]
    pub region: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Maximum number of generated tokens
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Prompt template file (unset = built-in summary template)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<PathBuf>,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "audio-digest", "audio-digest")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/audio-digest"))
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bucket() -> String {
    "bucket-l2-summarize-audio-file".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_max_speakers() -> u32 {
    2
}

fn default_media_format() -> String {
    "mp3".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_poll_multiplier() -> f64 {
    1.5
}

fn default_max_poll_interval_ms() -> u64 {
    30_000
}

fn default_max_poll_attempts() -> u32 {
    200
}

fn default_max_wait_secs() -> u64 {
    1800
}

fn default_llm_provider() -> String {
    "bedrock".to_string()
}

fn default_llm_model() -> String {
    "amazon.titan-text-express-v1".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_top_p() -> f32 {
    0.9
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for AwsSettings {
    fn default() -> Self {
        Self {
            profile: String::new(),
            region: default_region(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: String::new(),
        }
    }
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            region: String::new(),
            language: default_language(),
            max_speakers: default_max_speakers(),
            media_format: default_media_format(),
            poll_interval_ms: default_poll_interval_ms(),
            poll_multiplier: default_poll_multiplier(),
            max_poll_interval_ms: default_max_poll_interval_ms(),
            max_poll_attempts: default_max_poll_attempts(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            region: String::new(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            top_p: default_top_p(),
            prompt_template: None,
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let mut settings = Self::load_from(&config_path)?;
        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Parse a settings file without applying environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply `AUDIO_DIGEST_*` overrides resolved through `lookup`.
    ///
    /// Values are trimmed; blank values leave the setting untouched.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(bucket) = read("AUDIO_DIGEST_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Some(profile) = read("AUDIO_DIGEST_PROFILE") {
            self.aws.profile = profile;
        }
        if let Some(region) = read("AUDIO_DIGEST_REGION") {
            self.aws.region = region;
        }
        if let Some(model) = read("AUDIO_DIGEST_MODEL") {
            self.llm.model = model;
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "audio-digest", "audio-digest")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Directory where reshaped transcripts are written
    pub fn transcripts_dir(&self) -> PathBuf {
        self.general.data_dir.join("transcripts")
    }

    pub fn storage_region(&self) -> &str {
        non_empty_or(&self.storage.region, &self.aws.region)
    }

    pub fn transcription_region(&self) -> &str {
        non_empty_or(&self.transcription.region, &self.aws.region)
    }

    pub fn llm_region(&self) -> &str {
        non_empty_or(&self.llm.region, &self.aws.region)
    }

    /// Build the status polling policy for transcription jobs
    pub fn poll_policy(&self) -> PollPolicy {
        self.transcription.poll_policy()
    }
}

impl TranscriptionSettings {
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            initial_interval: Duration::from_millis(self.poll_interval_ms),
            multiplier: self.poll_multiplier,
            max_interval: Duration::from_millis(self.max_poll_interval_ms),
            max_attempts: self.max_poll_attempts,
            max_wait: Duration::from_secs(self.max_wait_secs),
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value.trim()
    }
}
