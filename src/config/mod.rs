//! Configuration module for audio-digest
//!
//! Handles loading and managing application settings from TOML files.

mod aws;
mod settings;

pub use aws::load_sdk_config;
pub use settings::{
    AwsSettings, GeneralSettings, LlmSettings, Settings, StorageSettings, TranscriptionSettings,
};
