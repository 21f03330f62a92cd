//! End-to-end audio → transcript → summary pipeline

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{load_sdk_config, Settings};
use crate::llm::{
    build_provider, render_transcript_prompt, summarize, GenerationConfig, PromptTemplate,
    TextGenerator,
};
use crate::storage::{ensure_bucket, ensure_uploaded, object_uri, ObjectStore, S3Store};
use crate::transcription::{
    await_completion, media_format_for_path, parse_transcript, reshape, submit, AwsTranscriber,
    JobRequest, PollOutcome, TranscriptionService,
};
use crate::{DigestError, Result};

/// Per-run overrides of the configured transcription parameters
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub bucket: Option<String>,
    pub language: Option<String>,
    pub max_speakers: Option<u32>,
}

/// A reshaped transcript written to disk
#[derive(Debug, Clone)]
pub struct TranscriptArtifact {
    pub job_name: String,
    pub path: PathBuf,
    pub text: String,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub job_name: String,
    pub transcript_path: PathBuf,
    pub summary: String,
}

pub struct Pipeline {
    settings: Settings,
    store: Arc<dyn ObjectStore>,
    transcriber: Arc<dyn TranscriptionService>,
    generator: Arc<dyn TextGenerator>,
}

impl Pipeline {
    pub fn new(
        settings: Settings,
        store: Arc<dyn ObjectStore>,
        transcriber: Arc<dyn TranscriptionService>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            settings,
            store,
            transcriber,
            generator,
        }
    }

    /// Build the AWS-backed service clients described by `settings`.
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let sdk_config = load_sdk_config(&settings).await;

        let store = S3Store::from_sdk_config(&sdk_config, settings.storage_region());
        let transcriber =
            AwsTranscriber::from_sdk_config(&sdk_config, settings.transcription_region());
        let generator: Arc<dyn TextGenerator> = build_provider(&settings, &sdk_config)?.into();

        Ok(Self::new(
            settings,
            Arc::new(store),
            Arc::new(transcriber),
            generator,
        ))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Ensure the bucket exists and the audio file is in it.
    ///
    /// Returns the `s3://` URI of the uploaded audio.
    pub async fn prepare_audio(&self, audio_path: &Path, options: &RunOptions) -> Result<String> {
        let bucket = self.bucket(options);
        let key = audio_key(audio_path)?;

        ensure_bucket(self.store.as_ref(), bucket).await?;

        if !ensure_uploaded(self.store.as_ref(), bucket, &key, audio_path).await {
            return Err(DigestError::Storage(format!(
                "audio file {} is not available in bucket '{}'",
                audio_path.display(),
                bucket
            )));
        }

        Ok(object_uri(bucket, &key))
    }

    /// Upload, transcribe and reshape `audio_path`, writing `<job>.txt`.
    ///
    /// A failed or timed out job produces no transcript file.
    pub async fn transcribe(
        &self,
        audio_path: &Path,
        options: &RunOptions,
    ) -> Result<TranscriptArtifact> {
        let media_uri = self.prepare_audio(audio_path, options).await?;
        let bucket = self.bucket(options);
        let t = &self.settings.transcription;

        let media_format = media_format_for_path(audio_path).unwrap_or(t.media_format.as_str());
        let job = submit(
            self.transcriber.as_ref(),
            JobRequest {
                media_uri: &media_uri,
                media_format,
                language: options.language.as_deref().unwrap_or(&t.language),
                output_bucket: bucket,
                max_speakers: options.max_speakers.unwrap_or(t.max_speakers),
            },
        )
        .await?;

        let outcome = await_completion(
            self.transcriber.as_ref(),
            &job.name,
            &self.settings.poll_policy(),
        )
        .await?;

        match outcome {
            PollOutcome::Completed => {
                tracing::info!(job_name = %job.name, "transcription completed");
            }
            PollOutcome::Failed { reason } => {
                return Err(DigestError::JobFailed {
                    job_name: job.name,
                    reason: reason.unwrap_or_else(|| "no reason given".to_string()),
                });
            }
            PollOutcome::TimedOut { attempts, elapsed } => {
                return Err(DigestError::Timeout {
                    job_name: job.name,
                    attempts,
                    elapsed_secs: elapsed.as_secs(),
                });
            }
        }

        let document = self.store.get_object(bucket, &job.output_key()).await?;
        let items = parse_transcript(&document)?;
        let text = reshape(&items);

        let dir = self.settings.transcripts_dir();
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.txt", job.name));
        std::fs::write(&path, &text)?;

        tracing::info!(
            items = items.len(),
            path = %path.display(),
            "transcript written"
        );

        Ok(TranscriptArtifact {
            job_name: job.name,
            path,
            text,
        })
    }

    /// Render the configured prompt template around `transcript`.
    pub fn render_prompt(&self, transcript: &str) -> Result<String> {
        let template = PromptTemplate::load(self.settings.llm.prompt_template.as_deref())?;
        render_transcript_prompt(&template, transcript)
    }

    /// Ask the model for a summary of `transcript`.
    pub async fn summarize_text(&self, transcript: &str) -> Result<String> {
        let prompt = self.render_prompt(transcript)?;
        summarize(
            self.generator.as_ref(),
            &prompt,
            &self.settings.llm.model,
            GenerationConfig::from_settings(&self.settings),
        )
        .await
    }

    /// Transcribe `audio_path` and summarize the transcript.
    pub async fn run(&self, audio_path: &Path, options: &RunOptions) -> Result<RunReport> {
        let transcript = self.transcribe(audio_path, options).await?;
        let summary = self.summarize_text(&transcript.text).await?;

        Ok(RunReport {
            job_name: transcript.job_name,
            transcript_path: transcript.path,
            summary,
        })
    }

    fn bucket<'a>(&'a self, options: &'a RunOptions) -> &'a str {
        options
            .bucket
            .as_deref()
            .unwrap_or(&self.settings.storage.bucket)
    }
}

/// Object key for an audio file: its file name.
fn audio_key(audio_path: &Path) -> Result<String> {
    audio_path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            DigestError::Storage(format!(
                "cannot derive an object key from {}",
                audio_path.display()
            ))
        })
}
