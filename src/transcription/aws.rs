//! Amazon Transcribe client

use async_trait::async_trait;
use aws_sdk_transcribe::config::Region;
use aws_sdk_transcribe::error::DisplayErrorContext;
use aws_sdk_transcribe::types::{
    LanguageCode, Media, MediaFormat, Settings as JobSettings, TranscriptionJobStatus,
};
use aws_sdk_transcribe::Client;

use crate::transcription::job::{JobStatus, TranscriptionJob, TranscriptionService};
use crate::{DigestError, Result};

pub struct AwsTranscriber {
    client: Client,
}

impl AwsTranscriber {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from a shared SDK config, pinned to `region`.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, region: &str) -> Self {
        let config = aws_sdk_transcribe::config::Builder::from(sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        Self::new(Client::from_conf(config))
    }
}

#[async_trait]
impl TranscriptionService for AwsTranscriber {
    async fn start_job(&self, job: &TranscriptionJob) -> Result<()> {
        let max_speakers = i32::try_from(job.max_speakers).map_err(|_| {
            DigestError::Transcription(format!("max speakers out of range: {}", job.max_speakers))
        })?;

        self.client
            .start_transcription_job()
            .transcription_job_name(&job.name)
            .media(Media::builder().media_file_uri(&job.media_uri).build())
            .media_format(MediaFormat::from(job.media_format.as_str()))
            .language_code(LanguageCode::from(job.language.as_str()))
            .output_bucket_name(&job.output_bucket)
            .settings(
                JobSettings::builder()
                    .show_speaker_labels(true)
                    .max_speaker_labels(max_speakers)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| {
                DigestError::Transcription(format!(
                    "failed to start job {}: {}",
                    job.name,
                    DisplayErrorContext(e)
                ))
            })?;

        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> Result<JobStatus> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| {
                DigestError::Transcription(format!(
                    "failed to query job {}: {}",
                    job_name,
                    DisplayErrorContext(e)
                ))
            })?;

        let job = output.transcription_job().ok_or_else(|| {
            DigestError::Transcription(format!("no job named {job_name} in response"))
        })?;

        let status = map_status(job.transcription_job_status(), job.failure_reason());
        tracing::debug!(job_name, %status, "fetched job status");

        Ok(status)
    }
}

/// Translate the service's job status into a [`JobStatus`].
///
/// A missing or unrecognized status counts as still running.
fn map_status(status: Option<&TranscriptionJobStatus>, failure_reason: Option<&str>) -> JobStatus {
    match status {
        Some(TranscriptionJobStatus::Completed) => JobStatus::Completed,
        Some(TranscriptionJobStatus::Failed) => JobStatus::Failed {
            reason: failure_reason.map(str::to_string),
        },
        Some(TranscriptionJobStatus::Queued) => JobStatus::Queued,
        Some(TranscriptionJobStatus::InProgress) | None => JobStatus::InProgress,
        Some(other) => {
            tracing::warn!(status = other.as_str(), "unknown job status");
            JobStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_stays_queued() {
        assert_eq!(
            map_status(Some(&TranscriptionJobStatus::Queued), None),
            JobStatus::Queued
        );
    }

    #[test]
    fn failed_keeps_failure_reason() {
        let status = map_status(
            Some(&TranscriptionJobStatus::Failed),
            Some("The media format provided does not match the detected media format."),
        );

        assert_eq!(
            status,
            JobStatus::Failed {
                reason: Some(
                    "The media format provided does not match the detected media format."
                        .to_string()
                )
            }
        );
    }

    #[test]
    fn completed_ignores_failure_reason() {
        assert_eq!(
            map_status(Some(&TranscriptionJobStatus::Completed), Some("stale")),
            JobStatus::Completed
        );
    }

    #[test]
    fn missing_status_is_in_progress() {
        assert_eq!(map_status(None, None), JobStatus::InProgress);
    }

    #[test]
    fn unknown_status_is_in_progress() {
        let paused = TranscriptionJobStatus::from("PAUSED");

        assert_eq!(map_status(Some(&paused), None), JobStatus::InProgress);
    }
}
