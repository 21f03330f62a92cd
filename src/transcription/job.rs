//! Transcription job model and submission

use async_trait::async_trait;
use std::path::Path;

use crate::Result;

/// Status reported by the transcription service for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted but not started yet
    Queued,
    /// Audio is being processed
    InProgress,
    /// Output document is available
    Completed,
    /// The service gave up on the job
    Failed { reason: Option<String> },
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed { .. } => "FAILED",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for a new transcription job.
pub struct JobRequest<'a> {
    /// `s3://` URI of the uploaded audio
    pub media_uri: &'a str,
    pub media_format: &'a str,
    pub language: &'a str,
    /// Bucket receiving `<job name>.json`
    pub output_bucket: &'a str,
    pub max_speakers: u32,
}

/// A submitted transcription job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionJob {
    /// Unique job name (`transcription-job-<uuid>`)
    pub name: String,
    pub media_uri: String,
    pub media_format: String,
    pub language: String,
    pub output_bucket: String,
    pub max_speakers: u32,
}

impl TranscriptionJob {
    /// Create a job description with a freshly generated name
    pub fn new(request: &JobRequest<'_>) -> Self {
        Self {
            name: format!("transcription-job-{}", uuid::Uuid::new_v4()),
            media_uri: request.media_uri.to_string(),
            media_format: request.media_format.to_string(),
            language: request.language.to_string(),
            output_bucket: request.output_bucket.to_string(),
            max_speakers: request.max_speakers,
        }
    }

    /// Key of the output document in the output bucket
    pub fn output_key(&self) -> String {
        format!("{}.json", self.name)
    }
}

/// Remote speech-to-text service.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Start a diarized transcription job.
    async fn start_job(&self, job: &TranscriptionJob) -> Result<()>;

    /// Query the current status of a job.
    async fn job_status(&self, job_name: &str) -> Result<JobStatus>;
}

/// Submit a new job with speaker diarization enabled.
pub async fn submit(
    service: &dyn TranscriptionService,
    request: JobRequest<'_>,
) -> Result<TranscriptionJob> {
    let job = TranscriptionJob::new(&request);

    tracing::info!(
        job_name = %job.name,
        media_uri = %job.media_uri,
        max_speakers = job.max_speakers,
        "starting transcription job"
    );
    service.start_job(&job).await?;

    Ok(job)
}

/// Map an audio file extension to a Transcribe media format.
pub fn media_format_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "mp3" => Some("mp3"),
        "mp4" => Some("mp4"),
        "m4a" => Some("m4a"),
        "wav" => Some("wav"),
        "flac" => Some("flac"),
        "ogg" => Some("ogg"),
        "amr" => Some("amr"),
        "webm" => Some("webm"),
        _ => None,
    }
}
