//! Transcription module for audio-digest
//!
//! Drives Amazon Transcribe jobs and turns their output into a
//! speaker-labeled transcript.

mod aws;
mod job;
mod poll;
mod transcript;

pub use aws::AwsTranscriber;
pub use job::{
    media_format_for_path, submit, JobRequest, JobStatus, TranscriptionJob, TranscriptionService,
};
pub use poll::{await_completion, PollOutcome, PollPolicy};
pub use transcript::{parse_transcript, reshape, ItemType, TranscriptItem};
