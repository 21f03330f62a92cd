//! Bounded status polling for transcription jobs

use std::time::Duration;
use tokio::time::Instant;

use crate::config::TranscriptionSettings;
use crate::transcription::job::{JobStatus, TranscriptionService};
use crate::Result;

/// How often and for how long to poll a job's status.
///
/// The delay starts at `initial_interval` and grows by `multiplier` after every
/// sleep, never exceeding `max_interval`. Polling stops after `max_attempts`
/// status checks or when the next sleep would run past `max_wait`.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_attempts: u32,
    pub max_wait: Duration,
}

impl PollPolicy {
    /// Constant delay with no attempt or time limit
    pub fn fixed(interval: Duration) -> Self {
        Self {
            initial_interval: interval,
            multiplier: 1.0,
            max_interval: interval,
            max_attempts: u32::MAX,
            max_wait: Duration::MAX,
        }
    }

    /// Delay to use after sleeping for `current`
    pub fn next_interval(&self, current: Duration) -> Duration {
        if !self.multiplier.is_finite() || self.multiplier <= 1.0 {
            return current;
        }

        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max_interval)
            .min(self.max_interval)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        TranscriptionSettings::default().poll_policy()
    }
}

/// How a wait for a terminal status ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed,
    Failed { reason: Option<String> },
    /// The policy ran out before the job reached a terminal status
    TimedOut { attempts: u32, elapsed: Duration },
}

/// Poll `job_name` until it completes, fails, or `policy` is exhausted.
pub async fn await_completion(
    service: &dyn TranscriptionService,
    job_name: &str,
    policy: &PollPolicy,
) -> Result<PollOutcome> {
    let started = Instant::now();
    let mut interval = policy.initial_interval;
    let mut attempts: u32 = 0;

    loop {
        let status = service.job_status(job_name).await?;
        attempts += 1;
        tracing::debug!(job_name, attempt = attempts, %status, "polled transcription job");

        match status {
            JobStatus::Completed => return Ok(PollOutcome::Completed),
            JobStatus::Failed { reason } => return Ok(PollOutcome::Failed { reason }),
            JobStatus::Queued | JobStatus::InProgress => {}
        }

        let elapsed = started.elapsed();
        if attempts >= policy.max_attempts || elapsed.saturating_add(interval) > policy.max_wait {
            tracing::warn!(
                job_name,
                attempts,
                elapsed_secs = elapsed.as_secs(),
                "giving up on transcription job"
            );
            return Ok(PollOutcome::TimedOut { attempts, elapsed });
        }

        tokio::time::sleep(interval).await;
        interval = policy.next_interval(interval);
    }
}
