/**
 * Submit-then-poll driver for job based image providers.
 */
use std::time::Duration;

use async_trait::async_trait;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before every status check, including the first one.
    pub interval: Duration,

    pub max_attempts: u32,

    /// Overall budget on top of the attempt cap, measured from the first
    /// wait. `None` leaves the attempt cap as the only limit.
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
            timeout: None,
        }
    }
}

/// Classification of a single status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Terminal. Carries the first result URL if the provider sent one.
    Succeeded(Option<String>),
    /// Terminal.
    Failed(String),
    InProgress,
    /// The check itself failed; the job may still be running.
    TransientError(String),
}

#[async_trait]
pub trait RemoteJob: Send + Sync {
    /// Creates the job and returns its identifier.
    async fn submit(&self, prompt: &str) -> Result<String, ProviderError>;

    async fn status(&self, job_id: &str) -> JobStatus;
}

/// Submits a job and polls it until it reaches a terminal state or the
/// policy runs out.
///
/// # Errors
///
/// - whatever `submit` returns
/// - `GenerationFailed` if the job fails or succeeds without a result URL
/// - `Timeout` once `max_attempts` checks (or the overall timeout) pass
///   without a terminal state
pub async fn run_to_completion<J>(
    job: &J,
    prompt: &str,
    policy: PollPolicy,
) -> Result<String, ProviderError>
where
    J: RemoteJob + ?Sized,
{
    let job_id = job.submit(prompt).await?;
    tracing::info!(job_id = %job_id, "image job submitted");

    let polling = poll_until_done(job, &job_id, policy);

    match policy.timeout {
        Some(limit) => tokio::time::timeout(limit, polling).await.map_err(|_| {
            tracing::warn!(job_id = %job_id, "image job exceeded {limit:?}");
            ProviderError::Timeout(format!("no result within {limit:?}"))
        })?,
        None => polling.await,
    }
}

async fn poll_until_done<J>(
    job: &J,
    job_id: &str,
    policy: PollPolicy,
) -> Result<String, ProviderError>
where
    J: RemoteJob + ?Sized,
{
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.interval).await;

        match job.status(job_id).await {
            JobStatus::Succeeded(Some(url)) => {
                tracing::info!(job_id, attempt, "image job succeeded");
                return Ok(url);
            }
            JobStatus::Succeeded(None) => {
                return Err(ProviderError::GenerationFailed(
                    "job succeeded without an image".to_string(),
                ));
            }
            JobStatus::Failed(reason) => {
                tracing::error!(job_id, attempt, "image job failed: {reason}");
                return Err(ProviderError::GenerationFailed(reason));
            }
            JobStatus::InProgress => {
                tracing::debug!(job_id, attempt, "image job still running");
            }
            JobStatus::TransientError(e) => {
                tracing::warn!(job_id, attempt, "status check failed: {e}");
            }
        }
    }

    tracing::warn!(
        job_id,
        "image job gave no result after {} checks",
        policy.max_attempts
    );

    Err(ProviderError::Timeout(format!(
        "no result after {} status checks",
        policy.max_attempts
    )))
}
