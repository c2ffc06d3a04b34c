//! Fixed-interval polling of dataset jobs.
//!
//! A job moves `pending -> ready | failed | timeout`. The status source
//! and the sleep are traits so the loop can run without a network or a
//! real clock.

use crate::dataset::client::DatasetError;
use crate::models::JobStatus;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Something that can report the status of a snapshot.
#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn status(&self, snapshot_id: &str) -> Result<JobStatus, DatasetError>;
}

/// Waits between polls.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Poll interval and attempt budget.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

/// Poll state machine for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollState {
    status: JobStatus,
    attempts: u32,
    max_attempts: u32,
}

impl PollState {
    pub fn new(max_attempts: u32) -> Self {
        let status = if max_attempts == 0 {
            JobStatus::Timeout
        } else {
            JobStatus::Pending
        };

        Self {
            status,
            attempts: 0,
            max_attempts,
        }
    }

    /// Feed one observed remote status and return the resulting state.
    ///
    /// Observations after a terminal state are ignored.
    pub fn observe(&mut self, observed: JobStatus) -> JobStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        self.attempts += 1;
        self.status = if observed.is_terminal() {
            observed
        } else if self.attempts >= self.max_attempts {
            JobStatus::Timeout
        } else {
            JobStatus::Pending
        };

        self.status
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Poll until the job is ready, failed, or the attempt budget runs out.
///
/// Sleeps `settings.interval` between observations. A probe error aborts
/// the loop.
pub async fn poll_job<P, S>(
    probe: &P,
    sleeper: &S,
    snapshot_id: &str,
    settings: PollSettings,
) -> Result<JobStatus, DatasetError>
where
    P: StatusProbe + ?Sized,
    S: Sleeper + ?Sized,
{
    let mut state = PollState::new(settings.max_attempts);

    while !state.status().is_terminal() {
        let observed = probe.status(snapshot_id).await?;
        let status = state.observe(observed);
        debug!(
            "Poll {}/{} for {}: {}",
            state.attempts(),
            settings.max_attempts,
            snapshot_id,
            status
        );

        if !status.is_terminal() {
            sleeper.sleep(settings.interval).await;
        }
    }

    Ok(state.status())
}
