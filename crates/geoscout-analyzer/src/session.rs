//! Submit-then-poll flow for a single analysis.
//!
//! An [`AnalysisSession`] runs at most one flow at a time. Each flow is tagged
//! with the generation it started under; starting another flow or calling
//! [`AnalysisSession::cancel`] bumps the generation, which wakes and stops the
//! old flow and keeps any response it was still waiting on from touching the
//! session state.
//!
//! Polling is sequential: the next status request is not issued until the
//! previous one has returned, so responses can never arrive out of order.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use geoscout_core::{AnalysisResult, AppConfig, JobStatus, Tier};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use crate::client::AnalysisApi;
use crate::error::AnalyzerError;

/// Shortest gap the session will leave between two status requests.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Timing and request options for a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay before the first status request and between later ones.
    /// Values below [`MIN_POLL_INTERVAL`] are raised to it.
    pub interval: Duration,
    /// Window, measured from job creation, after which polling gives up.
    pub timeout: Duration,
    pub tier: Option<Tier>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            timeout: Duration::from_secs(60),
            tier: None,
        }
    }
}

impl PollConfig {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            timeout: config.poll_timeout(),
            tier: None,
        }
    }

    #[must_use]
    pub fn with_tier(mut self, tier: Option<Tier>) -> Self {
        self.tier = tier;
        self
    }
}

/// What a front end should currently show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Submitting {
        input: String,
    },
    Polling {
        input: String,
        job_id: String,
        polls: u32,
    },
    Completed(AnalysisResult),
    Failed {
        message: String,
    },
    TimedOut {
        message: String,
    },
}

impl SessionState {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting { .. } | Self::Polling { .. })
    }
}

pub struct AnalysisSession<A> {
    api: A,
    config: PollConfig,
    generation: watch::Sender<u64>,
    state: Mutex<SessionState>,
}

impl<A: AnalysisApi> AnalysisSession<A> {
    pub fn new(api: A, config: PollConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            api,
            config,
            generation,
            state: Mutex::new(SessionState::Idle),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock_state().clone()
    }

    /// Id of the active flow; bumped by every new flow and every cancel.
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    /// Stops the active flow, if any, and resets the state to `Idle`.
    pub fn cancel(&self) {
        self.generation.send_modify(|g| *g += 1);
        *self.lock_state() = SessionState::Idle;
        tracing::debug!(generation = self.generation(), "analysis flow cancelled");
    }

    /// Runs one full flow for `input`: submit, then poll until the job
    /// completes, fails, or the timeout passes.
    ///
    /// Input that is empty after trimming is ignored: no request is made, the
    /// state is left as it was, and `Ok(None)` is returned.
    ///
    /// # Errors
    ///
    /// - [`AnalyzerError::Http`] / [`AnalyzerError::Deserialize`] if the
    ///   submit or any status request fails. Nothing is retried.
    /// - [`AnalyzerError::JobFailed`] if the backend reports the job failed.
    /// - [`AnalyzerError::Timeout`] if the job is still running when
    ///   [`PollConfig::timeout`] elapses.
    /// - [`AnalyzerError::Superseded`] if [`Self::cancel`] or another
    ///   `submit` ran while this flow was active.
    pub async fn submit(&self, input: &str) -> Result<Option<AnalysisResult>, AnalyzerError> {
        let input = input.trim();
        if input.is_empty() {
            tracing::debug!("ignoring empty analysis input");
            return Ok(None);
        }

        let mut generations = self.generation.subscribe();
        let generation = self.begin(input);

        let outcome = tokio::select! {
            biased;
            () = superseded(&mut generations, generation) => Err(AnalyzerError::Superseded),
            outcome = self.run_flow(generation, input) => outcome,
        };

        match outcome {
            Ok(result) => {
                if self.apply(generation, SessionState::Completed(result.clone())) {
                    tracing::info!(
                        brand = %result.brand_name,
                        score = result.score,
                        "analysis completed"
                    );
                    Ok(Some(result))
                } else {
                    Err(AnalyzerError::Superseded)
                }
            }
            Err(err) => {
                self.record_failure(generation, &err);
                Err(err)
            }
        }
    }

    async fn run_flow(
        &self,
        generation: u64,
        input: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let job_id = self.api.submit(input, self.config.tier).await?;
        if !self.apply(
            generation,
            SessionState::Polling {
                input: input.to_owned(),
                job_id: job_id.clone(),
                polls: 0,
            },
        ) {
            return Err(AnalyzerError::Superseded);
        }

        let started = Instant::now();
        match tokio::time::timeout(
            self.config.timeout,
            self.poll_until_done(generation, input, &job_id),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(AnalyzerError::Timeout {
                job_id,
                elapsed: started.elapsed(),
            }),
        }
    }

    async fn poll_until_done(
        &self,
        generation: u64,
        input: &str,
        job_id: &str,
    ) -> Result<AnalysisResult, AnalyzerError> {
        let interval = self.config.interval.max(MIN_POLL_INTERVAL);
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls: u32 = 0;

        loop {
            ticker.tick().await;
            polls = polls.saturating_add(1);

            let job = self.api.fetch_status(job_id, input).await?;
            if !self.is_current(generation) {
                return Err(AnalyzerError::Superseded);
            }

            if job.status == JobStatus::Failed {
                return Err(AnalyzerError::JobFailed {
                    job_id: job_id.to_owned(),
                });
            }
            if let Some(result) = job.finished_result() {
                return Ok(result.clone());
            }
            if job.status == JobStatus::Completed {
                tracing::debug!(job_id, polls, "job completed without a result yet");
            }

            self.apply(
                generation,
                SessionState::Polling {
                    input: input.to_owned(),
                    job_id: job_id.to_owned(),
                    polls,
                },
            );
        }
    }

    /// Starts a new flow, superseding any running one.
    fn begin(&self, input: &str) -> u64 {
        let mut generation = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            generation = *g;
        });
        *self.lock_state() = SessionState::Submitting {
            input: input.to_owned(),
        };
        tracing::debug!(generation, input, "analysis flow started");
        generation
    }

    fn is_current(&self, generation: u64) -> bool {
        *self.generation.borrow() == generation
    }

    /// Replaces the state if `generation` is still the active flow.
    fn apply(&self, generation: u64, next: SessionState) -> bool {
        let mut state = self.lock_state();
        if !self.is_current(generation) {
            return false;
        }
        *state = next;
        true
    }

    fn record_failure(&self, generation: u64, err: &AnalyzerError) {
        let next = match err {
            AnalyzerError::Superseded => return,
            AnalyzerError::Timeout { job_id, elapsed } => {
                tracing::warn!(
                    job_id = %job_id,
                    elapsed_secs = elapsed.as_secs(),
                    "analysis timed out"
                );
                SessionState::TimedOut {
                    message: err.user_message().to_owned(),
                }
            }
            other => {
                tracing::error!(error = %other, "analysis failed");
                SessionState::Failed {
                    message: other.user_message().to_owned(),
                }
            }
        };
        self.apply(generation, next);
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resolves once the session's generation is no longer `generation`.
///
/// Compares against the current value rather than waiting for the next
/// change, so a bump that landed before this started still counts.
async fn superseded(generations: &mut watch::Receiver<u64>, generation: u64) {
    loop {
        if *generations.borrow_and_update() != generation {
            return;
        }
        if generations.changed().await.is_err() {
            // The session owns the sender, so this only happens on teardown.
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
