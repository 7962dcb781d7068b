use std::time::Duration;

use thiserror::Error;

/// Errors returned by the analysis API client and session.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Network or TLS failure, or a non-2xx status from the backend.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The backend reported `"status": "failed"` for the job.
    #[error("analysis job {job_id} failed")]
    JobFailed { job_id: String },

    /// The job did not complete within the client-side window.
    #[error("analysis job {job_id} did not complete within {}s", .elapsed.as_secs())]
    Timeout { job_id: String, elapsed: Duration },

    /// A newer flow was started, or the session was cancelled, while this
    /// one was in flight.
    #[error("analysis flow was superseded")]
    Superseded,

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl AnalyzerError {
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Message suitable for showing to the person who asked for the analysis.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => {
                "Analysis is taking longer than usual. Please try again later."
            }
            Self::Superseded => "Analysis was cancelled.",
            Self::Http(_)
            | Self::Deserialize { .. }
            | Self::JobFailed { .. }
            | Self::InvalidBaseUrl { .. } => "Analysis failed. Please try again later.",
        }
    }
}
