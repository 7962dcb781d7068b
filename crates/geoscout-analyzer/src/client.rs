//! HTTP client for the external AI-visibility analysis API.
//!
//! Two endpoints are used: `POST /api/analyzer/analyze` creates a job and
//! returns its id, `GET /api/analyzer/results/{jobId}` reports its status.
//! Neither call is retried here; the session decides what a failure means.

use std::future::Future;
use std::time::Duration;

use geoscout_core::{AnalysisJob, AppConfig, Tier};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::AnalyzerError;
use crate::types::{StatusResponse, SubmitRequest, SubmitResponse};

/// The two operations an analysis flow needs from the backend.
///
/// [`AnalyzerClient`] is the HTTP implementation; tests drive
/// [`crate::AnalysisSession`] with scripted implementations.
pub trait AnalysisApi: Send + Sync {
    /// Creates a job for `input` and returns its opaque id.
    fn submit(
        &self,
        input: &str,
        tier: Option<Tier>,
    ) -> impl Future<Output = Result<String, AnalyzerError>> + Send;

    /// Reads the current status of `job_id`. `submitted_input` fills in the
    /// brand name when the backend leaves it out.
    fn fetch_status(
        &self,
        job_id: &str,
        submitted_input: &str,
    ) -> impl Future<Output = Result<AnalysisJob, AnalyzerError>> + Send;
}

/// Client for the analysis REST API.
///
/// Use [`AnalyzerClient::from_config`] in binaries or
/// [`AnalyzerClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    client: Client,
    base_url: Url,
}

impl AnalyzerClient {
    /// Builds a client from the shared application config.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`AnalyzerError::InvalidBaseUrl`] if the configured
    /// API URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, AnalyzerError> {
        Self::new(
            &config.api_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`AnalyzerError::InvalidBaseUrl`] if `base_url` is not
    /// an absolute http(s) URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, AnalyzerError> {
        Self::new(base_url, timeout_secs, "geoscout/0.1 (ai-visibility)")
    }

    fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, AnalyzerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so joined paths land under the base
        // rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |reason: String| AnalyzerError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason,
        };
        let base_url = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid("expected an absolute http(s) URL".to_owned()));
        }

        Ok(Self { client, base_url })
    }

    pub(crate) fn analyze_url(&self) -> Result<Url, AnalyzerError> {
        self.endpoint(&["api", "analyzer", "analyze"])
    }

    pub(crate) fn results_url(&self, job_id: &str) -> Result<Url, AnalyzerError> {
        self.endpoint(&["api", "analyzer", "results", job_id])
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, AnalyzerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| AnalyzerError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Asserts a 2xx status and decodes the body as `T`.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, AnalyzerError> {
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AnalyzerError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

impl AnalysisApi for AnalyzerClient {
    /// # Errors
    ///
    /// - [`AnalyzerError::Http`] on network failure or a non-2xx status.
    /// - [`AnalyzerError::Deserialize`] if the body has no `jobId`.
    async fn submit(&self, input: &str, tier: Option<Tier>) -> Result<String, AnalyzerError> {
        let url = self.analyze_url()?;
        tracing::debug!(%url, input, "submitting analysis request");

        let response = self
            .client
            .post(url)
            .json(&SubmitRequest { input, tier })
            .send()
            .await?;
        let body: SubmitResponse = Self::decode(response, "analyze").await?;

        tracing::info!(job_id = %body.job_id, "analysis job created");
        Ok(body.job_id)
    }

    /// # Errors
    ///
    /// - [`AnalyzerError::Http`] on network failure or a non-2xx status.
    /// - [`AnalyzerError::Deserialize`] if the body is not a status envelope.
    async fn fetch_status(
        &self,
        job_id: &str,
        submitted_input: &str,
    ) -> Result<AnalysisJob, AnalyzerError> {
        let url = self.results_url(job_id)?;
        let response = self.client.get(url).send().await?;
        let body: StatusResponse =
            Self::decode(response, &format!("results(job_id={job_id})")).await?;

        tracing::debug!(job_id, status = %body.status, "job status polled");
        Ok(body.into_job(job_id, submitted_input))
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
