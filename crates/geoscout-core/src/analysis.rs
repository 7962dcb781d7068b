//! Domain types for a full AI-visibility analysis job.
//!
//! These are the decoded, shape-stable forms. The external backend has shipped
//! several response layouts over time; `geoscout-analyzer` folds all of them
//! into [`AnalysisResult`] once, at the API boundary.

use serde::{Deserialize, Serialize};

/// Pricing tier sent along with an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
}

/// Lifecycle state of a job on the analysis backend.
///
/// The backend only ever moves a job from `Pending` to one of the two
/// terminal states. Any status string other than `completed` or `failed`
/// (for example `processing`) is read as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum JobStatus {
    Pending,
    Completed,
    Failed,
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl JobStatus {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One AI provider's visibility score for the brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderScore {
    pub name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Final output of a completed analysis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub brand_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Overall visibility, `0.0..=100.0`.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    #[serde(default)]
    pub providers: Vec<ProviderScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Score rounded to the nearest whole percent, as shown to users.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_score(&self) -> u8 {
        self.score.clamp(0.0, 100.0).round() as u8
    }
}

/// A job as last reported by the status endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisJob {
    pub job_id: String,
    pub status: JobStatus,
    pub result: Option<AnalysisResult>,
}

impl AnalysisJob {
    /// Returns the result only when the job is completed and carries one.
    ///
    /// A `completed` job without a payload is still in flight from the
    /// client's point of view.
    #[must_use]
    pub fn finished_result(&self) -> Option<&AnalysisResult> {
        match self.status {
            JobStatus::Completed => self.result.as_ref(),
            JobStatus::Pending | JobStatus::Failed => None,
        }
    }
}
