//! Wire types for the external analysis API.
//!
//! The backend has returned several result layouts over its lifetime
//! (`score` vs. `averageScore`, a `providers` array vs. flat `chatgpt` /
//! `google` fields, `analysis` vs. `insights`). [`RawAnalysisResult`] accepts
//! all of them and [`RawAnalysisResult::into_result`] folds them into the single
//! [`AnalysisResult`] the rest of the workspace works with.

use geoscout_core::{AnalysisJob, AnalysisResult, JobStatus, ProviderScore, Tier};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/analyzer/analyze`.
#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    pub input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
}

/// Response of `POST /api/analyzer/analyze`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: String,
}

/// Response of `GET /api/analyzer/results/{jobId}`.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub result: Option<RawAnalysisResult>,
}

impl StatusResponse {
    /// Decodes the envelope into an [`AnalysisJob`]. `input` is the text the
    /// job was submitted with, used when the backend omits the brand name.
    #[must_use]
    pub fn into_job(self, job_id: &str, input: &str) -> AnalysisJob {
        AnalysisJob {
            job_id: job_id.to_owned(),
            status: self.status,
            result: self.result.map(|raw| raw.into_result(input)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawProviderScore {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisResult {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub insights: Option<String>,
    #[serde(default)]
    pub providers: Option<Vec<RawProviderScore>>,
    #[serde(default)]
    pub recommendations: Option<Vec<String>>,
    #[serde(default)]
    pub chatgpt: Option<f64>,
    #[serde(default)]
    pub google: Option<f64>,
}

impl RawAnalysisResult {
    #[must_use]
    pub fn into_result(self, input: &str) -> AnalysisResult {
        let score = self
            .score
            .filter(|s| s.abs() > f64::EPSILON)
            .or(self.average_score)
            .unwrap_or(0.0)
            .clamp(0.0, 100.0);

        let providers = match self.providers {
            Some(list) if !list.is_empty() => list
                .into_iter()
                .map(|p| ProviderScore {
                    name: p.name,
                    score: p.score.clamp(0.0, 100.0),
                    error: p.error,
                })
                .collect(),
            _ => [("ChatGPT", self.chatgpt), ("Google AI", self.google)]
                .into_iter()
                .filter_map(|(name, value)| {
                    value.map(|v| ProviderScore {
                        name: name.to_owned(),
                        score: v.clamp(0.0, 100.0),
                        error: None,
                    })
                })
                .collect(),
        };

        let brand_name = self
            .brand_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| input.to_owned());

        AnalysisResult {
            brand_name,
            domain: self.domain.filter(|d| !d.trim().is_empty()),
            score,
            confidence: self.confidence,
            providers,
            analysis: self.analysis.or(self.insights),
            recommendations: self.recommendations.unwrap_or_default(),
        }
    }
}
