//! Free-tier "GEO Scout" score, returned by `GET /api/geo-free`.

use serde::{Deserialize, Serialize};

/// Maximum of the overall free-tier score.
pub const MAX_SCORE: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// Sub-scores: AI answers out of 10, community presence and structured data
/// out of 5 each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub ai: u8,
    pub community: u8,
    pub structured: u8,
}

impl Breakdown {
    pub const AI_MAX: u8 = 10;
    pub const COMMUNITY_MAX: u8 = 5;
    pub const STRUCTURED_MAX: u8 = 5;

    #[must_use]
    pub fn total(&self) -> u8 {
        self.ai
            .saturating_add(self.community)
            .saturating_add(self.structured)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLiteResult {
    pub score: u8,
    pub breakdown: Breakdown,
    pub insight: String,
    pub confidence: Confidence,
    pub cached: bool,
    /// Day the result was produced, `YYYY-MM-DD`.
    pub data_age: String,
}
