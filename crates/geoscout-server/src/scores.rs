//! Free-tier score lookup: live cache entry, then the preload table, then the
//! low-confidence placeholder.

use geoscout_core::{Breakdown, Confidence, GeoLiteResult};
use thiserror::Error;

use crate::cache::{CacheError, ScoreCache};

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("brand parameter required")]
    MissingBrand,

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// A brand with a known free-tier score.
#[derive(Debug, Clone, Copy)]
pub struct PreloadEntry {
    pub brand: &'static str,
    pub score: u8,
    pub breakdown: Breakdown,
    pub insight: &'static str,
}

impl PreloadEntry {
    const fn new(
        brand: &'static str,
        score: u8,
        (ai, community, structured): (u8, u8, u8),
        insight: &'static str,
    ) -> Self {
        Self {
            brand,
            score,
            breakdown: Breakdown {
                ai,
                community,
                structured,
            },
            insight,
        }
    }

    fn to_result(self, data_age: String) -> GeoLiteResult {
        GeoLiteResult {
            score: self.score,
            breakdown: self.breakdown,
            insight: self.insight.to_string(),
            confidence: Confidence::High,
            cached: false,
            data_age,
        }
    }
}

pub static PRELOAD: [PreloadEntry; 12] = [
    PreloadEntry::new("nike", 18, (9, 5, 4), "Leader in AI answers and communities"),
    PreloadEntry::new("apple", 19, (10, 5, 4), "Dominant everywhere, strong brand"),
    PreloadEntry::new("tesla", 17, (9, 6, 2), "Active communities, little structured data"),
    PreloadEntry::new("google", 19, (10, 5, 4), "Maximum visibility in AI answers"),
    PreloadEntry::new("microsoft", 18, (9, 5, 4), "Strong presence, good documentation"),
    PreloadEntry::new("amazon", 18, (9, 5, 4), "E-commerce leader with excellent structure"),
    PreloadEntry::new("netflix", 16, (8, 5, 3), "Popular in AI answers and forums"),
    PreloadEntry::new("adidas", 16, (8, 4, 4), "Good visibility, competes with Nike"),
    PreloadEntry::new("coca-cola", 17, (9, 4, 4), "Global brand, stable presence"),
    PreloadEntry::new("mcdonalds", 16, (8, 4, 4), "Known everywhere, good structure"),
    PreloadEntry::new("spotify", 17, (8, 5, 4), "Popular with younger users, active forums"),
    PreloadEntry::new("openai", 19, (10, 5, 4), "AI-native brand, maximum visibility"),
];

pub const PLACEHOLDER_INSIGHT: &str = "A full analysis is needed for an accurate score";

/// Looks up a normalized brand key in the preload table.
pub fn preloaded(key: &str) -> Option<&'static PreloadEntry> {
    PRELOAD.iter().find(|entry| entry.brand == key)
}

pub fn placeholder(data_age: String) -> GeoLiteResult {
    GeoLiteResult {
        score: 10,
        breakdown: Breakdown {
            ai: 5,
            community: 3,
            structured: 2,
        },
        insight: PLACEHOLDER_INSIGHT.to_string(),
        confidence: Confidence::Low,
        cached: false,
        data_age,
    }
}

/// Trims and lowercases a brand name into a cache key. `None` when nothing
/// is left.
pub fn normalize_brand(raw: &str) -> Option<String> {
    let key = raw.trim().to_lowercase();
    (!key.is_empty()).then_some(key)
}

/// Returns the free-tier result for `brand`, filling the cache on a miss.
///
/// # Errors
///
/// Returns [`ScoreError::MissingBrand`] for a blank brand and
/// [`ScoreError::Cache`] if the cache lock is poisoned.
pub fn lookup(cache: &ScoreCache, brand: &str) -> Result<GeoLiteResult, ScoreError> {
    let key = normalize_brand(brand).ok_or(ScoreError::MissingBrand)?;

    if let Some(mut hit) = cache.get(&key)? {
        tracing::debug!(brand = %key, "free-tier score served from cache");
        hit.cached = true;
        return Ok(hit);
    }

    let today = cache.now().format("%Y-%m-%d").to_string();
    let result = match preloaded(&key) {
        Some(entry) => entry.to_result(today),
        None => {
            tracing::debug!(brand = %key, "brand not preloaded, using placeholder");
            placeholder(today)
        }
    };

    cache.insert(key, result.clone())?;
    Ok(result)
}
