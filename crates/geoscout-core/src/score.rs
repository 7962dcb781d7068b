//! Qualitative labels derived from a 0–100 visibility score.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreLevel {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl ScoreLevel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excellent
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 40.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreLevel::Excellent => write!(f, "Excellent"),
            ScoreLevel::Good => write!(f, "Good"),
            ScoreLevel::Moderate => write!(f, "Moderate"),
            ScoreLevel::Low => write!(f, "Low"),
        }
    }
}

#[must_use]
pub fn market_position(score: f64) -> &'static str {
    if score >= 70.0 {
        "Above average"
    } else if score >= 40.0 {
        "Average"
    } else {
        "Below average"
    }
}

#[must_use]
pub fn ai_reach(score: f64) -> &'static str {
    if score >= 70.0 {
        "High"
    } else if score >= 40.0 {
        "Moderate"
    } else {
        "Limited"
    }
}

/// Percentage points left before a perfect score.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn growth_potential(score: f64) -> u8 {
    100 - score.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(ScoreLevel::from_score(80.0), ScoreLevel::Excellent);
        assert_eq!(ScoreLevel::from_score(79.9), ScoreLevel::Good);
        assert_eq!(ScoreLevel::from_score(60.0), ScoreLevel::Good);
        assert_eq!(ScoreLevel::from_score(40.0), ScoreLevel::Moderate);
        assert_eq!(ScoreLevel::from_score(39.0), ScoreLevel::Low);
        assert_eq!(ScoreLevel::from_score(0.0), ScoreLevel::Low);
    }

    #[test]
    fn insights_follow_thresholds() {
        assert_eq!(market_position(70.0), "Above average");
        assert_eq!(market_position(55.0), "Average");
        assert_eq!(market_position(10.0), "Below average");
        assert_eq!(ai_reach(90.0), "High");
        assert_eq!(ai_reach(40.0), "Moderate");
        assert_eq!(ai_reach(39.9), "Limited");
    }

    #[test]
    fn growth_potential_is_complement() {
        assert_eq!(growth_potential(72.4), 28);
        assert_eq!(growth_potential(100.0), 0);
        assert_eq!(growth_potential(150.0), 0);
    }
}
