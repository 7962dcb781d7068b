//! Plain-text rendering of analysis reports and free-tier score cards.

use std::fmt;

use geoscout_core::score::{ai_reach, growth_potential, market_position};
use geoscout_core::{AnalysisResult, Breakdown, GeoLiteResult, ScoreLevel};

const BAR_WIDTH: usize = 20;

/// Fixed-width bar, `value` out of `max`, clamped to the ends.
fn bar(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}]",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}

/// Full report for a completed analysis.
pub(crate) struct Report<'a>(pub &'a AnalysisResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let score = result.rounded_score();
        let level = ScoreLevel::from_score(result.score);

        match &result.domain {
            Some(domain) if *domain != result.brand_name => {
                writeln!(f, "{} ({domain})", result.brand_name)?;
            }
            _ => writeln!(f, "{}", result.brand_name)?,
        }
        writeln!(f, "AI visibility: {score}/100  {level}")?;
        writeln!(f, "{} {score}%", bar(result.score, 100.0, BAR_WIDTH))?;
        if let Some(confidence) = &result.confidence {
            writeln!(f, "Confidence: {confidence}")?;
        }

        if !result.providers.is_empty() {
            let width = result
                .providers
                .iter()
                .map(|p| p.name.chars().count())
                .max()
                .unwrap_or(0);
            writeln!(f, "\nProviders")?;
            for provider in &result.providers {
                match &provider.error {
                    Some(err) => {
                        writeln!(f, "  {:<width$}  unavailable ({err})", provider.name)?;
                    }
                    None => writeln!(
                        f,
                        "  {:<width$}  {} {:.0}",
                        provider.name,
                        bar(provider.score, 100.0, BAR_WIDTH),
                        provider.score.clamp(0.0, 100.0)
                    )?,
                }
            }
        }

        writeln!(f, "\nKey insights")?;
        writeln!(f, "  Market position:   {}", market_position(result.score))?;
        writeln!(f, "  Growth potential:  +{}%", growth_potential(result.score))?;
        writeln!(f, "  AI reach:          {}", ai_reach(result.score))?;

        if let Some(analysis) = &result.analysis {
            writeln!(f, "\nAnalysis\n  {analysis}")?;
        }

        if !result.recommendations.is_empty() {
            writeln!(f, "\nRecommendations")?;
            for (i, rec) in result.recommendations.iter().enumerate() {
                writeln!(f, "  {}. {rec}", i + 1)?;
            }
        }

        Ok(())
    }
}

/// GEO Scout card for a free-tier result.
pub(crate) struct Card<'a> {
    pub brand: &'a str,
    pub result: &'a GeoLiteResult,
}

impl fmt::Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        let source = if result.cached {
            "from cache"
        } else {
            "fresh analysis"
        };
        let parts = [
            ("AI answers", result.breakdown.ai, Breakdown::AI_MAX),
            ("Community", result.breakdown.community, Breakdown::COMMUNITY_MAX),
            (
                "Structured data",
                result.breakdown.structured,
                Breakdown::STRUCTURED_MAX,
            ),
        ];

        writeln!(f, "GEO Scout: {}", self.brand)?;
        writeln!(
            f,
            "Score: {}/{} ({source})",
            result.score,
            geoscout_core::geo_lite::MAX_SCORE
        )?;
        for (label, value, max) in parts {
            writeln!(
                f,
                "  {label:<16} {} {value}/{max}",
                bar(f64::from(value), f64::from(max), 10)
            )?;
        }
        writeln!(f, "Insight: {}", result.insight)?;
        writeln!(f, "Confidence: {}", result.confidence)?;
        writeln!(f, "Data as of {}", result.data_age)
    }
}

#[cfg(test)]
mod tests {
    use geoscout_core::{Confidence, ProviderScore};

    use super::*;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            brand_name: "Nike".to_string(),
            domain: Some("nike.com".to_string()),
            score: 81.6,
            confidence: Some("High".to_string()),
            providers: vec![
                ProviderScore {
                    name: "ChatGPT".to_string(),
                    score: 90.0,
                    error: None,
                },
                ProviderScore {
                    name: "Google AI".to_string(),
                    score: 0.0,
                    error: Some("timeout".to_string()),
                },
            ],
            analysis: Some("Strong presence across assistants.".to_string()),
            recommendations: vec![
                "Publish an FAQ page".to_string(),
                "Add schema.org markup".to_string(),
            ],
        }
    }

    #[test]
    fn bar_fills_proportionally_and_clamps() {
        assert_eq!(bar(50.0, 100.0, 4), "[\u{2588}\u{2588}\u{2591}\u{2591}]");
        assert_eq!(bar(150.0, 100.0, 2), "[\u{2588}\u{2588}]");
        assert_eq!(bar(-5.0, 100.0, 2), "[\u{2591}\u{2591}]");
        assert_eq!(bar(3.0, 0.0, 2), "[\u{2591}\u{2591}]");
    }

    #[test]
    fn report_shows_rounded_score_level_and_insights() {
        let report = Report(&sample_result()).to_string();

        assert!(report.starts_with("Nike (nike.com)\n"));
        assert!(report.contains("AI visibility: 82/100  Excellent"));
        assert!(report.contains("Confidence: High"));
        assert!(report.contains("Market position:   Above average"));
        assert!(report.contains("Growth potential:  +18%"));
        assert!(report.contains("AI reach:          High"));
        assert!(report.contains("Strong presence across assistants."));
        assert!(report.contains("  2. Add schema.org markup"));
    }

    #[test]
    fn report_marks_failed_providers() {
        let report = Report(&sample_result()).to_string();
        assert!(report.contains("Google AI  unavailable (timeout)"));
        assert!(report.contains("ChatGPT    ["));
    }

    #[test]
    fn report_omits_empty_sections() {
        let result = AnalysisResult {
            brand_name: "acme".to_string(),
            domain: None,
            score: 12.0,
            confidence: None,
            providers: vec![],
            analysis: None,
            recommendations: vec![],
        };
        let report = Report(&result).to_string();

        assert!(report.starts_with("acme\n"));
        assert!(report.contains("12/100  Low"));
        assert!(!report.contains("Providers"));
        assert!(!report.contains("Recommendations"));
        assert!(!report.contains("Confidence"));
    }

    #[test]
    fn card_shows_score_out_of_twenty_and_source() {
        let result = GeoLiteResult {
            score: 18,
            breakdown: Breakdown {
                ai: 9,
                community: 5,
                structured: 4,
            },
            insight: "Leader in AI answers and communities".to_string(),
            confidence: Confidence::High,
            cached: true,
            data_age: "2026-10-19".to_string(),
        };
        let card = Card {
            brand: "Nike",
            result: &result,
        }
        .to_string();

        assert!(card.contains("GEO Scout: Nike"));
        assert!(card.contains("Score: 18/20 (from cache)"));
        assert!(card.contains(" 9/10"));
        assert!(card.contains(" 5/5"));
        assert!(card.contains(" 4/5"));
        assert!(card.contains("Confidence: High"));
        assert!(card.contains("Data as of 2026-10-19"));

        let fresh = Card {
            brand: "Nike",
            result: &GeoLiteResult {
                cached: false,
                ..result
            },
        }
        .to_string();
        assert!(fresh.contains("(fresh analysis)"));
    }

    /// Accepts `budget` bytes, then refuses every write.
    struct ShortWriter {
        budget: usize,
    }

    impl fmt::Write for ShortWriter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if s.len() > self.budget {
                return Err(fmt::Error);
            }
            self.budget -= s.len();
            Ok(())
        }
    }

    #[test]
    fn report_propagates_writer_errors() {
        use std::fmt::Write as _;

        let mut out = ShortWriter { budget: 40 };
        assert!(write!(out, "{}", Report(&sample_result())).is_err());

        let mut roomy = ShortWriter { budget: 4096 };
        assert!(write!(roomy, "{}", Report(&sample_result())).is_ok());
    }

    #[test]
    fn card_propagates_writer_errors() {
        use std::fmt::Write as _;

        let result = GeoLiteResult {
            score: 10,
            breakdown: Breakdown {
                ai: 5,
                community: 3,
                structured: 2,
            },
            insight: "Analysis in progress".to_string(),
            confidence: Confidence::Low,
            cached: false,
            data_age: "2026-10-19".to_string(),
        };
        let mut out = ShortWriter { budget: 20 };
        let card = Card {
            brand: "acme",
            result: &result,
        };
        assert!(write!(out, "{card}").is_err());
    }
}
