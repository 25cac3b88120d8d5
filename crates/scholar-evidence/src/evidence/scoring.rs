//! Sub-score functions used by the ranker.

use crate::models::{Paper, RelevanceSource, Scores};

/// Venue names that score as flagship.
pub const TIER1_VENUE_TOKENS: &[&str] = &[
    "nature",
    "science",
    "cell",
    "nejm",
    "new england journal of medicine",
    "lancet",
    "jama",
    "nature medicine",
    "nature biotechnology",
];

pub const RELEVANCE_WEIGHT: f64 = 0.55;
pub const RECENCY_WEIGHT: f64 = 0.20;
pub const IMPACT_WEIGHT: f64 = 0.15;
pub const VENUE_WEIGHT: f64 = 0.10;

/// Score the paper at `position` of `total` arrivals.
#[must_use]
pub fn score(paper: &Paper, position: usize, total: usize, current_year: i32) -> Scores {
    let (relevance, relevance_source) = relevance(paper.score, position, total);
    let recency = recency(paper.year, current_year);
    let citation_impact = citation_impact(paper.citation_count);
    let venue_quality = venue_quality(paper.venue());

    Scores {
        relevance,
        recency,
        citation_impact,
        venue_quality,
        final_score: RELEVANCE_WEIGHT * relevance
            + RECENCY_WEIGHT * recency
            + IMPACT_WEIGHT * citation_impact
            + VENUE_WEIGHT * venue_quality,
        relevance_source,
    }
}

/// Upstream score clamped to `[0, 1]`, or `1 - position/total` when absent.
#[must_use]
pub fn relevance(upstream: Option<f64>, position: usize, total: usize) -> (f64, RelevanceSource) {
    match upstream {
        Some(value) if value.is_finite() => (value.clamp(0.0, 1.0), RelevanceSource::Upstream),
        _ if total <= 1 => (1.0, RelevanceSource::RankFallback),
        _ => (1.0 - position as f64 / total as f64, RelevanceSource::RankFallback),
    }
}

/// Step function over publication age. Unknown year scores zero.
#[must_use]
pub fn recency(year: Option<i32>, current_year: i32) -> f64 {
    let Some(year) = year.filter(|y| *y != 0) else {
        return 0.0;
    };

    match current_year.saturating_sub(year).max(0) {
        0..=2 => 1.0,
        3..=5 => 0.8,
        6..=10 => 0.5,
        _ => 0.2,
    }
}

/// `log10(citations + 1) / 4`, saturating at 10k citations.
#[must_use]
pub fn citation_impact(citations: Option<i32>) -> f64 {
    match citations {
        Some(count) if count > 0 => ((f64::from(count) + 1.0).log10() / 4.0).min(1.0),
        _ => 0.0,
    }
}

/// 1.0 for a flagship venue, 0.5 for any other venue, 0.2 when unknown.
#[must_use]
pub fn venue_quality(venue: Option<&str>) -> f64 {
    let Some(venue) = venue else {
        return 0.2;
    };

    let venue = venue.to_lowercase();
    if TIER1_VENUE_TOKENS.iter().any(|token| venue.contains(token)) { 1.0 } else { 0.5 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relevance_prefers_upstream() {
        assert_eq!(relevance(Some(0.42), 3, 10), (0.42, RelevanceSource::Upstream));
        assert_eq!(relevance(Some(1.7), 0, 10), (1.0, RelevanceSource::Upstream));
        assert_eq!(relevance(Some(-0.3), 0, 10), (0.0, RelevanceSource::Upstream));
    }

    #[test]
    fn test_relevance_rank_fallback() {
        assert_eq!(relevance(None, 0, 4), (1.0, RelevanceSource::RankFallback));
        assert_eq!(relevance(None, 1, 4), (0.75, RelevanceSource::RankFallback));
        assert_eq!(relevance(None, 0, 1), (1.0, RelevanceSource::RankFallback));
        assert_eq!(relevance(Some(f64::NAN), 2, 4), (0.5, RelevanceSource::RankFallback));
    }

    #[test]
    fn test_fallback_distinguishable_from_equal_upstream_value() {
        let (upstream_value, upstream_source) = relevance(Some(1.0), 0, 1);
        let (fallback_value, fallback_source) = relevance(None, 0, 1);
        assert!((upstream_value - fallback_value).abs() < f64::EPSILON);
        assert_ne!(upstream_source, fallback_source);
    }

    #[test]
    fn test_recency_steps() {
        assert!((recency(Some(2026), 2026) - 1.0).abs() < f64::EPSILON);
        assert!((recency(Some(2024), 2026) - 1.0).abs() < f64::EPSILON);
        assert!((recency(Some(2023), 2026) - 0.8).abs() < f64::EPSILON);
        assert!((recency(Some(2021), 2026) - 0.8).abs() < f64::EPSILON);
        assert!((recency(Some(2016), 2026) - 0.5).abs() < f64::EPSILON);
        assert!((recency(Some(2015), 2026) - 0.2).abs() < f64::EPSILON);
        // Future years count as brand new
        assert!((recency(Some(2030), 2026) - 1.0).abs() < f64::EPSILON);
        assert!(recency(None, 2026).abs() < f64::EPSILON);
        assert!(recency(Some(0), 2026).abs() < f64::EPSILON);
    }

    #[test]
    fn test_citation_impact() {
        assert!(citation_impact(None).abs() < f64::EPSILON);
        assert!(citation_impact(Some(0)).abs() < f64::EPSILON);
        assert!(citation_impact(Some(-5)).abs() < f64::EPSILON);
        assert!((citation_impact(Some(9)) - 0.25).abs() < 1e-9);
        assert!((citation_impact(Some(999)) - 0.75).abs() < 1e-9);
        assert!((citation_impact(Some(1_000_000)) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_venue_quality() {
        assert!((venue_quality(Some("Nature Communications")) - 1.0).abs() < f64::EPSILON);
        assert!((venue_quality(Some("The Lancet")) - 1.0).abs() < f64::EPSILON);
        assert!((venue_quality(Some("NeurIPS")) - 0.5).abs() < f64::EPSILON);
        assert!((venue_quality(None) - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weighted_final_score() {
        let paper = Paper {
            year: Some(2025),
            citation_count: Some(9),
            venue: Some("Cell".to_string()),
            score: Some(0.5),
            ..Default::default()
        };
        let scores = score(&paper, 0, 3, 2026);
        let expected = 0.55 * 0.5 + 0.20 * 1.0 + 0.15 * 0.25 + 0.10 * 1.0;
        assert!((scores.final_score - expected).abs() < 1e-9);
    }
}
