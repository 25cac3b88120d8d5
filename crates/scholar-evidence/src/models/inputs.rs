//! Lookup parameters.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Options for one evidence lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupOptions {
    /// Papers kept in the final pack.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Search recall size (1-100).
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Minimum publication year (inclusive).
    #[serde(default)]
    pub year_from: Option<i32>,

    /// Maximum publication year (inclusive).
    #[serde(default)]
    pub year_to: Option<i32>,

    /// Expand the candidate set with recommendations for the top papers.
    #[serde(default = "default_true")]
    pub include_recommendations: bool,

    /// Papers used as recommendation seeds.
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,

    /// Recommendations requested per seed.
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Drop papers without an ID, DOI, or URL before truncating.
    #[serde(default = "default_true")]
    pub strict_traceability: bool,

    /// Year used for recency scoring. Defaults to the current UTC year.
    #[serde(default)]
    pub current_year: Option<i32>,
}

fn default_top_n() -> usize {
    12
}

fn default_search_limit() -> usize {
    100
}

fn default_seed_count() -> usize {
    2
}

fn default_recommendation_limit() -> usize {
    8
}

fn default_true() -> bool {
    true
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            search_limit: default_search_limit(),
            year_from: None,
            year_to: None,
            include_recommendations: true,
            seed_count: default_seed_count(),
            recommendation_limit: default_recommendation_limit(),
            strict_traceability: true,
            current_year: None,
        }
    }
}

impl LookupOptions {
    /// Clamp every bound into the range the API and the pack accept.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.top_n = self.top_n.clamp(1, 50);
        self.search_limit = self.search_limit.clamp(1, 100);
        self.seed_count = self.seed_count.clamp(1, 5);
        self.recommendation_limit = self.recommendation_limit.clamp(1, 50);
        self
    }

    /// Year filter for the search call.
    #[must_use]
    pub const fn year_range(&self) -> YearRange {
        YearRange { from: self.year_from, to: self.year_to }
    }

    /// Year used for recency scoring.
    #[must_use]
    pub fn scoring_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Utc::now().year())
    }
}

/// Inclusive publication-year filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearRange {
    pub from: Option<i32>,
    pub to: Option<i32>,
}

impl YearRange {
    /// Encode as the API's `year` parameter: `2019-2024`, `2019-`, or `-2024`.
    #[must_use]
    pub fn to_param(self) -> Option<String> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some(format!("{from}-{to}")),
            (Some(from), None) => Some(format!("{from}-")),
            (None, Some(to)) => Some(format!("-{to}")),
            (None, None) => None,
        }
    }
}
