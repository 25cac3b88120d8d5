//! Scores, request telemetry, and the evidence pack handed to renderers.

use serde::{Serialize, Serializer};

use super::{ExternalIds, Paper};

/// Where the relevance sub-score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceSource {
    /// Score sent by the search endpoint, clamped to `[0, 1]`.
    Upstream,
    /// Derived from the candidate's arrival position.
    RankFallback,
}

/// Sub-scores and the weighted final score for one paper.
///
/// Serialized values are rounded to 4 decimals; comparisons use full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    #[serde(serialize_with = "round4")]
    pub relevance: f64,
    #[serde(serialize_with = "round4")]
    pub recency: f64,
    #[serde(serialize_with = "round4")]
    pub citation_impact: f64,
    #[serde(serialize_with = "round4")]
    pub venue_quality: f64,
    #[serde(serialize_with = "round4")]
    pub final_score: f64,
    pub relevance_source: RelevanceSource,
}

/// A paper with its ranking scores attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPaper {
    #[serde(flatten)]
    pub paper: Paper,
    pub scores: Scores,
}

/// Process-lifetime request counters kept by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RequestStats {
    /// Attempts sent, retries included.
    pub total_requests: u64,
    /// 429 responses seen.
    pub retry_429_count: u64,
    /// 5xx responses seen.
    pub retry_5xx_count: u64,
    /// Time spent in the limiter and in backoff.
    pub slept_seconds: f64,
}

/// Final output of a lookup.
#[derive(Debug, Clone, Serialize)]
pub struct EvidencePack {
    pub query_summary: QuerySummary,
    pub candidate_papers: Vec<ScoredPaper>,
    pub evidence_points: Vec<EvidencePoint>,
    pub citations: Vec<Citation>,
    pub limitations: Vec<String>,
    pub traceability_report: TraceabilityReport,
    pub rate_limit_status: RateLimitStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuerySummary {
    pub query: String,
    pub selected_papers: usize,
    pub notes: String,
}

/// One citable record per selected paper.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub paper_id: Option<String>,
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    pub citation_count: Option<i32>,
    pub external_ids: ExternalIds,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub scores: Scores,
    pub traceable: bool,
}

/// The claim a selected paper supports and why it made the cut.
#[derive(Debug, Clone, Serialize)]
pub struct EvidencePoint {
    #[serde(rename = "paperId")]
    pub paper_id: Option<String>,
    pub title: Option<String>,
    pub claim: String,
    pub why_selected: String,
    pub traceable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceabilityReport {
    pub total_selected: usize,
    pub traceable_selected: usize,
    pub strict_traceability_pass: bool,
}

impl TraceabilityReport {
    #[must_use]
    pub const fn new(total_selected: usize, traceable_selected: usize) -> Self {
        Self {
            total_selected,
            traceable_selected,
            strict_traceability_pass: traceable_selected == total_selected,
        }
    }
}

/// Request telemetry snapshot attached to the pack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateLimitStatus {
    pub target_rps: f64,
    pub total_requests: u64,
    pub retry_429_count: u64,
    pub retry_5xx_count: u64,
    #[serde(serialize_with = "round3")]
    pub slept_seconds: f64,
}

impl RateLimitStatus {
    #[must_use]
    pub const fn from_stats(target_rps: f64, stats: RequestStats) -> Self {
        Self {
            target_rps,
            total_requests: stats.total_requests,
            retry_429_count: stats.retry_429_count,
            retry_5xx_count: stats.retry_5xx_count,
            slept_seconds: stats.slept_seconds,
        }
    }
}

fn round4<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10_000.0).round() / 10_000.0)
}

fn round3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1_000.0).round() / 1_000.0)
}
