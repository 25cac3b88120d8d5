//! Data models for Semantic Scholar entities and the evidence pack.
//!
//! API-facing models use `#[serde(default)]` for optional fields and
//! `#[serde(rename_all = "camelCase")]` to match API naming.

mod evidence;
mod inputs;
mod paper;

pub use evidence::{
    Citation, EvidencePack, EvidencePoint, QuerySummary, RateLimitStatus, RelevanceSource,
    RequestStats, ScoredPaper, Scores, TraceabilityReport,
};
pub use inputs::{LookupOptions, YearRange};
pub use paper::{AuthorRef, ExternalIds, Paper, PaperList, SearchResult, Tldr};
