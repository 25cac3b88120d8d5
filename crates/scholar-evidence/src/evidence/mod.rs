//! Evidence pack construction: dedup, rank, traceability filter, assembly.
//!
//! Everything here is synchronous and pure; the only input from the network
//! side is the request telemetry snapshot.

pub mod scoring;

use std::collections::HashSet;

use crate::models::{
    Citation, EvidencePack, EvidencePoint, Paper, QuerySummary, RateLimitStatus, RelevanceSource,
    ScoredPaper, TraceabilityReport,
};

/// Claims cut from abstracts are capped at this many characters.
pub const CLAIM_EXCERPT_LEN: usize = 240;

/// Turns a merged candidate set into an [`EvidencePack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceBuilder {
    current_year: i32,
    top_n: usize,
    strict_traceability: bool,
}

impl EvidenceBuilder {
    /// Builder scoring recency against `current_year`, keeping 12 papers,
    /// with strict traceability on.
    #[must_use]
    pub const fn new(current_year: i32) -> Self {
        Self { current_year, top_n: 12, strict_traceability: true }
    }

    /// Keep at most `top_n` papers (at least one).
    #[must_use]
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    /// Drop non-traceable papers before truncation.
    #[must_use]
    pub const fn strict_traceability(mut self, strict: bool) -> Self {
        self.strict_traceability = strict;
        self
    }

    /// Keep the first paper per dedup key, in arrival order.
    ///
    /// Key priority: paper ID, then DOI, then normalized title. Papers with
    /// none of the three are dropped.
    #[must_use]
    pub fn dedupe(&self, papers: Vec<Paper>) -> Vec<Paper> {
        let mut seen = HashSet::new();
        papers
            .into_iter()
            .filter(|paper| match dedup_key(paper) {
                Some(key) => seen.insert(key),
                None => false,
            })
            .collect()
    }

    /// Score every paper and sort by final score, highest first.
    ///
    /// The sort is stable: equal scores keep arrival order.
    #[must_use]
    pub fn rank(&self, papers: Vec<Paper>) -> Vec<ScoredPaper> {
        let total = papers.len();
        let mut ranked: Vec<ScoredPaper> = papers
            .into_iter()
            .enumerate()
            .map(|(position, paper)| {
                let scores = scoring::score(&paper, position, total, self.current_year);
                if scores.relevance_source == RelevanceSource::RankFallback {
                    tracing::debug!(paper_id = ?paper.id(), position, "No upstream score, using rank fallback");
                }
                ScoredPaper { paper, scores }
            })
            .collect();

        ranked.sort_by(|a, b| b.scores.final_score.total_cmp(&a.scores.final_score));
        ranked
    }

    /// Keep only papers with an ID, DOI, or URL.
    #[must_use]
    pub fn filter_traceable(&self, ranked: Vec<ScoredPaper>) -> Vec<ScoredPaper> {
        ranked.into_iter().filter(|scored| scored.paper.is_traceable()).collect()
    }

    /// Run dedup, rank, the optional strict filter, and assembly.
    ///
    /// `coverage_notes` describe upstream steps that degraded; they are
    /// appended to the pack's limitations.
    #[must_use]
    pub fn build(
        &self,
        query: &str,
        candidates: Vec<Paper>,
        rate_limit_status: RateLimitStatus,
        coverage_notes: &[String],
    ) -> EvidencePack {
        let candidate_count = candidates.len();
        let unique = self.dedupe(candidates);
        let unique_count = unique.len();

        let mut ranked = self.rank(unique);
        if self.strict_traceability {
            ranked = self.filter_traceable(ranked);
        }

        tracing::debug!(
            candidates = candidate_count,
            unique = unique_count,
            ranked = ranked.len(),
            top_n = self.top_n,
            "Ranked candidate set"
        );

        self.assemble(query, ranked, rate_limit_status, coverage_notes)
    }

    /// Truncate a ranked list to top-N and emit citations, evidence points,
    /// and reports.
    #[must_use]
    pub fn assemble(
        &self,
        query: &str,
        mut ranked: Vec<ScoredPaper>,
        rate_limit_status: RateLimitStatus,
        coverage_notes: &[String],
    ) -> EvidencePack {
        ranked.truncate(self.top_n);
        let chosen = ranked;

        let citations: Vec<Citation> = chosen.iter().map(citation).collect();
        let evidence_points: Vec<EvidencePoint> = chosen.iter().map(evidence_point).collect();

        let traceable = citations.iter().filter(|c| c.traceable).count();
        let traceability_report = TraceabilityReport::new(chosen.len(), traceable);

        let mut limitations = metadata_limitations(&chosen);
        limitations.extend(coverage_notes.iter().cloned());

        let notes = if self.strict_traceability {
            "Strict traceability enabled: papers without a stable ID, DOI, or URL were excluded."
        } else {
            "Strict traceability disabled: papers without a stable ID, DOI, or URL are marked untraceable."
        };

        EvidencePack {
            query_summary: QuerySummary {
                query: query.to_string(),
                selected_papers: chosen.len(),
                notes: notes.to_string(),
            },
            candidate_papers: chosen,
            evidence_points,
            citations,
            limitations,
            traceability_report,
            rate_limit_status,
        }
    }
}

/// Dedup key for a paper: ID, then DOI, then normalized title.
#[must_use]
pub fn dedup_key(paper: &Paper) -> Option<String> {
    if let Some(id) = paper.id() {
        return Some(id.to_string());
    }
    if let Some(doi) = paper.doi() {
        return Some(doi.to_string());
    }
    let title = normalize_title(paper.title.as_deref().unwrap_or_default());
    (!title.is_empty()).then_some(title)
}

/// Lowercase and collapse whitespace.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    collapse_whitespace(&title.to_lowercase())
}

/// Claim text: the TLDR when present, else an abstract excerpt.
#[must_use]
pub fn claim_text(paper: &Paper) -> String {
    paper
        .tldr_text()
        .map(str::to_string)
        .unwrap_or_else(|| excerpt(paper.abstract_text().unwrap_or_default(), CLAIM_EXCERPT_LEN))
}

/// Whitespace-normalized prefix of `text`, at most `max_len` characters
/// including the trailing `...` marker.
#[must_use]
pub fn excerpt(text: &str, max_len: usize) -> String {
    let text = collapse_whitespace(text);
    if text.chars().count() <= max_len {
        return text;
    }

    let mut cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn citation(scored: &ScoredPaper) -> Citation {
    let paper = &scored.paper;
    Citation {
        paper_id: paper.paper_id.clone(),
        title: paper.title.clone(),
        authors: paper.author_names(),
        year: paper.year,
        venue: paper.venue.clone(),
        citation_count: paper.citation_count,
        external_ids: paper.external_ids.clone().unwrap_or_default(),
        doi: paper.doi().map(str::to_string),
        url: paper.citation_url(),
        scores: scored.scores,
        traceable: paper.is_traceable(),
    }
}

fn evidence_point(scored: &ScoredPaper) -> EvidencePoint {
    let paper = &scored.paper;
    let why_selected = if scored.scores.recency >= 0.8 {
        "high relevance + recency"
    } else {
        "high relevance + impact"
    };

    EvidencePoint {
        paper_id: paper.paper_id.clone(),
        title: paper.title.clone(),
        claim: claim_text(paper),
        why_selected: why_selected.to_string(),
        traceable: paper.is_traceable(),
    }
}

fn metadata_limitations(chosen: &[ScoredPaper]) -> Vec<String> {
    let missing_abstract = chosen.iter().filter(|s| s.paper.abstract_text().is_none()).count();
    let missing_doi = chosen.iter().filter(|s| s.paper.doi().is_none()).count();

    let mut limitations = Vec::new();
    if missing_abstract > 0 {
        limitations.push(format!(
            "{missing_abstract} selected papers lack abstracts; claim extraction may be weaker."
        ));
    }
    if missing_doi > 0 {
        limitations.push(format!(
            "{missing_doi} selected papers lack DOI; fallback identifiers were used."
        ));
    }
    if limitations.is_empty() {
        limitations.push("No major metadata gaps detected in selected papers.".to_string());
    }
    limitations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExternalIds, RequestStats, Tldr};

    fn paper(id: Option<&str>, doi: Option<&str>, title: &str) -> Paper {
        Paper {
            paper_id: id.map(str::to_string),
            title: Some(title.to_string()),
            external_ids: doi.map(|d| ExternalIds { doi: Some(d.to_string()), ..Default::default() }),
            ..Default::default()
        }
    }

    fn status() -> RateLimitStatus {
        RateLimitStatus::from_stats(0.8, RequestStats::default())
    }

    #[test]
    fn test_dedup_key_priority() {
        assert_eq!(dedup_key(&paper(Some("id1"), Some("10.1/x"), "T")).as_deref(), Some("id1"));
        assert_eq!(dedup_key(&paper(None, Some("10.1/x"), "T")).as_deref(), Some("10.1/x"));
        assert_eq!(dedup_key(&paper(None, None, "  Graph   Nets ")).as_deref(), Some("graph nets"));
        assert_eq!(dedup_key(&paper(None, None, "   ")), None);
    }

    #[test]
    fn test_dedupe_keeps_first_by_doi() {
        let builder = EvidenceBuilder::new(2026);
        let papers = vec![
            paper(None, Some("10.1/shared"), "First"),
            paper(None, Some("10.1/shared"), "Second"),
            paper(None, None, "Third"),
        ];
        let unique = builder.dedupe(papers);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title.as_deref(), Some("First"));
    }

    #[test]
    fn test_dedupe_matches_titles_loosely() {
        let builder = EvidenceBuilder::new(2026);
        let unique = builder.dedupe(vec![
            paper(None, None, "Attention Is All You Need"),
            paper(None, None, "attention  is all\tyou need"),
        ]);
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn test_dedupe_drops_keyless() {
        let builder = EvidenceBuilder::new(2026);
        let unique = builder.dedupe(vec![Paper::default()]);
        assert!(unique.is_empty());
    }

    #[test]
    fn test_rank_stable_on_ties() {
        let builder = EvidenceBuilder::new(2026);
        let mut a = paper(Some("a"), None, "A");
        let mut b = paper(Some("b"), None, "B");
        a.score = Some(0.9);
        b.score = Some(0.9);
        let ranked = builder.rank(vec![a, b]);
        assert_eq!(ranked[0].paper.id(), Some("a"));
        assert_eq!(ranked[1].paper.id(), Some("b"));
    }

    #[test]
    fn test_rank_orders_by_final_score() {
        let builder = EvidenceBuilder::new(2026);
        let mut weak = paper(Some("weak"), None, "Weak");
        weak.score = Some(0.1);
        let mut strong = paper(Some("strong"), None, "Strong");
        strong.score = Some(0.9);
        let ranked = builder.rank(vec![weak, strong]);
        assert_eq!(ranked[0].paper.id(), Some("strong"));
    }

    #[test]
    fn test_strict_filter_runs_before_truncation() {
        let builder = EvidenceBuilder::new(2026).top_n(1);
        // The untraceable paper arrives first and would win on rank fallback
        let candidates = vec![paper(None, None, "No identifiers"), paper(Some("p2"), None, "Has id")];
        let pack = builder.build("q", candidates, status(), &[]);
        assert_eq!(pack.citations.len(), 1);
        assert_eq!(pack.citations[0].paper_id.as_deref(), Some("p2"));
        assert!(pack.traceability_report.strict_traceability_pass);
    }

    #[test]
    fn test_non_strict_marks_untraceable() {
        let builder = EvidenceBuilder::new(2026).strict_traceability(false);
        let pack = builder.build("q", vec![paper(None, None, "Orphan")], status(), &[]);
        assert_eq!(pack.traceability_report.total_selected, 1);
        assert_eq!(pack.traceability_report.traceable_selected, 0);
        assert!(!pack.traceability_report.strict_traceability_pass);
        assert!(!pack.evidence_points[0].traceable);
    }

    #[test]
    fn test_claim_prefers_tldr() {
        let mut p = paper(Some("p"), None, "T");
        p.r#abstract = Some("Long abstract".to_string());
        p.tldr = Some(Tldr { model: None, text: Some("Short claim.".to_string()) });
        assert_eq!(claim_text(&p), "Short claim.");

        p.tldr = None;
        assert_eq!(claim_text(&p), "Long abstract");
    }

    #[test]
    fn test_excerpt_truncates_with_marker() {
        let text = "word ".repeat(100);
        let cut = excerpt(&text, CLAIM_EXCERPT_LEN);
        assert_eq!(cut.chars().count(), CLAIM_EXCERPT_LEN);
        assert!(cut.ends_with("..."));

        assert_eq!(excerpt("  a \n b  ", 240), "a b");
    }

    #[test]
    fn test_why_selected_follows_recency() {
        let builder = EvidenceBuilder::new(2026).strict_traceability(false);
        let mut recent = paper(Some("r"), None, "Recent");
        recent.year = Some(2025);
        let mut old = paper(Some("o"), None, "Old");
        old.year = Some(1999);
        let pack = builder.build("q", vec![recent, old], status(), &[]);
        assert_eq!(pack.evidence_points[0].why_selected, "high relevance + recency");
        assert_eq!(pack.evidence_points[1].why_selected, "high relevance + impact");
    }

    #[test]
    fn test_limitations() {
        let builder = EvidenceBuilder::new(2026);
        let mut complete = paper(Some("c"), Some("10.1/c"), "Complete");
        complete.r#abstract = Some("Abstract".to_string());

        let pack = builder.build("q", vec![complete.clone()], status(), &[]);
        assert_eq!(pack.limitations, vec!["No major metadata gaps detected in selected papers."]);

        let pack = builder.build(
            "q",
            vec![complete, paper(Some("bare"), None, "Bare")],
            status(),
            &["Batch hydration failed".to_string()],
        );
        assert_eq!(pack.limitations.len(), 3);
        assert!(pack.limitations[0].starts_with("1 selected papers lack abstracts"));
        assert!(pack.limitations[1].starts_with("1 selected papers lack DOI"));
        assert_eq!(pack.limitations[2], "Batch hydration failed");
    }

    #[test]
    fn test_pack_serializes_contract_fields() {
        let builder = EvidenceBuilder::new(2026);
        let pack = builder.build("q", vec![paper(Some("p"), Some("10.1/p"), "P")], status(), &[]);
        let json = serde_json::to_value(&pack).unwrap();
        for field in [
            "query_summary",
            "candidate_papers",
            "evidence_points",
            "citations",
            "limitations",
            "traceability_report",
            "rate_limit_status",
        ] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
        assert_eq!(json["citations"][0]["doi"], "10.1/p");
        assert_eq!(json["citations"][0]["url"], "https://www.semanticscholar.org/paper/p");
        assert_eq!(json["evidence_points"][0]["paperId"], "p");
    }
}
