//! Markdown output formatting.

use crate::models::EvidencePack;

/// Format an evidence pack as a Markdown report.
#[must_use]
pub fn format_pack_markdown(pack: &EvidencePack) -> String {
    let mut output = String::new();

    output.push_str("## Query\n");
    output.push_str(&format!("{}\n\n", pack.query_summary.query));

    output.push_str("## Top Evidence\n");
    if pack.evidence_points.is_empty() {
        output.push_str("No papers selected.\n");
    }
    for (i, point) in pack.evidence_points.iter().enumerate() {
        output.push_str(&format!(
            "### {}) {}\n",
            i + 1,
            point.title.as_deref().unwrap_or("Untitled")
        ));
        output.push_str(&format!("- paperId: {}\n", point.paper_id.as_deref().unwrap_or("N/A")));
        output.push_str(&format!("- traceable: {}\n", point.traceable));
        output.push_str(&format!("- why_selected: {}\n", point.why_selected));
        output.push_str(&format!("- claim: {}\n", point.claim));
    }

    output.push_str("\n## Citations\n");
    for (i, citation) in pack.citations.iter().enumerate() {
        let year = citation.year.map_or_else(|| "n.d.".to_string(), |y| y.to_string());
        output.push_str(&format!(
            "{}. {} ({}). {}. {}. DOI: {} URL: {}\n",
            i + 1,
            citation.authors.join(", "),
            year,
            citation.title.as_deref().unwrap_or("Untitled"),
            citation.venue.as_deref().unwrap_or("Unknown venue"),
            citation.doi.as_deref().unwrap_or("N/A"),
            citation.url.as_deref().unwrap_or("N/A"),
        ));
    }

    output.push_str("\n## Limitations\n");
    for item in &pack.limitations {
        output.push_str(&format!("- {item}\n"));
    }

    let status = &pack.rate_limit_status;
    output.push_str("\n## Rate Limit Status\n");
    output.push_str(&format!("- target_rps: {}\n", status.target_rps));
    output.push_str(&format!("- total_requests: {}\n", status.total_requests));
    output.push_str(&format!("- retry_429_count: {}\n", status.retry_429_count));
    output.push_str(&format!("- retry_5xx_count: {}\n", status.retry_5xx_count));
    output.push_str(&format!("- slept_seconds: {:.3}\n", status.slept_seconds));

    output
}
