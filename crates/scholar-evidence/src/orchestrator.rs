//! Lookup pipeline: search, batch hydrate, recommendations, then ranking.
//!
//! Calls run one after another. Every call already waits on the shared
//! limiter, so running them in parallel would only queue them there.

use crate::client::SemanticScholarClient;
use crate::config::{Config, fields};
use crate::error::{ClientError, LookupError, LookupResult};
use crate::evidence::EvidenceBuilder;
use crate::models::{EvidencePack, LookupOptions, Paper, RateLimitStatus};

/// Merged, not yet deduplicated candidates from one lookup.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    /// Search (or hydrated) papers followed by recommendations.
    pub papers: Vec<Paper>,

    /// Whether the batch call replaced the raw search results.
    pub hydrated: bool,

    /// Papers contributed by recommendation calls.
    pub recommended: usize,

    /// Steps that failed and reduced coverage.
    pub coverage_notes: Vec<String>,
}

/// Sequences the remote calls of a lookup and hands the result to the [`EvidenceBuilder`].
#[derive(Debug, Clone)]
pub struct SearchOrchestrator {
    client: SemanticScholarClient,
}

impl SearchOrchestrator {
    /// Create an orchestrator around a client.
    #[must_use]
    pub const fn new(client: SemanticScholarClient) -> Self {
        Self { client }
    }

    /// Build the client from `config` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Config`] if the client rejects the configuration.
    pub fn from_config(config: Config) -> LookupResult<Self> {
        Ok(Self::new(SemanticScholarClient::new(config)?))
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &SemanticScholarClient {
        &self.client
    }

    /// Run the full lookup and build the evidence pack.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::SearchFailed`] if the search call fails. Hydrate
    /// and recommendation failures only reduce coverage.
    pub async fn lookup(&self, query: &str, options: &LookupOptions) -> LookupResult<EvidencePack> {
        let options = options.clone().normalized();

        let candidates = self.collect(query, &options).await.map_err(LookupError::SearchFailed)?;

        let status = RateLimitStatus::from_stats(self.client.target_rps(), self.client.stats());
        let pack = EvidenceBuilder::new(options.scoring_year())
            .top_n(options.top_n)
            .strict_traceability(options.strict_traceability)
            .build(query, candidates.papers, status, &candidates.coverage_notes);

        tracing::info!(
            query,
            selected = pack.query_summary.selected_papers,
            traceable = pack.traceability_report.traceable_selected,
            requests = pack.rate_limit_status.total_requests,
            "Lookup complete"
        );

        Ok(pack)
    }

    /// Gather candidates from search, batch hydrate, and recommendations.
    ///
    /// # Errors
    ///
    /// Returns the search call's error. Later steps never fail the lookup.
    pub async fn collect(&self, query: &str, options: &LookupOptions) -> Result<CandidateSet, ClientError> {
        let candidates = self
            .client
            .search_papers(query, options.search_limit, options.year_range(), fields::DEFAULT)
            .await?;

        tracing::debug!(query, found = candidates.len(), "Search returned candidates");

        let mut set = CandidateSet::default();

        let top_ids: Vec<String> = candidates
            .iter()
            .take(options.search_limit)
            .filter_map(|p| p.id().map(str::to_string))
            .collect();

        let hydrated = if top_ids.is_empty() {
            Vec::new()
        } else {
            match self.client.batch_papers(&top_ids, fields::DEFAULT).await {
                Ok(papers) => papers,
                Err(err) => {
                    tracing::warn!(error = %err, "Batch hydrate failed, using search results");
                    set.coverage_notes.push(format!(
                        "Batch metadata hydration failed ({}); search metadata was used instead.",
                        err.kind()
                    ));
                    Vec::new()
                }
            }
        };

        set.hydrated = !hydrated.is_empty();
        set.papers = if set.hydrated { hydrated } else { candidates };

        if options.include_recommendations {
            self.expand(&mut set, options).await;
        }

        Ok(set)
    }

    /// Append recommendations for the first `seed_count` identified papers.
    async fn expand(&self, set: &mut CandidateSet, options: &LookupOptions) {
        let seeds: Vec<String> = set
            .papers
            .iter()
            .take(options.seed_count)
            .filter_map(|p| p.id().map(str::to_string))
            .collect();

        let mut failed = Vec::new();
        for seed in seeds {
            match self
                .client
                .recommendations_for_paper(&seed, options.recommendation_limit, fields::DEFAULT)
                .await
            {
                Ok(papers) => {
                    tracing::debug!(seed = %seed, found = papers.len(), "Recommendations fetched");
                    set.recommended += papers.len();
                    set.papers.extend(papers);
                }
                Err(err) => {
                    tracing::warn!(seed = %seed, error = %err, "Recommendations failed, skipping seed");
                    failed.push(err.kind());
                }
            }
        }

        if !failed.is_empty() {
            set.coverage_notes.push(format!(
                "{} recommendation requests failed ({}); related-paper coverage is reduced.",
                failed.len(),
                failed.join(", ")
            ));
        }
    }
}
