//! Scholar Evidence
//!
//! Looks up literature on the Semantic Scholar API under a strict,
//! process-wide request ceiling and reduces the results to a ranked,
//! deduplicated, traceability-checked evidence pack for citation use.
//!
//! # Features
//!
//! - **Global rate limiting**: every request, from every task, waits on one limiter (0.8 req/s by default)
//! - **Retry policy**: 429 and 5xx are retried with capped exponential backoff; `Retry-After` is honored
//! - **Evidence ranking**: relevance, recency, citation impact, and venue quality in one weighted score
//! - **Traceability**: papers without an ID, DOI, or URL can be excluded before truncation
//!
//! # Example
//!
//! ```no_run
//! use scholar_evidence::{Config, LookupOptions, SearchOrchestrator, SemanticScholarClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SemanticScholarClient::new(config)?;
//!     let orchestrator = SearchOrchestrator::new(client);
//!
//!     let pack = orchestrator.lookup("graph neural networks", &LookupOptions::default()).await?;
//!     println!("{}", scholar_evidence::formatters::format_pack_markdown(&pack));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod evidence;
pub mod formatters;
pub mod models;
pub mod orchestrator;

pub use client::{GlobalRateLimiter, SemanticScholarClient};
pub use config::Config;
pub use error::{ClientError, ConfigError, LookupError};
pub use evidence::EvidenceBuilder;
pub use models::{EvidencePack, LookupOptions};
pub use orchestrator::{CandidateSet, SearchOrchestrator};
