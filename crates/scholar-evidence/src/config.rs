//! Configuration for the Semantic Scholar evidence lookup.

use std::time::Duration;

use crate::client::RetryPolicy;
use crate::error::ConfigError;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Recommendations API endpoint.
    pub const RECOMMENDATIONS_API: &str = "https://api.semanticscholar.org/recommendations/v1";

    /// Public paper page, used when a paper carries no URL of its own.
    pub const PAPER_PAGE: &str = "https://www.semanticscholar.org/paper";

    /// Process-wide request ceiling. Kept below 1 req/s regardless of API key.
    pub const DEFAULT_RPS: f64 = 0.8;

    /// Per-attempt request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(35);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Retries after the first attempt.
    pub const MAX_RETRIES: u32 = 3;

    /// Backoff unit; attempt `n` waits `BACKOFF_BASE * 2^(n+1)`.
    pub const BACKOFF_BASE: Duration = Duration::from_secs(1);

    /// Upper bound on exponential backoff.
    pub const BACKOFF_CAP: Duration = Duration::from_secs(8);

    /// Response bodies kept in error payloads are cut to this many characters.
    pub const ERROR_BODY_LIMIT: usize = 500;

    /// User agent sent with every request.
    pub const USER_AGENT: &str = concat!("scholar-evidence/", env!("CARGO_PKG_VERSION"));
}

/// Paper field sets for API requests.
pub mod fields {
    /// Fields needed to score, trace, and cite a paper.
    pub const DEFAULT: &[&str] = &[
        "paperId",
        "title",
        "abstract",
        "authors",
        "year",
        "venue",
        "citationCount",
        "externalIds",
        "url",
        "tldr",
    ];
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Base URL for Recommendations API (for testing with mock servers).
    pub recommendations_api_url: String,

    /// Ceiling on requests per second across every call site.
    pub requests_per_second: f64,

    /// Per-attempt request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retry and backoff policy.
    pub retry: RetryPolicy,

    /// User agent header value.
    pub user_agent: String,
}

impl Config {
    /// Create a new configuration with optional API key.
    ///
    /// The request ceiling does not change with the key: the limiter stays
    /// below the anonymous upstream limit either way.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            graph_api_url: api::GRAPH_API.to_string(),
            recommendations_api_url: api::RECOMMENDATIONS_API.to_string(),
            requests_per_second: api::DEFAULT_RPS,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            retry: RetryPolicy::default(),
            user_agent: api::USER_AGENT.to_string(),
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            graph_api_url: format!("{}/graph/v1", base_url),
            recommendations_api_url: format!("{}/recommendations/v1", base_url),
            requests_per_second: 1000.0, // Effectively no pacing in tests
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            retry: RetryPolicy {
                max_retries: api::MAX_RETRIES,
                backoff_base: Duration::from_millis(1),
                backoff_cap: Duration::from_millis(8),
            },
            user_agent: api::USER_AGENT.to_string(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `SEMANTIC_SCHOLAR_API_KEY` and `SEMANTIC_SCHOLAR_RPS`. Empty
    /// values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns error if `SEMANTIC_SCHOLAR_RPS` is not a positive number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let mut config = Self::new(api_key);

        if let Ok(raw) = std::env::var("SEMANTIC_SCHOLAR_RPS") {
            if !raw.trim().is_empty() {
                config.requests_per_second = parse_rps(&raw)?;
            }
        }

        Ok(config)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Parse a requests-per-second value, rejecting anything but a positive finite number.
pub fn parse_rps(raw: &str) -> Result<f64, ConfigError> {
    let rps: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid("requests_per_second", format!("'{raw}' is not a number")))?;

    if rps.is_finite() && rps > 0.0 {
        Ok(rps)
    } else {
        Err(ConfigError::invalid("requests_per_second", format!("must be > 0, got {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert!((config.requests_per_second - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.request_timeout, Duration::from_secs(35));
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn test_config_with_api_key() {
        let config = Config::new(Some("test-key".to_string()));
        assert!(config.has_api_key());
        assert_eq!(config.api_key, Some("test-key".to_string()));
        // Key does not loosen the ceiling
        assert!((config.requests_per_second - api::DEFAULT_RPS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_for_testing_urls() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.graph_api_url, "http://127.0.0.1:9999/graph/v1");
        assert_eq!(config.recommendations_api_url, "http://127.0.0.1:9999/recommendations/v1");
    }

    #[test]
    fn test_parse_rps() {
        assert!((parse_rps("0.5").unwrap() - 0.5).abs() < f64::EPSILON);
        assert!((parse_rps(" 2 ").unwrap() - 2.0).abs() < f64::EPSILON);
        assert!(parse_rps("0").is_err());
        assert!(parse_rps("-1").is_err());
        assert!(parse_rps("NaN").is_err());
        assert!(parse_rps("fast").is_err());
    }

    #[test]
    fn test_fields() {
        assert!(fields::DEFAULT.contains(&"paperId"));
        assert!(fields::DEFAULT.contains(&"tldr"));
        assert!(fields::DEFAULT.contains(&"url"));
    }
}
