//! Semantic Scholar API client.
//!
//! Provides an async HTTP client with:
//! - One process-wide rate limiter shared by every clone
//! - Retry with capped exponential backoff on 429, 5xx, and transport failures
//! - `Retry-After` honoring on 429
//! - Request counters for telemetry

mod limiter;
mod retry;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

pub use limiter::GlobalRateLimiter;
pub use retry::{Disposition, RetryPolicy, retry_after, truncate_body};

use crate::config::Config;
use crate::error::{ClientError, ClientResult, ConfigError};
use crate::models::{Paper, PaperList, RequestStats, SearchResult, YearRange};

/// Semantic Scholar API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client. Idle connections are not kept.
    http: Client,

    /// Pacing shared by every clone.
    limiter: Arc<GlobalRateLimiter>,

    /// Request counters shared by every clone.
    stats: Arc<Mutex<RequestStats>>,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: String,

    /// Recommendations API base URL.
    recommendations_api_url: String,

    /// Backoff policy.
    retry: RetryPolicy,
}

impl SemanticScholarClient {
    /// Create a new client with its own limiter.
    ///
    /// # Errors
    ///
    /// Returns error if the rate is not positive, a base URL does not parse,
    /// the API key is not a valid header value, or the HTTP client fails to build.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let limiter = GlobalRateLimiter::new(config.requests_per_second)?;
        Self::with_limiter(config, Arc::new(limiter))
    }

    /// Create a client that paces through an existing limiter.
    ///
    /// Use this when several clients must share one ceiling.
    /// `config.requests_per_second` is ignored.
    pub fn with_limiter(config: Config, limiter: Arc<GlobalRateLimiter>) -> Result<Self, ConfigError> {
        for (field, raw) in [
            ("graph_api_url", &config.graph_api_url),
            ("recommendations_api_url", &config.recommendations_api_url),
        ] {
            Url::parse(raw).map_err(|e| ConfigError::invalid(field, format!("'{raw}': {e}")))?;
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(ref key) = config.api_key {
            let mut value = HeaderValue::from_str(key)
                .map_err(|_| ConfigError::invalid("api_key", "not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(0)
            .gzip(true)
            .build()
            .map_err(|e| ConfigError::invalid("http_client", e.to_string()))?;

        Ok(Self {
            http,
            limiter,
            stats: Arc::new(Mutex::new(RequestStats::default())),
            api_key: config.api_key,
            graph_api_url: config.graph_api_url.trim_end_matches('/').to_string(),
            recommendations_api_url: config.recommendations_api_url.trim_end_matches('/').to_string(),
            retry: config.retry,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Requests per second enforced by the limiter.
    #[must_use]
    pub fn target_rps(&self) -> f64 {
        self.limiter.rps()
    }

    /// The limiter this client paces through.
    #[must_use]
    pub fn limiter(&self) -> &Arc<GlobalRateLimiter> {
        &self.limiter
    }

    /// Snapshot of the request counters.
    #[must_use]
    pub fn stats(&self) -> RequestStats {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Search for papers.
    ///
    /// `limit` is clamped to 1-100.
    pub async fn search_papers(
        &self,
        query: &str,
        limit: usize,
        years: YearRange,
        fields: &[&str],
    ) -> ClientResult<Vec<Paper>> {
        let url = format!("{}/paper/search", self.graph_api_url);

        let mut params = vec![
            ("query", query.to_string()),
            ("limit", limit.clamp(1, 100).to_string()),
            ("fields", fields.join(",")),
        ];

        if let Some(year) = years.to_param() {
            params.push(("year", year));
        }

        let result: SearchResult = self.fetch(Method::GET, &url, &params, None).await?;
        Ok(result.data)
    }

    /// Get multiple papers by ID (batch API).
    ///
    /// Unknown IDs come back as `null` and are dropped. An empty ID list
    /// returns immediately without a request.
    pub async fn batch_papers(&self, paper_ids: &[String], fields: &[&str]) -> ClientResult<Vec<Paper>> {
        if paper_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/paper/batch", self.graph_api_url);
        let params = [("fields", fields.join(","))];
        let body = json!({ "ids": paper_ids });

        let list: PaperList = self.fetch(Method::POST, &url, &params, Some(&body)).await?;
        Ok(list.into_papers())
    }

    /// Get recommendations for a single seed paper.
    ///
    /// `limit` is clamped to 1-50.
    pub async fn recommendations_for_paper(
        &self,
        paper_id: &str,
        limit: usize,
        fields: &[&str],
    ) -> ClientResult<Vec<Paper>> {
        // The seed id is one path segment; '/' and spaces in it get escaped
        let mut url = Url::parse(&self.recommendations_api_url)
            .map_err(|e| ClientError::request_failed(format!("bad recommendations URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::request_failed("recommendations URL cannot take a path"))?
            .pop_if_empty()
            .extend(["papers", "forpaper", paper_id]);
        let params = [("limit", limit.clamp(1, 50).to_string()), ("fields", fields.join(","))];

        let list: PaperList = self.fetch(Method::GET, url.as_str(), &params, None).await?;
        Ok(list.into_papers())
    }

    /// Execute one logical request and return the parsed JSON body.
    ///
    /// Every attempt goes through the limiter. 429, 5xx, and transport
    /// failures are retried up to `max_retries` times; other 4xx responses
    /// and malformed JSON are returned at once.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let mut last_error = String::from("unknown");

        for attempt in 0..=self.retry.max_retries {
            let waited = self.limiter.acquire().await;
            self.record(|stats| {
                stats.total_requests += 1;
                stats.slept_seconds += waited.as_secs_f64();
            });

            tracing::debug!(%method, url, attempt, waited_ms = waited.as_millis() as u64, "Sending request");

            let mut request = self.http.request(method.clone(), url).query(params);
            if let Some(body) = body {
                request = request.json(body);
            }

            let (status, server_wait, text) = match Self::send(request).await {
                Ok(parts) => parts,
                Err(err) => {
                    last_error = err.to_string();
                    if !self.retry.can_retry(attempt) {
                        break;
                    }
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(url, attempt, error = %err, delay_ms = delay.as_millis() as u64, "Request failed, retrying");
                    self.pause(delay).await;
                    continue;
                }
            };

            match Disposition::classify(status) {
                Disposition::RateLimited => {
                    self.record(|stats| stats.retry_429_count += 1);
                    if !self.retry.can_retry(attempt) {
                        tracing::warn!(url, attempt, "Rate limited, retries exhausted");
                        return Err(ClientError::rate_limited(status.as_u16(), truncate_body(&text)));
                    }
                    let delay = self.retry.rate_limit_delay(attempt, server_wait);
                    tracing::warn!(url, attempt, delay_ms = delay.as_millis() as u64, "Rate limited, backing off");
                    self.pause(delay).await;
                }
                Disposition::ServerError => {
                    self.record(|stats| stats.retry_5xx_count += 1);
                    if !self.retry.can_retry(attempt) {
                        tracing::warn!(url, attempt, status = status.as_u16(), "Server error, retries exhausted");
                        return Err(ClientError::server(status.as_u16(), truncate_body(&text)));
                    }
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(url, attempt, status = status.as_u16(), delay_ms = delay.as_millis() as u64, "Server error, backing off");
                    self.pause(delay).await;
                }
                Disposition::Reject => {
                    tracing::warn!(url, status = status.as_u16(), "Request rejected");
                    return Err(ClientError::client(status.as_u16(), truncate_body(&text)));
                }
                Disposition::Accept => {
                    return serde_json::from_str(&text).map_err(|err| {
                        tracing::warn!(url, error = %err, "Response is not valid JSON");
                        ClientError::invalid_response(status.as_u16(), truncate_body(&text))
                    });
                }
            }
        }

        Err(ClientError::request_failed(last_error))
    }

    /// Request and decode into a typed response.
    async fn fetch<T>(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.request(method, url, params, body).await?;

        T::deserialize(&value).map_err(|err| {
            tracing::warn!(url, error = %err, "Unexpected response shape");
            ClientError::invalid_response(StatusCode::OK.as_u16(), truncate_body(&value.to_string()))
        })
    }

    /// Send and read the whole body. Body read failures count as transport failures.
    async fn send(
        request: RequestBuilder,
    ) -> Result<(StatusCode, Option<Duration>, String), reqwest::Error> {
        let response = request.send().await?;
        let status = response.status();
        let server_wait = retry_after(response.headers());
        let text = response.text().await?;
        Ok((status, server_wait, text))
    }

    /// Sleep for a backoff delay and account for it.
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
        self.record(|stats| stats.slept_seconds += delay.as_secs_f64());
    }

    fn record(&self, update: impl FnOnce(&mut RequestStats)) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut stats);
    }
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("has_api_key", &self.has_api_key())
            .field("target_rps", &self.target_rps())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_rate() {
        let mut config = Config::default();
        config.requests_per_second = 0.0;
        let err = SemanticScholarClient::new(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { ref field, .. } if field == "requests_per_second"));
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = Config::default();
        config.graph_api_url = "not a url".to_string();
        assert!(SemanticScholarClient::new(config).is_err());
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        let config = Config::new(Some("bad\nkey".to_string()));
        assert!(SemanticScholarClient::new(config).is_err());
    }

    #[test]
    fn test_clones_share_limiter_and_stats() {
        let client = SemanticScholarClient::new(Config::default()).unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(client.limiter(), clone.limiter()));

        client.record(|stats| stats.total_requests += 2);
        assert_eq!(clone.stats().total_requests, 2);
    }
}
