//! Retry policy and response classification.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::config::api;

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Backoff unit; attempt `n` waits `backoff_base * 2^(n+1)`.
    pub backoff_base: Duration,
    /// Upper bound on the exponential term.
    pub backoff_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: api::MAX_RETRIES,
            backoff_base: api::BACKOFF_BASE,
            backoff_cap: api::BACKOFF_CAP,
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `attempt` (zero-based) failed.
    #[must_use]
    pub const fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Delay after a transport failure or a 5xx on `attempt`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_add(1));
        self.backoff_base.saturating_mul(factor).min(self.backoff_cap)
    }

    /// Delay after a 429 on `attempt`. The server's `Retry-After` wins when it
    /// asks for longer than our own backoff.
    #[must_use]
    pub fn rate_limit_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff(attempt);
        retry_after.map_or(backoff, |server| server.max(backoff))
    }
}

/// What to do with a received response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Parse the body as JSON.
    Accept,
    /// 429: back off, honoring `Retry-After`.
    RateLimited,
    /// 5xx: back off.
    ServerError,
    /// Other 4xx: give up immediately.
    Reject,
}

impl Disposition {
    /// Classify a status code.
    #[must_use]
    pub fn classify(status: StatusCode) -> Self {
        if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimited
        } else if status.is_server_error() {
            Self::ServerError
        } else if status.as_u16() >= 400 {
            Self::Reject
        } else {
            Self::Accept
        }
    }
}

/// Read `Retry-After` as a number of seconds.
///
/// HTTP-date values and garbage are ignored; the caller falls back to its own backoff.
#[must_use]
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(RETRY_AFTER)?.to_str().ok()?;
    let seconds: f64 = raw.trim().parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}

/// Cut a response body down for error payloads.
#[must_use]
pub fn truncate_body(body: &str) -> String {
    body.chars().take(api::ERROR_BODY_LIMIT).collect()
}
