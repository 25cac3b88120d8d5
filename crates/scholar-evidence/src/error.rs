//! Error types for the evidence lookup.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Remote failures are values: the client never panics on a bad upstream response.

use serde_json::{Value, json};

/// Errors raised while building a client or limiter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration value cannot be used.
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfiguration {
        /// Offending setting
        field: String,
        /// Why it was rejected
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration { field: field.into(), message: message.into() }
    }
}

/// Errors from the HTTP client layer, returned once the retry policy gives up
/// or the response is not worth retrying.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No response was received (connection, DNS, TLS, timeout, body read).
    #[error("Request failed: {detail}")]
    RequestFailed {
        /// Transport error description from the last attempt
        detail: String,
    },

    /// Still rate limited (429) after every retry.
    #[error("Rate limited ({status}): {body}")]
    RateLimited {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// Server error (5xx) after every retry.
    #[error("Server error ({status}): {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// Request rejected by the API (4xx other than 429). Never retried.
    #[error("Client error ({status}): {body}")]
    Client {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// Successful status but the payload is not the JSON we asked for.
    #[error("Invalid response ({status}): {body}")]
    InvalidResponse {
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },
}

impl ClientError {
    /// Create a transport failure.
    #[must_use]
    pub fn request_failed(detail: impl Into<String>) -> Self {
        Self::RequestFailed { detail: detail.into() }
    }

    /// Create a rate limited error.
    #[must_use]
    pub fn rate_limited(status: u16, body: impl Into<String>) -> Self {
        Self::RateLimited { status, body: body.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server { status, body: body.into() }
    }

    /// Create a client (4xx) error.
    #[must_use]
    pub fn client(status: u16, body: impl Into<String>) -> Self {
        Self::Client { status, body: body.into() }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(status: u16, body: impl Into<String>) -> Self {
        Self::InvalidResponse { status, body: body.into() }
    }

    /// Wire tag used in JSON error payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RequestFailed { .. } => "request_failed",
            Self::RateLimited { .. } => "rate_limited",
            Self::Server { .. } => "server_error",
            Self::Client { .. } => "client_error",
            Self::InvalidResponse { .. } => "invalid_response",
        }
    }

    /// HTTP status code, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { .. } => None,
            Self::RateLimited { status, .. }
            | Self::Server { status, .. }
            | Self::Client { status, .. }
            | Self::InvalidResponse { status, .. } => Some(*status),
        }
    }

    /// Returns true if the failure was transient and retries ran out.
    ///
    /// `false` means retrying could not have helped.
    #[must_use]
    pub const fn is_retryable_exhausted(&self) -> bool {
        matches!(self, Self::RequestFailed { .. } | Self::RateLimited { .. } | Self::Server { .. })
    }

    /// JSON error payload for reports.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        match self {
            Self::RequestFailed { detail } => json!({
                "error": self.kind(),
                "detail": detail,
            }),
            Self::RateLimited { status, body }
            | Self::Server { status, body }
            | Self::Client { status, body }
            | Self::InvalidResponse { status, body } => json!({
                "error": self.kind(),
                "status_code": status,
                "body": body,
            }),
        }
    }
}

/// Errors that abort a whole lookup.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    /// Client or limiter could not be built
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The initial search call failed, so there is nothing to rank
    #[error("Search failed: {0}")]
    SearchFailed(#[source] ClientError),
}

impl LookupError {
    /// JSON error report written in place of an evidence pack.
    #[must_use]
    pub fn to_report(&self) -> Value {
        match self {
            Self::Config(err) => json!({
                "error": "invalid_configuration",
                "detail": err.to_string(),
            }),
            Self::SearchFailed(err) => json!({
                "error": "search_failed",
                "detail": err.to_payload(),
            }),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for lookups.
pub type LookupResult<T> = Result<T, LookupError>;
