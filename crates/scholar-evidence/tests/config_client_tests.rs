//! Configuration and client construction tests.
//!
//! Tests actual behavior, not constants.

use std::sync::Arc;

use scholar_evidence::client::{GlobalRateLimiter, SemanticScholarClient};
use scholar_evidence::config::Config;
use scholar_evidence::error::{ConfigError, LookupError};
use scholar_evidence::formatters::format_error_json;
use scholar_evidence::orchestrator::SearchOrchestrator;

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_config_default_has_no_api_key() {
    let config = Config::default();
    assert!(!config.has_api_key());
}

#[test]
fn test_config_clone_preserves_api_key() {
    let config = Config::new(Some("secret".to_string()));
    let cloned = config.clone();
    assert_eq!(config.api_key, cloned.api_key);
}

// =============================================================================
// Client Behavior Tests
// =============================================================================

#[test]
fn test_client_reports_api_key_status() {
    let client = SemanticScholarClient::new(Config::new(Some("key".to_string()))).unwrap();
    assert!(client.has_api_key());

    let client_no_key = SemanticScholarClient::new(Config::default()).unwrap();
    assert!(!client_no_key.has_api_key());
}

#[test]
fn test_client_debug_hides_api_key() {
    let config = Config::new(Some("super-secret-key".to_string()));
    let client = SemanticScholarClient::new(config).unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("super-secret-key"));
    assert!(debug.contains("has_api_key"));
}

#[test]
fn test_client_rejects_non_positive_rate() {
    for rps in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let mut config = Config::default();
        config.requests_per_second = rps;
        let err = SemanticScholarClient::new(config).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidConfiguration { ref field, .. } if field == "requests_per_second"),
            "rps {rps} gave {err:?}"
        );
    }
}

#[test]
fn test_with_limiter_ignores_config_rate() {
    let limiter = Arc::new(GlobalRateLimiter::new(2.0).unwrap());
    let mut config = Config::default();
    config.requests_per_second = 50.0;
    let client = SemanticScholarClient::with_limiter(config, limiter).unwrap();
    assert!((client.target_rps() - 2.0).abs() < f64::EPSILON);
}

// =============================================================================
// Orchestrator Construction Tests
// =============================================================================

#[test]
fn test_orchestrator_reports_bad_api_key_as_config_error() {
    let config = Config::new(Some("bad\nkey".to_string()));
    let err = SearchOrchestrator::from_config(config).unwrap_err();
    assert!(matches!(err, LookupError::Config(ConfigError::InvalidConfiguration { ref field, .. }) if field == "api_key"));

    let report: serde_json::Value = serde_json::from_str(&format_error_json(&err).unwrap()).unwrap();
    assert_eq!(report["error"], "invalid_configuration");
    assert!(report["detail"].as_str().unwrap().contains("api_key"));
}

#[test]
fn test_orchestrator_from_valid_config() {
    let orchestrator = SearchOrchestrator::from_config(Config::new(Some("key".to_string()))).unwrap();
    assert!(orchestrator.client().has_api_key());
}
