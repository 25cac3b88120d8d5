//! JSON output formatting.

use crate::error::LookupError;
use crate::models::EvidencePack;

/// Pretty-printed evidence pack.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn format_pack_json(pack: &EvidencePack) -> serde_json::Result<String> {
    serde_json::to_string_pretty(pack)
}

/// Pretty-printed error report written in place of a pack.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn format_error_json(error: &LookupError) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&error.to_report())
}
