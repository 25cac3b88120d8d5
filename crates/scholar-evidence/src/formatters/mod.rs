//! Output formatters for evidence packs and lookup errors.

pub mod json;
pub mod markdown;

pub use json::{format_error_json, format_pack_json};
pub use markdown::format_pack_markdown;
