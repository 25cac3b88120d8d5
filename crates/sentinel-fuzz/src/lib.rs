//! Fuzzing library for scholar-evidence.
//!
//! Targets cover the tolerant response decoding and the evidence pipeline
//! that runs on whatever the API returns.
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_paper_list -- -max_total_time=60
//! ```

pub use scholar_evidence::models;
