#![no_main]

use libfuzzer_sys::fuzz_target;
use scholar_evidence::EvidenceBuilder;
use scholar_evidence::models::{PaperList, RateLimitStatus, RequestStats};

fuzz_target!(|data: &[u8]| {
    // Any response shape that decodes must survive the whole pipeline
    if let Ok(list) = serde_json::from_slice::<PaperList>(data) {
        let status = RateLimitStatus::from_stats(0.8, RequestStats::default());
        let pack = EvidenceBuilder::new(2026).top_n(5).build("fuzz", list.into_papers(), status, &[]);
        assert!(pack.citations.len() <= 5);
        assert!(pack.traceability_report.strict_traceability_pass);
    }
});
