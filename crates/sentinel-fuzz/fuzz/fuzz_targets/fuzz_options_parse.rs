#![no_main]

use libfuzzer_sys::fuzz_target;
use scholar_evidence::models::LookupOptions;

fuzz_target!(|data: &[u8]| {
    if let Ok(options) = serde_json::from_slice::<LookupOptions>(data) {
        let options = options.normalized();
        assert!((1..=50).contains(&options.top_n));
        assert!((1..=100).contains(&options.search_limit));
        let _ = options.year_range().to_param();
    }
});
