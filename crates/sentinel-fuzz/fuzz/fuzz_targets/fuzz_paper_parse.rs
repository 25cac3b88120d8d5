#![no_main]

use libfuzzer_sys::fuzz_target;
use scholar_evidence::models::Paper;

fuzz_target!(|data: &[u8]| {
    // Decoding and every accessor must hold up on arbitrary bytes
    if let Ok(paper) = serde_json::from_slice::<Paper>(data) {
        let _ = paper.is_traceable();
        let _ = paper.citation_url();
        let _ = paper.author_names();
    }
});
