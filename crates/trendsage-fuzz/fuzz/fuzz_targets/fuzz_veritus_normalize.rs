#![no_main]

use libfuzzer_sys::fuzz_target;
use trendsage::models::VeritusResponse;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = serde_json::from_slice::<VeritusResponse>(data) {
        let result = raw.normalize(10);
        assert!(result.documents.len() <= 10);
        assert!(result.documents.len() <= result.total_results);
        assert!(result.documents.iter().all(|d| !d.id.is_empty() && !d.title.is_empty()));
    }
});
