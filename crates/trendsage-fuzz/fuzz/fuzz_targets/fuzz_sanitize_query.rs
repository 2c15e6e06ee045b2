#![no_main]

use libfuzzer_sys::fuzz_target;
use trendsage::services::search::sanitize_query;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let clean = sanitize_query(&raw);
    assert_eq!(sanitize_query(&clean), clean);
    assert!(clean.chars().count() <= 500);
    assert!(!clean.contains(['<', '>']));
});
