#![no_main]

use libfuzzer_sys::fuzz_target;
use trendsage::models::{Document, SubTopicsDraft, SummaryDraft};

fuzz_target!(|data: &[u8]| {
    let documents: Vec<Document> = (0..3)
        .map(|i| Document {
            id: format!("d{i}"),
            title: format!("Doc {i}"),
            authors: Vec::new(),
            r#abstract: String::new(),
            url: None,
            source: "Academic Source".to_string(),
            published_date: String::new(),
            citations: 0,
            relevance_score: 0.0,
            fields_of_study: Vec::new(),
            is_open_access: false,
            quartile_ranking: None,
        })
        .collect();

    if let Ok(draft) = serde_json::from_slice::<SummaryDraft>(data) {
        if draft.validate().is_ok() {
            let summary = draft.finish(&documents, "fuzz");
            assert!(summary.citations_resolve());
            assert!((1..=10).contains(&summary.confidence_score));
        }
    }

    if let Ok(draft) = serde_json::from_slice::<SubTopicsDraft>(data) {
        if let Ok(topics) = draft.finish(documents.len()) {
            assert!(topics.iter().flat_map(|t| &t.relevant_sources).all(|&s| (1..=3).contains(&s)));
        }
    }
});
