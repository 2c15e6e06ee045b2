//! Curated topic data: autocomplete dictionary, categories, featured cards and
//! the trending list served before enough traffic has been observed.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::limits;
use crate::models::{CategoryTopic, FeaturedTopic, TrendDirection, TrendingTopic};

/// Autocomplete dictionary.
pub const SUGGESTIONS: [&str; 25] = [
    "AI in healthcare",
    "AI drug discovery",
    "AI diagnostics",
    "artificial intelligence ethics",
    "carbon-neutral startups",
    "carbon capture technology",
    "climate tech investment",
    "Web3 funding decline",
    "Web3 enterprise adoption",
    "blockchain sustainability",
    "renewable energy investment",
    "renewable energy storage",
    "electric vehicle market",
    "EV battery technology",
    "generative AI enterprise",
    "generative AI regulation",
    "fintech regulation",
    "fintech innovation",
    "remote work productivity",
    "hybrid work models",
    "quantum computing applications",
    "cybersecurity trends",
    "edge computing growth",
    "sustainable agriculture tech",
    "space technology commercialization",
];

/// Case-insensitive substring matches from the dictionary, at most eight.
///
/// Prefixes shorter than two characters yield nothing.
#[must_use]
pub fn suggestions(prefix: &str) -> Vec<String> {
    if prefix.chars().count() < limits::MIN_SUGGESTION_LEN {
        return Vec::new();
    }
    let needle = prefix.to_lowercase();
    SUGGESTIONS
        .iter()
        .filter(|s| s.to_lowercase().contains(&needle))
        .take(limits::MAX_SUGGESTIONS)
        .map(|s| (*s).to_string())
        .collect()
}

const FALLBACK_TRENDING: [(&str, u64); 8] = [
    ("AI in healthcare", 156),
    ("carbon-neutral startups", 89),
    ("Web3 funding decline", 72),
    ("renewable energy investment", 65),
    ("generative AI enterprise", 112),
    ("electric vehicle market", 98),
    ("fintech regulation", 54),
    ("remote work productivity", 47),
];

/// Curated trending topics, ranked by count, stamped with `now`.
#[must_use]
pub fn fallback_trending(limit: usize, now: DateTime<Utc>) -> Vec<TrendingTopic> {
    let mut topics: Vec<TrendingTopic> = FALLBACK_TRENDING
        .iter()
        .map(|&(query, count)| TrendingTopic {
            query: query.to_string(),
            search_count: count,
            last_searched: now,
        })
        .collect();
    topics.sort_by(|a, b| b.search_count.cmp(&a.search_count));
    topics.truncate(limit);
    topics
}

fn topic(query: &str, search_count: u64, trend: TrendDirection) -> CategoryTopic {
    CategoryTopic { query: query.to_string(), search_count, trend }
}

/// Curated topics grouped by category.
#[must_use]
pub fn categories() -> BTreeMap<String, Vec<CategoryTopic>> {
    use TrendDirection::{Declining, Rising, Stable};

    BTreeMap::from([
        (
            "technology".to_string(),
            vec![
                topic("AI in healthcare", 156, Rising),
                topic("generative AI enterprise", 112, Rising),
                topic("quantum computing applications", 78, Stable),
                topic("edge computing growth", 65, Rising),
            ],
        ),
        (
            "sustainability".to_string(),
            vec![
                topic("carbon-neutral startups", 89, Rising),
                topic("renewable energy investment", 98, Rising),
                topic("sustainable agriculture tech", 54, Stable),
                topic("carbon capture technology", 67, Rising),
            ],
        ),
        (
            "finance".to_string(),
            vec![
                topic("Web3 funding decline", 72, Declining),
                topic("fintech regulation", 54, Stable),
                topic("DeFi sustainability", 43, Declining),
                topic("digital banking trends", 61, Stable),
            ],
        ),
        (
            "business".to_string(),
            vec![
                topic("remote work productivity", 47, Stable),
                topic("hybrid work models", 52, Rising),
                topic("supply chain AI", 44, Rising),
                topic("workforce automation", 38, Stable),
            ],
        ),
    ])
}

#[allow(clippy::too_many_arguments)]
fn featured_topic(
    query: &str,
    title: &str,
    description: &str,
    icon: &str,
    category: &str,
    trend: TrendDirection,
    search_count: u64,
) -> FeaturedTopic {
    FeaturedTopic {
        query: query.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category: category.to_string(),
        trend,
        search_count,
    }
}

/// Homepage topic cards.
#[must_use]
pub fn featured() -> Vec<FeaturedTopic> {
    vec![
        featured_topic(
            "AI in healthcare",
            "AI in Healthcare",
            "Explore how artificial intelligence is transforming medical diagnostics, drug discovery, and patient care.",
            "🏥",
            "Technology",
            TrendDirection::Rising,
            156,
        ),
        featured_topic(
            "carbon-neutral startups",
            "Carbon-Neutral Startups",
            "Discover the latest in climate tech ventures focused on achieving net-zero emissions.",
            "🌱",
            "Sustainability",
            TrendDirection::Rising,
            89,
        ),
        featured_topic(
            "generative AI enterprise",
            "Generative AI in Enterprise",
            "Learn how businesses are adopting generative AI for productivity and innovation.",
            "🤖",
            "Technology",
            TrendDirection::Rising,
            112,
        ),
        featured_topic(
            "Web3 funding decline",
            "Web3 Funding Trends",
            "Analyze the shifting investment landscape in blockchain and decentralized technologies.",
            "🔗",
            "Finance",
            TrendDirection::Declining,
            72,
        ),
        featured_topic(
            "renewable energy investment",
            "Renewable Energy Investment",
            "Track capital flows into solar, wind, and other clean energy technologies.",
            "⚡",
            "Sustainability",
            TrendDirection::Rising,
            98,
        ),
        featured_topic(
            "quantum computing applications",
            "Quantum Computing Applications",
            "Explore practical use cases emerging from advances in quantum computing.",
            "🔬",
            "Technology",
            TrendDirection::Stable,
            78,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestions_case_insensitive_and_capped() {
        let matches = suggestions("AI");
        assert!(!matches.is_empty());
        assert!(matches.len() <= 8);
        assert!(matches.iter().all(|m| m.to_lowercase().contains("ai")));
        assert!(matches.iter().all(|m| SUGGESTIONS.contains(&m.as_str())));
    }

    #[test]
    fn test_short_prefix_has_no_suggestions() {
        assert!(suggestions("a").is_empty());
        assert!(suggestions("").is_empty());
    }

    #[test]
    fn test_fallback_trending_sorted_and_limited() {
        let topics = fallback_trending(3, Utc::now());
        let counts: Vec<u64> = topics.iter().map(|t| t.search_count).collect();
        assert_eq!(counts, vec![156, 112, 98]);
        assert_eq!(fallback_trending(20, Utc::now()).len(), 8);
    }

    #[test]
    fn test_catalog_shapes() {
        let categories = categories();
        assert_eq!(categories.len(), 4);
        assert!(categories.values().all(|topics| topics.len() == 4));
        assert_eq!(featured().len(), 6);
    }
}
