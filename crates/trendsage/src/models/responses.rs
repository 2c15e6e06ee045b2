//! Response bodies for the HTTP API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Document, KeyTakeaway, Source, SubTopic, TimeHorizon, TrendDirection, TrendingTopic};

/// One year of the synthetic publication series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub year: i32,
    pub publications: u64,
}

/// Synthetic publication trend for a topic. Not real data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationTrend {
    pub query: String,
    pub trend: Vec<TrendPoint>,
    /// Whole-percent growth rate, e.g. `"23%"`.
    pub growth_rate: String,
    pub total_publications: u64,
}

/// Provenance of a full search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsMetadata {
    pub total_documents: usize,
    pub generated_at: DateTime<Utc>,
    pub model: String,
}

/// Everything produced for a query with at least one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResults {
    pub overview: String,
    pub key_takeaways: Vec<KeyTakeaway>,
    pub watch_list: Vec<String>,
    pub confidence_score: u8,
    pub trend_direction: TrendDirection,
    pub time_horizon: TimeHorizon,
    pub sources: Vec<Source>,
    pub sub_topics: Vec<SubTopic>,
    pub chart_data: Vec<TrendPoint>,
    pub metadata: ResultsMetadata,
}

/// Response of `POST /api/search`.
///
/// `results` is serialized as `null` when no documents were found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub results: Option<TrendResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of `GET /api/search/quick`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickSearchResponse {
    pub query: String,
    pub documents: Vec<Document>,
    pub total_results: usize,
}

/// Response of `POST /api/search/regenerate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateResponse {
    pub query: String,
    pub overview: String,
    pub key_takeaways: Vec<KeyTakeaway>,
    pub watch_list: Vec<String>,
    pub confidence_score: u8,
    pub trend_direction: TrendDirection,
    pub sub_topics: Vec<SubTopic>,
    pub regenerated_at: DateTime<Utc>,
}

/// Response of `GET /api/search/suggestions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// Response of `GET /api/trending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub topics: Vec<TrendingTopic>,
    pub updated_at: DateTime<Utc>,
    /// True when too little traffic was observed and curated topics were returned.
    pub curated: bool,
}

/// A curated topic inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTopic {
    pub query: String,
    pub search_count: u64,
    pub trend: TrendDirection,
}

/// Response of `GET /api/trending/categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub categories: BTreeMap<String, Vec<CategoryTopic>>,
    pub updated_at: DateTime<Utc>,
}

/// A homepage topic card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedTopic {
    pub query: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub trend: TrendDirection,
    pub search_count: u64,
}

/// Response of `GET /api/trending/featured`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedResponse {
    pub featured: Vec<FeaturedTopic>,
    pub updated_at: DateTime<Utc>,
}

/// Acknowledgement of a tracked analytics event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedResponse {
    pub success: bool,
    pub event_id: Uuid,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Error body shared by all 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
