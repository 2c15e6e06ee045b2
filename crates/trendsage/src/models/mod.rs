//! Data models for documents, trend insights, analytics and the HTTP API.
//!
//! Wire-facing models use `#[serde(rename_all = "camelCase")]` to match the
//! JSON contract consumed by the frontend.

mod analytics;
mod document;
mod inputs;
mod insight;
mod responses;

pub use analytics::{
    AnalyticsEvent, AnalyticsSummary, CardViewEvent, DailyStats, GoalProgress, QueryCount,
    SearchEvent, ShareEvent, SummaryTotals, TimeRange, TrendingTopic, TrendingTopics,
};
pub use document::{Document, ImpactFactor, SearchResult, Source, VeritusAuthors, VeritusPaper, VeritusResponse};
pub use inputs::*;
pub use insight::{
    KeyTakeaway, SubTopic, SubTopicsDraft, SummaryDraft, TimeHorizon, TrendDirection,
    TrendStrength, TrendSummary,
};
pub use responses::{
    CategoriesResponse, CategoryTopic, ErrorBody, FeaturedResponse, FeaturedTopic, HealthResponse,
    PublicationTrend, QuickSearchResponse, RegenerateResponse, ResultsMetadata, SearchResponse,
    SuggestionsResponse, TrackedResponse, TrendPoint, TrendResults, TrendingResponse,
};
