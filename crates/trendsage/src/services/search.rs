//! Query sanitization and the search pipeline.
//!
//! A full search runs: validate, retrieve documents, (stop if none), summarize,
//! cluster sub-topics, generate the chart, record analytics, assemble. Each
//! stage awaits the previous one; a failing stage aborts the rest, except
//! analytics, which is best-effort.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use serde_json::Value;

use super::AppContext;
use super::analytics::SearchTrack;
use crate::config::limits;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Document, QuickSearchParams, QuickSearchResponse, RegenerateRequest, RegenerateResponse,
    ResultsMetadata, SearchRequest, SearchResponse, TrendResults, parse_limit_str,
};

/// Message returned when retrieval finds nothing.
pub const NO_RESULTS_MESSAGE: &str = "No relevant documents found for this query";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex pattern"));

/// Who issued a request, for analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub session_id: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl Default for Requester {
    fn default() -> Self {
        Self { session_id: "anonymous".to_string(), user_agent: None, ip: None }
    }
}

/// Clean a free-text query.
///
/// Angle brackets are removed, whitespace runs collapse to one space, the
/// result is trimmed and capped at 500 characters. Idempotent.
#[must_use]
pub fn sanitize_query(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let capped: String = collapsed.trim().chars().take(limits::MAX_QUERY_LEN).collect();
    capped.trim_end().to_string()
}

/// Sanitize a JSON value; anything but a string becomes empty.
#[must_use]
pub fn sanitize_value(raw: &Value) -> String {
    raw.as_str().map(sanitize_query).unwrap_or_default()
}

/// Check a sanitized query is usable.
///
/// # Errors
///
/// Returns a validation error if the query is empty or shorter than two characters.
pub fn validate_query(clean: &str) -> ServiceResult<()> {
    if clean.is_empty() {
        return Err(ServiceError::validation(
            "query",
            "Invalid query",
            "Please provide a valid search query",
        ));
    }
    if clean.chars().count() < limits::MIN_QUERY_LEN {
        return Err(ServiceError::validation(
            "query",
            "Query too short",
            "Search query must be at least 2 characters",
        ));
    }
    Ok(())
}

/// Requested document count, defaulted and capped.
#[must_use]
pub fn resolve_limit(requested: Option<usize>) -> usize {
    requested
        .filter(|&n| n > 0)
        .unwrap_or(limits::DEFAULT_DOCUMENT_LIMIT)
        .min(limits::MAX_DOCUMENT_LIMIT)
}

/// Run the full pipeline for `POST /api/search`.
pub async fn search(
    ctx: &AppContext,
    request: &SearchRequest,
    requester: &Requester,
) -> ServiceResult<SearchResponse> {
    let query = sanitize_value(&request.query);
    validate_query(&query)?;
    let limit = resolve_limit(request.options.limit());

    tracing::info!(query = %query, limit, "Search started");

    let found = ctx.documents.search(&query, limit).await?;
    if found.is_empty() {
        tracing::info!(query = %query, "Search found no documents");
        return Ok(SearchResponse {
            query,
            timestamp: Utc::now(),
            results: None,
            message: Some(NO_RESULTS_MESSAGE.to_string()),
        });
    }

    let summary = ctx.insights.summarize(&query, &found.documents).await?;
    let sub_topics = ctx.insights.sub_topics(&query, &found.documents).await?;
    let chart = ctx.charts.publication_trend(&query);

    let track = SearchTrack {
        query: query.clone(),
        results_count: found.documents.len(),
        session_id: requester.session_id.clone(),
        user_agent: requester.user_agent.clone(),
        ip: requester.ip.clone(),
    };
    if let Err(err) = ctx.analytics.track_search(track).await {
        tracing::warn!(query = %query, error = %err, "Failed to record search analytics");
    }

    tracing::info!(
        query = %query,
        documents = found.documents.len(),
        sub_topics = sub_topics.len(),
        model = %summary.model,
        "Search completed"
    );

    Ok(SearchResponse {
        query,
        timestamp: Utc::now(),
        results: Some(TrendResults {
            overview: summary.overview,
            key_takeaways: summary.key_takeaways,
            watch_list: summary.watch_list,
            confidence_score: summary.confidence_score,
            trend_direction: summary.trend_direction,
            time_horizon: summary.time_horizon,
            sources: summary.sources,
            sub_topics,
            chart_data: chart.trend,
            metadata: ResultsMetadata {
                total_documents: found.total_results,
                generated_at: summary.generated_at,
                model: summary.model,
            },
        }),
        message: None,
    })
}

/// Documents only, no LLM work, for `GET /api/search/quick`.
pub async fn quick_search(
    ctx: &AppContext,
    params: &QuickSearchParams,
) -> ServiceResult<QuickSearchResponse> {
    let raw = params.q.as_deref().unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(ServiceError::validation(
            "q",
            "Invalid query",
            "Query parameter \"q\" is required",
        ));
    }

    let query = sanitize_query(raw);
    validate_query(&query)?;
    let limit = resolve_limit(params.limit.as_deref().and_then(parse_limit_str));

    let found = ctx.documents.search(&query, limit).await?;
    Ok(QuickSearchResponse { query, documents: found.documents, total_results: found.total_results })
}

/// Re-run summary and sub-topics over caller-supplied documents.
pub async fn regenerate(
    ctx: &AppContext,
    request: &RegenerateRequest,
) -> ServiceResult<RegenerateResponse> {
    let invalid = || {
        ServiceError::validation(
            "documents",
            "Invalid request",
            "Please provide query and documents array",
        )
    };

    let query = sanitize_value(&request.query);
    if query.is_empty() {
        return Err(invalid());
    }
    let documents: Vec<Document> = match &request.documents {
        Value::Array(items) if !items.is_empty() => {
            serde_json::from_value(request.documents.clone()).map_err(|e| {
                ServiceError::validation("documents", "Invalid request", format!("Invalid document: {e}"))
            })?
        }
        _ => return Err(invalid()),
    };

    tracing::info!(query = %query, documents = documents.len(), "Regenerating summary");

    let summary = ctx.insights.summarize(&query, &documents).await?;
    let sub_topics = ctx.insights.sub_topics(&query, &documents).await?;

    Ok(RegenerateResponse {
        query,
        overview: summary.overview,
        key_takeaways: summary.key_takeaways,
        watch_list: summary.watch_list,
        confidence_score: summary.confidence_score,
        trend_direction: summary.trend_direction,
        sub_topics,
        regenerated_at: Utc::now(),
    })
}
