//! Router and handlers for the JSON API.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::request::{ApiError, RequestMeta};
use crate::config::limits;
use crate::error::ServiceError;
use crate::models::{
    AnalyticsSummary, CardViewRequest, CategoriesResponse, FeaturedResponse, GoalProgress,
    HealthResponse, PublicationTrend, QuickSearchParams, QuickSearchResponse, RegenerateRequest,
    RegenerateResponse, SearchRequest, SearchResponse, ShareRequest, SuggestionParams,
    SuggestionsResponse, SummaryParams, TimeRange, TrackedResponse, TrendingParams,
    TrendingResponse, parse_limit_str,
};
use crate::services::{AppContext, catalog, search};

type AppState = Arc<AppContext>;
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Build the application router.
pub fn create_router(ctx: AppState) -> Router {
    let api = Router::new()
        .route("/search", post(handle_search))
        .route("/search/quick", get(handle_quick_search))
        .route("/search/regenerate", post(handle_regenerate))
        .route("/search/suggestions", get(handle_suggestions))
        .route("/trending", get(handle_trending))
        .route("/trending/categories", get(handle_categories))
        .route("/trending/chart/{topic}", get(handle_chart))
        .route("/trending/featured", get(handle_featured))
        .route("/analytics/card-view", post(handle_card_view))
        .route("/analytics/share", post(handle_share))
        .route("/analytics/summary", get(handle_summary))
        .route("/analytics/goal-progress", get(handle_goal_progress));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .fallback(|| async { ApiError::not_found() })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_search(
    State(ctx): State<AppState>,
    RequestMeta(requester): RequestMeta,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<SearchResponse> {
    let Json(request) = body?;
    Ok(Json(search::search(&ctx, &request, &requester).await?))
}

async fn handle_quick_search(
    State(ctx): State<AppState>,
    Query(params): Query<QuickSearchParams>,
) -> ApiResult<QuickSearchResponse> {
    Ok(Json(search::quick_search(&ctx, &params).await?))
}

async fn handle_regenerate(
    State(ctx): State<AppState>,
    body: Result<Json<RegenerateRequest>, JsonRejection>,
) -> ApiResult<RegenerateResponse> {
    let Json(request) = body?;
    Ok(Json(search::regenerate(&ctx, &request).await?))
}

async fn handle_suggestions(Query(params): Query<SuggestionParams>) -> Json<SuggestionsResponse> {
    let prefix = params.q.unwrap_or_default();
    Json(SuggestionsResponse { suggestions: catalog::suggestions(prefix.trim()) })
}

async fn handle_trending(
    State(ctx): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> ApiResult<TrendingResponse> {
    let limit = params
        .limit
        .as_deref()
        .and_then(parse_limit_str)
        .unwrap_or(limits::DEFAULT_TRENDING_LIMIT);
    Ok(Json(ctx.analytics.trending(limit).await?))
}

async fn handle_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse { categories: catalog::categories(), updated_at: Utc::now() })
}

async fn handle_chart(
    State(ctx): State<AppState>,
    Path(topic): Path<String>,
) -> Json<PublicationTrend> {
    Json(ctx.charts.publication_trend(topic.trim()))
}

async fn handle_featured() -> Json<FeaturedResponse> {
    Json(FeaturedResponse { featured: catalog::featured(), updated_at: Utc::now() })
}

async fn handle_card_view(
    State(ctx): State<AppState>,
    meta: RequestMeta,
    body: Result<Json<CardViewRequest>, JsonRejection>,
) -> ApiResult<TrackedResponse> {
    let Json(request) = body?;
    let card_id = required(request.card_id)
        .ok_or_else(|| ServiceError::validation("cardId", "Invalid request", "cardId is required"))?;

    let session_id = meta.session_or(request.session_id);
    let event = ctx.analytics.track_card_view(card_id, request.query, session_id).await?;
    Ok(Json(TrackedResponse { success: true, event_id: event.id }))
}

async fn handle_share(
    State(ctx): State<AppState>,
    meta: RequestMeta,
    body: Result<Json<ShareRequest>, JsonRejection>,
) -> ApiResult<TrackedResponse> {
    let Json(request) = body?;
    let (Some(platform), Some(query)) = (required(request.platform), required(request.query))
    else {
        return Err(ServiceError::validation(
            "platform",
            "Invalid request",
            "platform and query are required",
        )
        .into());
    };

    let session_id = meta.session_or(request.session_id);
    let event = ctx.analytics.track_share(platform, query, session_id).await?;
    Ok(Json(TrackedResponse { success: true, event_id: event.id }))
}

async fn handle_summary(
    State(ctx): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> ApiResult<AnalyticsSummary> {
    let range = TimeRange::parse_or_default(params.range.as_deref());
    Ok(Json(ctx.analytics.summary(range).await?))
}

async fn handle_goal_progress(State(ctx): State<AppState>) -> ApiResult<GoalProgress> {
    Ok(Json(ctx.analytics.goal_progress().await?))
}

/// A present, non-blank string field.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}
