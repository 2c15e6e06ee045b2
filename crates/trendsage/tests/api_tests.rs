//! Router-level tests through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trendsage::config::{Config, RunMode};
use trendsage::server::create_router;
use trendsage::services::AppContext;

fn mock_router() -> Router {
    create_router(Arc::new(AppContext::with_mocks(7)))
}

fn live_router(config: &Config) -> Router {
    create_router(Arc::new(AppContext::from_config(config).unwrap()))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Root routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&mock_router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, body) = send(&mock_router(), get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Endpoint not found"}));
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_two_character_query_passes_validation() {
    let (status, body) =
        send(&mock_router(), post_json("/api/search", &json!({"query": "ab"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "ab");
    let results = &body["results"];
    assert_eq!(results["sources"].as_array().unwrap().len(), 4);
    assert_eq!(results["chartData"].as_array().unwrap().len(), 6);
    assert_eq!(results["metadata"]["model"], "mock");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_one_character_query_is_rejected() {
    let (status, body) =
        send(&mock_router(), post_json("/api/search", &json!({"query": "a"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query too short");
    assert!(body["message"].as_str().unwrap().contains("at least 2 characters"));
}

#[tokio::test]
async fn test_non_string_query_is_invalid() {
    let router = mock_router();
    for payload in [json!({"query": 42}), json!({}), json!({"query": " <> "})] {
        let (status, body) = send(&router, post_json("/api/search", &payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body["error"], "Invalid query");
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&mock_router(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request");
}

#[tokio::test]
async fn test_zero_documents_skips_llm_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/papers/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let router = live_router(&Config::for_testing(&mock_server.uri()));
    let (status, body) =
        send(&router, post_json("/api/search", &json!({"query": "obscure niche"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "obscure niche");
    assert!(body["results"].is_null());
    assert_eq!(body["message"], "No relevant documents found for this query");

    let (_, summary) = send(&router, get("/api/analytics/summary?range=24h")).await;
    assert_eq!(summary["summary"]["totalSearches"], 0);
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway_in_production() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/papers/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&mock_server)
        .await;

    let router = live_router(&Config::for_testing(&mock_server.uri()));
    let (status, body) =
        send(&router, post_json("/api/search", &json!({"query": "fintech regulation"}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Provider error");
}

#[tokio::test]
async fn test_development_mode_masks_provider_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/papers/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = Config::for_testing(&mock_server.uri()).with_mode(RunMode::Development);
    let (status, body) =
        send(&live_router(&config), post_json("/api/search", &json!({"query": "ai in healthcare"})))
            .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["metadata"]["model"], "mock");
    assert_eq!(body["results"]["sources"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_quick_search() {
    let router = mock_router();

    let (status, body) = send(&router, get("/api/search/quick?q=ai%20in%20healthcare&limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);
    assert_eq!(body["totalResults"], 5);

    let (status, body) = send(&router, get("/api/search/quick")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Query parameter \"q\" is required");
}

#[tokio::test]
async fn test_regenerate() {
    let router = mock_router();
    let documents = json!([{"id": "x1", "title": "Grid storage economics"}]);

    let (status, body) = send(
        &router,
        post_json("/api/search/regenerate", &json!({"query": "grid storage", "documents": documents})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "grid storage");
    assert!(body["regeneratedAt"].is_string());
    assert!(!body["subTopics"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &router,
        post_json("/api/search/regenerate", &json!({"query": "grid storage", "documents": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide query and documents array");
}

#[tokio::test]
async fn test_suggestions() {
    let router = mock_router();

    let (status, body) = send(&router, get("/api/search/suggestions?q=ai")).await;
    assert_eq!(status, StatusCode::OK);
    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty() && suggestions.len() <= 8);
    assert!(
        suggestions.iter().all(|s| s.as_str().unwrap().to_lowercase().contains("ai")),
        "{suggestions:?}"
    );

    let (_, body) = send(&router, get("/api/search/suggestions?q=a")).await;
    assert_eq!(body["suggestions"], json!([]));
}

// =============================================================================
// Trending
// =============================================================================

#[tokio::test]
async fn test_trending_is_curated_without_traffic() {
    let (status, body) = send(&mock_router(), get("/api/trending?limit=3")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["curated"], true);
    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 3);
    assert_eq!(topics[0]["query"], "AI in healthcare");
    assert_eq!(topics[0]["searchCount"], 156);
}

#[tokio::test]
async fn test_trending_ranks_normalized_queries() {
    let router = mock_router();

    let queries = [
        "ai in healthcare",
        "AI in Healthcare",
        "  ai in healthcare  ",
        "carbon-neutral startups",
        "carbon-neutral startups",
        "web3 funding",
        "fintech regulation",
        "ev batteries",
    ];
    for query in queries {
        let (status, _) = send(&router, post_json("/api/search", &json!({"query": query}))).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&router, get("/api/trending?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["curated"], false);
    let topics = body["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["query"], "ai in healthcare");
    assert_eq!(topics[0]["searchCount"], 3);
    assert_eq!(topics[1]["query"], "carbon-neutral startups");
    assert_eq!(topics[1]["searchCount"], 2);
}

#[tokio::test]
async fn test_catalog_routes() {
    let router = mock_router();

    let (status, body) = send(&router, get("/api/trending/categories")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["categories"]["finance"][0]["trend"], "declining");
    assert!(body["updatedAt"].is_string());

    let (status, body) = send(&router, get("/api/trending/featured")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["featured"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_chart_decodes_topic() {
    let (status, body) = send(&mock_router(), get("/api/trending/chart/AI%20in%20healthcare")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "AI in healthcare");
    let trend = body["trend"].as_array().unwrap();
    assert_eq!(trend.len(), 6);
    let total: u64 = trend.iter().map(|p| p["publications"].as_u64().unwrap()).sum();
    assert_eq!(body["totalPublications"], total);
    assert!(body["growthRate"].as_str().unwrap().ends_with('%'));
}

// =============================================================================
// Analytics
// =============================================================================

#[tokio::test]
async fn test_card_view_requires_card_id() {
    let (status, body) = send(
        &mock_router(),
        post_json("/api/analytics/card-view", &json!({"query": "ev"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "cardId is required");
}

#[tokio::test]
async fn test_share_requires_platform_and_query() {
    let (status, body) = send(
        &mock_router(),
        post_json("/api/analytics/share", &json!({"platform": "linkedin"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "platform and query are required");
}

#[tokio::test]
async fn test_tracked_events_show_in_summary() {
    let router = mock_router();

    let card_view = Request::builder()
        .method("POST")
        .uri("/api/analytics/card-view")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-session-id", "sess-1")
        .body(Body::from(json!({"cardId": "takeaway-1", "query": "ev"}).to_string()))
        .unwrap();
    let (status, body) = send(&router, card_view).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["eventId"].is_string());

    for platform in ["linkedin", "linkedin", "x"] {
        let (status, _) = send(
            &router,
            post_json("/api/analytics/share", &json!({"platform": platform, "query": "ev"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&router, get("/api/analytics/summary?range=1y")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["timeRange"], "7d");
    assert_eq!(body["summary"]["cardViews"], 1);
    assert_eq!(body["summary"]["shares"], 3);
    assert_eq!(body["sharesByPlatform"], json!({"linkedin": 2, "x": 1}));
}

#[tokio::test]
async fn test_goal_progress_counts_sessions() {
    let router = mock_router();

    for session in ["s1", "s2", "s2"] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/search")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-session-id", session)
            .body(Body::from(json!({"query": "hybrid work"}).to_string()))
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&router, get("/api/analytics/goal-progress")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"], 69);
    assert_eq!(body["current"], 2);
    assert_eq!(body["remaining"], 67);
    assert_eq!(body["progress"], 2.9);
    assert_eq!(body["message"], "67 more users needed to reach goal");
}
