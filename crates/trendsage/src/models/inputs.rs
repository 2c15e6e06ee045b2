//! Request bodies and query parameters for the HTTP API.
//!
//! Fields the caller may send with the wrong JSON type are kept as raw
//! `serde_json::Value` so that validation, not deserialization, decides the
//! response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text query; non-strings are treated as empty.
    #[serde(default)]
    pub query: Value,

    /// Search options.
    #[serde(default)]
    pub options: SearchOptions,
}

/// Options for a full search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    /// Number of documents to retrieve.
    #[serde(default)]
    pub limit: Option<Value>,
}

impl SearchOptions {
    /// Requested limit as a positive integer, if one was given.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit.as_ref().and_then(parse_limit)
    }
}

/// Body of `POST /api/search/regenerate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    /// Query the documents were retrieved for.
    #[serde(default)]
    pub query: Value,

    /// Documents from an earlier search.
    #[serde(default)]
    pub documents: Value,
}

/// Body of `POST /api/analytics/card-view`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardViewRequest {
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Body of `POST /api/analytics/share`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Query string of `GET /api/search/quick`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuickSearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

/// Query string of `GET /api/search/suggestions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: Option<String>,
}

/// Query string of `GET /api/trending`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendingParams {
    #[serde(default)]
    pub limit: Option<String>,
}

/// Query string of `GET /api/analytics/summary`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryParams {
    #[serde(default)]
    pub range: Option<String>,
}

/// Interpret a JSON number or numeric string as a positive limit.
///
/// Zero, negatives and non-numbers yield `None` so the caller's default applies.
#[must_use]
pub fn parse_limit(value: &Value) -> Option<usize> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_limit_str(s)? as f64,
        _ => return None,
    };
    (n.is_finite() && n >= 1.0).then(|| n.trunc() as usize)
}

/// Parse a query-string limit the way `parseInt` would: leading digits only.
#[must_use]
pub fn parse_limit_str(raw: &str) -> Option<usize> {
    let digits: String = raw.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok().filter(|&n| n > 0)
}
