//! Analytics event and aggregate models.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEvent {
    pub id: Uuid,
    pub query: String,
    pub results_count: usize,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

/// A trend card opened by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardViewEvent {
    pub id: Uuid,
    pub card_id: String,
    #[serde(default)]
    pub query: Option<String>,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// A result shared to an external platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEvent {
    pub id: Uuid,
    pub platform: String,
    pub query: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Any recorded analytics event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    Search(SearchEvent),
    CardView(CardViewEvent),
    Share(ShareEvent),
}

impl AnalyticsEvent {
    /// Event identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::Search(e) => e.id,
            Self::CardView(e) => e.id,
            Self::Share(e) => e.id,
        }
    }

    /// Event time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Search(e) => e.timestamp,
            Self::CardView(e) => e.timestamp,
            Self::Share(e) => e.timestamp,
        }
    }
}

/// Aggregation window for analytics summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeRange {
    /// Parse a range label; unknown labels fall back to the 7-day window.
    #[must_use]
    pub fn parse_or_default(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("24h") => Self::Day,
            Some("30d") => Self::Month,
            _ => Self::Week,
        }
    }

    /// Window length.
    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Self::Day => Duration::hours(24),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
        }
    }

    /// Wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline counts for a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_searches: usize,
    pub unique_users: usize,
    pub card_views: usize,
    pub shares: usize,
    pub time_range: TimeRange,
}

/// A query and how often it was searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryCount {
    pub query: String,
    pub count: usize,
}

/// Searches and unique sessions for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// `YYYY-MM-DD`.
    pub date: String,
    pub searches: usize,
    pub unique_users: usize,
}

/// Aggregated analytics for a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub summary: SummaryTotals,
    pub top_queries: Vec<QueryCount>,
    pub daily_breakdown: Vec<DailyStats>,
    pub shares_by_platform: BTreeMap<String, usize>,
}

/// A normalized query ranked by historical search frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub query: String,
    pub search_count: u64,
    pub last_searched: DateTime<Utc>,
}

/// Outcome of a trending-topics query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrendingTopics {
    /// Ranked from observed traffic.
    Observed(Vec<TrendingTopic>),
    /// Too few distinct queries recorded to rank meaningfully.
    InsufficientData {
        /// Distinct queries seen so far.
        distinct_queries: usize,
    },
}

/// Progress towards the unique-user goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal: usize,
    pub current: usize,
    pub progress: f64,
    pub remaining: usize,
    pub message: String,
}

impl GoalProgress {
    /// Compute progress of `current` unique users towards `goal`.
    #[must_use]
    pub fn new(goal: usize, current: usize) -> Self {
        let ratio = if goal == 0 { 1.0 } else { current as f64 / goal as f64 };
        let progress = ((ratio * 100.0).min(100.0) * 10.0).round() / 10.0;
        let remaining = goal.saturating_sub(current);
        let message = if remaining == 0 {
            "Goal achieved!".to_string()
        } else {
            format!("{remaining} more users needed to reach goal")
        };
        Self { goal, current, progress, remaining, message }
    }
}
