//! Usage analytics: event ingestion, windowed summaries and trending topics.
//!
//! The store keeps every event kind in its own ring buffer of the same
//! capacity (oldest dropped first) and a bounded frequency map of normalized
//! queries (least recently searched evicted first). Nothing is persisted.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::{Config, limits};
use crate::error::ServiceResult;
use crate::models::{
    AnalyticsEvent, AnalyticsSummary, CardViewEvent, DailyStats, GoalProgress, QueryCount,
    SearchEvent, ShareEvent, SummaryTotals, TimeRange, TrendingResponse, TrendingTopic,
    TrendingTopics,
};
use crate::services::catalog;

/// Append-only analytics backing store.
#[async_trait::async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Append one event.
    async fn record(&self, event: AnalyticsEvent) -> ServiceResult<()>;

    /// Aggregate the events within `range` of `now`.
    async fn summary_at(&self, range: TimeRange, now: DateTime<Utc>) -> ServiceResult<AnalyticsSummary>;

    /// Rank normalized queries by cumulative search count.
    async fn trending_topics(&self, limit: usize) -> ServiceResult<TrendingTopics>;
}

/// Key under which a query is counted for trending.
#[must_use]
pub fn normalize_topic(query: &str) -> String {
    query.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy)]
struct TopicEntry {
    count: u64,
    last_searched: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    searches: VecDeque<SearchEvent>,
    card_views: VecDeque<CardViewEvent>,
    shares: VecDeque<ShareEvent>,
    topics: HashMap<String, TopicEntry>,
}

fn push_bounded<T>(buffer: &mut VecDeque<T>, item: T, capacity: usize) {
    while buffer.len() >= capacity {
        buffer.pop_front();
    }
    buffer.push_back(item);
}

/// Process-lifetime in-memory analytics store.
#[derive(Debug)]
pub struct InMemoryAnalytics {
    state: RwLock<State>,
    event_capacity: usize,
    topic_capacity: usize,
}

impl InMemoryAnalytics {
    /// Create a store retaining `event_capacity` events per kind and
    /// `topic_capacity` distinct trending queries.
    #[must_use]
    pub fn new(event_capacity: usize, topic_capacity: usize) -> Self {
        Self {
            state: RwLock::new(State::default()),
            event_capacity: event_capacity.max(1),
            topic_capacity: topic_capacity.max(1),
        }
    }

    /// Create a store sized from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.event_capacity, config.trending_capacity)
    }

    /// Number of retained events per kind: (searches, card views, shares).
    pub async fn retained(&self) -> (usize, usize, usize) {
        let state = self.state.read().await;
        (state.searches.len(), state.card_views.len(), state.shares.len())
    }

    fn bump_topic(&self, topics: &mut HashMap<String, TopicEntry>, query: &str, at: DateTime<Utc>) {
        let key = normalize_topic(query);
        if key.is_empty() {
            return;
        }

        if let Some(entry) = topics.get_mut(&key) {
            entry.count += 1;
            entry.last_searched = entry.last_searched.max(at);
            return;
        }

        if topics.len() >= self.topic_capacity {
            let stalest = topics
                .iter()
                .min_by_key(|(_, e)| e.last_searched)
                .map(|(k, _)| k.clone());
            if let Some(stalest) = stalest {
                tracing::debug!(evicted = %stalest, "Trending map full, evicting stalest topic");
                topics.remove(&stalest);
            }
        }
        topics.insert(key, TopicEntry { count: 1, last_searched: at });
    }
}

impl Default for InMemoryAnalytics {
    fn default() -> Self {
        Self::new(limits::EVENT_CAPACITY, limits::TRENDING_CAPACITY)
    }
}

#[async_trait::async_trait]
impl AnalyticsStore for InMemoryAnalytics {
    async fn record(&self, event: AnalyticsEvent) -> ServiceResult<()> {
        let mut state = self.state.write().await;
        match event {
            AnalyticsEvent::Search(e) => {
                let (query, at) = (e.query.clone(), e.timestamp);
                push_bounded(&mut state.searches, e, self.event_capacity);
                self.bump_topic(&mut state.topics, &query, at);
            }
            AnalyticsEvent::CardView(e) => push_bounded(&mut state.card_views, e, self.event_capacity),
            AnalyticsEvent::Share(e) => push_bounded(&mut state.shares, e, self.event_capacity),
        }
        Ok(())
    }

    async fn summary_at(&self, range: TimeRange, now: DateTime<Utc>) -> ServiceResult<AnalyticsSummary> {
        let start = now - range.duration();
        let state = self.state.read().await;

        let searches: Vec<&SearchEvent> =
            state.searches.iter().filter(|e| e.timestamp >= start).collect();
        let card_views = state.card_views.iter().filter(|e| e.timestamp >= start).count();
        let shares: Vec<&ShareEvent> = state.shares.iter().filter(|e| e.timestamp >= start).collect();

        let unique_users = searches.iter().map(|e| e.session_id.as_str()).collect::<HashSet<_>>().len();

        // First-seen order, so the stable sort keeps it for equal counts.
        let mut order: Vec<QueryCount> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for event in &searches {
            let query = event.query.to_lowercase();
            match index.get(&query) {
                Some(&i) => order[i].count += 1,
                None => {
                    index.insert(query.clone(), order.len());
                    order.push(QueryCount { query, count: 1 });
                }
            }
        }
        order.sort_by(|a, b| b.count.cmp(&a.count));
        order.truncate(limits::TOP_QUERIES);

        let mut days: BTreeMap<String, (usize, HashSet<&str>)> = BTreeMap::new();
        for event in &searches {
            let day = event.timestamp.date_naive().format("%Y-%m-%d").to_string();
            let (count, sessions) = days.entry(day).or_default();
            *count += 1;
            sessions.insert(event.session_id.as_str());
        }
        let daily_breakdown = days
            .into_iter()
            .map(|(date, (count, sessions))| DailyStats {
                date,
                searches: count,
                unique_users: sessions.len(),
            })
            .collect();

        let mut shares_by_platform = BTreeMap::new();
        for share in &shares {
            *shares_by_platform.entry(share.platform.clone()).or_insert(0) += 1;
        }

        Ok(AnalyticsSummary {
            summary: SummaryTotals {
                total_searches: searches.len(),
                unique_users,
                card_views,
                shares: shares.len(),
                time_range: range,
            },
            top_queries: order,
            daily_breakdown,
            shares_by_platform,
        })
    }

    async fn trending_topics(&self, limit: usize) -> ServiceResult<TrendingTopics> {
        let state = self.state.read().await;

        if state.topics.len() < limits::MIN_TRENDING_TOPICS {
            return Ok(TrendingTopics::InsufficientData { distinct_queries: state.topics.len() });
        }

        let mut topics: Vec<TrendingTopic> = state
            .topics
            .iter()
            .map(|(query, entry)| TrendingTopic {
                query: query.clone(),
                search_count: entry.count,
                last_searched: entry.last_searched,
            })
            .collect();

        topics.sort_by(|a, b| {
            b.search_count
                .cmp(&a.search_count)
                .then(b.last_searched.cmp(&a.last_searched))
                .then_with(|| a.query.cmp(&b.query))
        });
        topics.truncate(limit);

        Ok(TrendingTopics::Observed(topics))
    }
}

/// Search details captured alongside a completed search.
#[derive(Debug, Clone, Default)]
pub struct SearchTrack {
    pub query: String,
    pub results_count: usize,
    pub session_id: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

/// Event-creating facade over an [`AnalyticsStore`].
#[derive(Clone)]
pub struct Analytics {
    store: Arc<dyn AnalyticsStore>,
}

impl Analytics {
    /// Wrap a store.
    #[must_use]
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// Record a completed search.
    pub async fn track_search(&self, track: SearchTrack) -> ServiceResult<SearchEvent> {
        let event = SearchEvent {
            id: Uuid::new_v4(),
            query: track.query,
            results_count: track.results_count,
            session_id: track.session_id,
            timestamp: Utc::now(),
            user_agent: track.user_agent,
            ip: track.ip,
        };
        self.store.record(AnalyticsEvent::Search(event.clone())).await?;
        tracing::debug!(event_id = %event.id, query = %event.query, "Search tracked");
        Ok(event)
    }

    /// Record a trend card view.
    pub async fn track_card_view(
        &self,
        card_id: String,
        query: Option<String>,
        session_id: String,
    ) -> ServiceResult<CardViewEvent> {
        let event = CardViewEvent { id: Uuid::new_v4(), card_id, query, session_id, timestamp: Utc::now() };
        self.store.record(AnalyticsEvent::CardView(event.clone())).await?;
        tracing::debug!(event_id = %event.id, card_id = %event.card_id, "Card view tracked");
        Ok(event)
    }

    /// Record a share.
    pub async fn track_share(
        &self,
        platform: String,
        query: String,
        session_id: String,
    ) -> ServiceResult<ShareEvent> {
        let event = ShareEvent { id: Uuid::new_v4(), platform, query, session_id, timestamp: Utc::now() };
        self.store.record(AnalyticsEvent::Share(event.clone())).await?;
        tracing::debug!(event_id = %event.id, platform = %event.platform, "Share tracked");
        Ok(event)
    }

    /// Summary for the window ending now.
    pub async fn summary(&self, range: TimeRange) -> ServiceResult<AnalyticsSummary> {
        self.store.summary_at(range, Utc::now()).await
    }

    /// Trending topics, or the curated list when traffic is too thin to rank.
    pub async fn trending(&self, limit: usize) -> ServiceResult<TrendingResponse> {
        let updated_at = Utc::now();
        let response = match self.store.trending_topics(limit).await? {
            TrendingTopics::Observed(topics) => TrendingResponse { topics, updated_at, curated: false },
            TrendingTopics::InsufficientData { distinct_queries } => {
                tracing::debug!(distinct_queries, "Too few queries observed, serving curated topics");
                TrendingResponse { topics: catalog::fallback_trending(limit, updated_at), updated_at, curated: true }
            }
        };
        Ok(response)
    }

    /// Progress towards the unique-user goal over the last 30 days.
    pub async fn goal_progress(&self) -> ServiceResult<GoalProgress> {
        let summary = self.summary(TimeRange::Month).await?;
        Ok(GoalProgress::new(limits::USER_GOAL, summary.summary.unique_users))
    }
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analytics").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn search_at(query: &str, session: &str, at: DateTime<Utc>) -> AnalyticsEvent {
        AnalyticsEvent::Search(SearchEvent {
            id: Uuid::new_v4(),
            query: query.to_string(),
            results_count: 5,
            session_id: session.to_string(),
            timestamp: at,
            user_agent: None,
            ip: None,
        })
    }

    fn share_at(platform: &str, at: DateTime<Utc>) -> AnalyticsEvent {
        AnalyticsEvent::Share(ShareEvent {
            id: Uuid::new_v4(),
            platform: platform.to_string(),
            query: "q".to_string(),
            session_id: "s".to_string(),
            timestamp: at,
        })
    }

    #[tokio::test]
    async fn test_normalized_queries_share_one_topic() {
        let store = InMemoryAnalytics::default();
        let now = Utc::now();
        for q in ["ai in healthcare", "AI in Healthcare", "  ai in healthcare  "] {
            store.record(search_at(q, "s1", now)).await.unwrap();
        }
        let state = store.state.read().await;
        assert_eq!(state.topics.len(), 1);
        assert_eq!(state.topics["ai in healthcare"].count, 3);
    }

    #[tokio::test]
    async fn test_trending_requires_five_distinct_queries() {
        let store = InMemoryAnalytics::default();
        let now = Utc::now();
        for q in ["a1", "a2", "a3", "a4"] {
            store.record(search_at(q, "s", now)).await.unwrap();
        }
        assert_eq!(
            store.trending_topics(10).await.unwrap(),
            TrendingTopics::InsufficientData { distinct_queries: 4 }
        );

        store.record(search_at("a5", "s", now)).await.unwrap();
        store.record(search_at("a5", "s", now)).await.unwrap();
        match store.trending_topics(3).await.unwrap() {
            TrendingTopics::Observed(topics) => {
                assert_eq!(topics.len(), 3);
                assert_eq!(topics[0].query, "a5");
                assert_eq!(topics[0].search_count, 2);
            }
            other => panic!("expected observed topics, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_every_event_kind_is_bounded() {
        let store = InMemoryAnalytics::new(3, 100);
        let now = Utc::now();
        for i in 0..5 {
            store.record(search_at(&format!("q{i}"), "s", now)).await.unwrap();
            store.record(share_at("x", now)).await.unwrap();
        }
        assert_eq!(store.retained().await, (3, 0, 3));

        let state = store.state.read().await;
        assert_eq!(state.searches.front().unwrap().query, "q2");
    }

    #[tokio::test]
    async fn test_topic_map_evicts_stalest() {
        let store = InMemoryAnalytics::new(100, 2);
        let now = Utc::now();
        store.record(search_at("old", "s", now - Duration::hours(2))).await.unwrap();
        store.record(search_at("mid", "s", now - Duration::hours(1))).await.unwrap();
        store.record(search_at("new", "s", now)).await.unwrap();

        let state = store.state.read().await;
        assert!(!state.topics.contains_key("old"));
        assert!(state.topics.contains_key("mid"));
        assert!(state.topics.contains_key("new"));
    }

    #[tokio::test]
    async fn test_summary_window_and_aggregates() {
        let store = InMemoryAnalytics::default();
        let now = Utc::now();
        store.record(search_at("EV market", "s1", now - Duration::hours(1))).await.unwrap();
        store.record(search_at("ev market", "s2", now - Duration::hours(2))).await.unwrap();
        store.record(search_at("fintech", "s1", now - Duration::hours(3))).await.unwrap();
        store.record(search_at("stale", "s3", now - Duration::days(10))).await.unwrap();
        store.record(share_at("twitter", now)).await.unwrap();
        store.record(share_at("twitter", now)).await.unwrap();
        store.record(share_at("linkedin", now - Duration::days(40))).await.unwrap();

        let week = store.summary_at(TimeRange::Week, now).await.unwrap();
        assert_eq!(week.summary.total_searches, 3);
        assert_eq!(week.summary.unique_users, 2);
        assert_eq!(week.summary.shares, 2);
        assert_eq!(week.top_queries[0], QueryCount { query: "ev market".into(), count: 2 });
        assert_eq!(week.shares_by_platform.get("twitter"), Some(&2));
        assert!(!week.shares_by_platform.contains_key("linkedin"));

        let month = store.summary_at(TimeRange::Month, now).await.unwrap();
        assert_eq!(month.summary.total_searches, 4);
        assert_eq!(month.summary.unique_users, 3);
    }

    #[tokio::test]
    async fn test_daily_breakdown_is_sorted_by_date() {
        let store = InMemoryAnalytics::default();
        let now = Utc::now();
        store.record(search_at("a", "s1", now)).await.unwrap();
        store.record(search_at("b", "s2", now - Duration::days(2))).await.unwrap();
        store.record(search_at("c", "s2", now - Duration::days(2))).await.unwrap();

        let summary = store.summary_at(TimeRange::Week, now).await.unwrap();
        let days = &summary.daily_breakdown;
        assert_eq!(days.len(), 2);
        assert!(days[0].date < days[1].date);
        assert_eq!(days[0].searches, 2);
        assert_eq!(days[0].unique_users, 1);
    }

    #[tokio::test]
    async fn test_facade_curated_fallback_and_goal() {
        let analytics = Analytics::new(Arc::new(InMemoryAnalytics::default()));
        let trending = analytics.trending(3).await.unwrap();
        assert!(trending.curated);
        assert_eq!(trending.topics.len(), 3);
        assert_eq!(trending.topics[0].query, "AI in healthcare");

        analytics
            .track_search(SearchTrack { query: "q".into(), session_id: "s1".into(), ..Default::default() })
            .await
            .unwrap();
        let goal = analytics.goal_progress().await.unwrap();
        assert_eq!(goal.current, 1);
        assert_eq!(goal.remaining, 68);
    }
}
